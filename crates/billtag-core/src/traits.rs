//! Storage traits the tag definition DAO is written against.
//!
//! Concrete backends (PostgreSQL in `billtag-db`, in-memory doubles in tests)
//! implement these so the DAO logic stays backend-agnostic.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::call_context::CallContext;
use crate::error::Result;
use crate::tags::TagDefinition;

/// Boxed future returned by units of work passed to
/// [`TagDefinitionSqlStore::in_transaction`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Operations available inside a store transaction.
#[async_trait]
pub trait TagDefinitionTransaction: Send {
    /// Look up a user-defined definition by exact name.
    async fn get_by_name(&mut self, name: &str) -> Result<Option<TagDefinition>>;

    /// Insert a user-defined definition, stamped with `context`.
    async fn create(&mut self, definition: &TagDefinition, context: &CallContext) -> Result<()>;

    /// Remove the user-defined definition called `name`.
    async fn delete_tag_definition(&mut self, name: &str, context: &CallContext) -> Result<()>;

    /// Number of tagged entities referencing `name`.
    async fn tag_definition_usage_count(&mut self, name: &str) -> Result<i64>;
}

/// Persistent store of user-defined tag definitions.
#[async_trait]
pub trait TagDefinitionSqlStore: Send + Sync {
    type Transaction: TagDefinitionTransaction + 'static;

    /// All user-defined definitions, in store order.
    async fn get(&self) -> Result<Vec<TagDefinition>>;

    /// Look up a user-defined definition by exact name.
    async fn get_by_name(&self, name: &str) -> Result<Option<TagDefinition>>;

    /// Run `work` as one atomic unit.
    ///
    /// Commits when `work` returns `Ok` and rolls back when it returns `Err`.
    /// The error from `work` is returned as-is.
    async fn in_transaction<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut Self::Transaction) -> BoxFuture<'a, Result<T>> + Send + 'static;
}
