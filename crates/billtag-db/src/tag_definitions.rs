//! PostgreSQL tag definition store.
//!
//! Table layout:
//!
//! ```sql
//! CREATE TABLE tag_definitions (
//!     id           UUID PRIMARY KEY,
//!     name         VARCHAR(20)  NOT NULL UNIQUE,
//!     description  VARCHAR(200) NOT NULL,
//!     created_by   VARCHAR(50)  NOT NULL,
//!     created_date TIMESTAMPTZ  NOT NULL,
//!     updated_by   VARCHAR(50)  NOT NULL,
//!     updated_date TIMESTAMPTZ  NOT NULL
//! );
//! ```
//!
//! Usage counts come from `tags.tag_definition_name`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use billtag_core::{
    BoxFuture, CallContext, Error, Result, TagDefinition, TagDefinitionSqlStore,
    TagDefinitionTransaction,
};

const SELECT_BY_NAME: &str = "SELECT name, description FROM tag_definitions WHERE name = $1";

fn row_to_definition(row: &PgRow) -> TagDefinition {
    TagDefinition::user_defined(
        row.get::<String, _>("name"),
        row.get::<String, _>("description"),
    )
}

/// PostgreSQL implementation of [`TagDefinitionSqlStore`].
#[derive(Clone)]
pub struct PgTagDefinitionStore {
    pool: Pool<Postgres>,
}

impl PgTagDefinitionStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// An open transaction on the tag definition tables.
pub struct PgTagDefinitionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TagDefinitionTransaction for PgTagDefinitionTransaction {
    async fn get_by_name(&mut self, name: &str) -> Result<Option<TagDefinition>> {
        let row = sqlx::query(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_definition))
    }

    async fn create(&mut self, definition: &TagDefinition, context: &CallContext) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tag_definitions (
                id, name, description, created_by, created_date, updated_by, updated_date
            )
            VALUES ($1, $2, $3, $4, $5, $4, $5)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(definition.name())
        .bind(definition.description())
        .bind(&context.user_name)
        .bind(context.created_date)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            // Lost a race with a concurrent creator of the same name.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return Error::TagDefinitionAlreadyExists(definition.name().to_string());
                }
            }
            Error::Database(e)
        })?;
        Ok(())
    }

    async fn delete_tag_definition(&mut self, name: &str, context: &CallContext) -> Result<()> {
        let result = sqlx::query("DELETE FROM tag_definitions WHERE name = $1")
            .bind(name)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tag_definitions",
            op = "delete",
            tag_definition = name,
            user_token = %context.user_token,
            rows_affected = result.rows_affected(),
            "Deleted tag definition row"
        );
        Ok(())
    }

    async fn tag_definition_usage_count(&mut self, name: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tags WHERE tag_definition_name = $1")
            .bind(name)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(Error::Database)
    }
}

#[async_trait]
impl TagDefinitionSqlStore for PgTagDefinitionStore {
    type Transaction = PgTagDefinitionTransaction;

    async fn get(&self) -> Result<Vec<TagDefinition>> {
        let rows = sqlx::query("SELECT name, description FROM tag_definitions ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.iter().map(row_to_definition).collect())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<TagDefinition>> {
        let row = sqlx::query(SELECT_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_definition))
    }

    async fn in_transaction<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: for<'a> FnOnce(&'a mut Self::Transaction) -> BoxFuture<'a, Result<T>> + Send + 'static,
    {
        let tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut transaction = PgTagDefinitionTransaction { tx };

        match work(&mut transaction).await {
            Ok(value) => {
                transaction.tx.commit().await.map_err(Error::Database)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = transaction.tx.rollback().await {
                    warn!(
                        subsystem = "database",
                        component = "tag_definitions",
                        op = "rollback",
                        error = %rollback_err,
                        "Transaction rollback failed"
                    );
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_transaction_are_send() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<PgTagDefinitionStore>();
        assert_sync::<PgTagDefinitionStore>();
        assert_send::<PgTagDefinitionTransaction>();
    }
}
