//! # billtag-db
//!
//! PostgreSQL storage layer for billtag tag definitions.
//!
//! This crate provides:
//! - Connection pool management and environment configuration
//! - [`PgTagDefinitionStore`], the PostgreSQL backend for [`TagDefinitionDao`]
//! - [`Database`], which wires the DAO to a pool
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use billtag_db::{CallContext, Database, EventBus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/billing", Arc::new(EventBus::default())).await?;
//!     let ctx = CallContext::system("admin");
//!
//!     db.tag_definitions.create("promo", "Promotional tag", &ctx).await?;
//!     for def in db.tag_definitions.get_tag_definitions().await? {
//!         println!("{} control={}", def.name(), def.is_control_tag());
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod pool;
pub mod tag_definitions;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use billtag_core::*;

pub use pool::{
    create_pool, create_pool_with_config, database_url_from_env, PoolConfig, DATABASE_URL_ENV,
};
pub use tag_definitions::{PgTagDefinitionStore, PgTagDefinitionTransaction};

/// Combined database context.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Tag definition DAO backed by this pool.
    pub tag_definitions: TagDefinitionDao<PgTagDefinitionStore>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>, event_bus: Arc<EventBus>) -> Self {
        Self {
            tag_definitions: TagDefinitionDao::new(
                PgTagDefinitionStore::new(pool.clone()),
                event_bus,
            ),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str, event_bus: Arc<EventBus>) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool, event_bus))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(
        url: &str,
        config: PoolConfig,
        event_bus: Arc<EventBus>,
    ) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool, event_bus))
    }

    /// Connect using `DATABASE_URL` and the `DB_*` pool variables.
    pub async fn connect_from_env(event_bus: Arc<EventBus>) -> Result<Self> {
        let url = database_url_from_env()?;
        let config = PoolConfig::from_env()?;
        Self::connect_with_config(&url, config, event_bus).await
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone(), self.tag_definitions.event_bus().clone())
    }
}
