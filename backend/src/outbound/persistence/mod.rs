//! PostgreSQL persistence adapter using Diesel ORM.
//!
//! Provides the relational [`UserStore`](crate::domain::ports::UserStore)
//! backed by `diesel-async` with `bb8` connection pooling, plus the embedded
//! schema migrations.
//!
//! Diesel row structs (`models.rs`) and schema definitions (`schema.rs`) are
//! internal details and never leave this module.
//!
//! ```ignore
//! use tristore::outbound::persistence::{DbPool, DieselUserStore, PoolConfig};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/tristore")).await?;
//! let store = DieselUserStore::new(pool);
//! ```

mod diesel_user_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_store::{DieselUserStore, ParseSqlIdStrategyError, SqlIdStrategy};
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
