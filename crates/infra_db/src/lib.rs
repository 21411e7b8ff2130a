//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for policy accounting, using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: `repositories` hold the row
//! types and SQL for each table, and `adapters` implement the domain's
//! `AccountingStore` port on top of them, translating rows to domain
//! records and database errors to port errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresAccountingStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/billing")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresAccountingStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::PostgresAccountingStore;
