//! Port adapters backed by PostgreSQL

pub mod accounting;

pub use accounting::PostgresAccountingStore;
