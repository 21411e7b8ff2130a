//! Repository implementations for the accounting tables
//!
//! Each repository owns the SQL for one table and a `FromRow` row type
//! that mirrors its columns. Reads go through the pool; writes that take
//! part in a larger unit of work accept a `PgConnection` so the caller
//! can run them inside a transaction.

pub mod policy;
pub mod contact;
pub mod invoice;
pub mod payment;

pub use policy::{PolicyRepository, PolicyRow};
pub use contact::{ContactRepository, ContactRow};
pub use invoice::{InvoiceRepository, InvoiceRow};
pub use payment::{PaymentRepository, PaymentRow};
