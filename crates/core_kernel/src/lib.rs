//! Core Kernel - Foundational types for the policy billing system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Money types with precise decimal arithmetic and explicit proration
//! - Calendar date arithmetic for billing schedules
//! - Strongly-typed identifiers
//! - Port error and health types for store adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateWindow, Timezone, TemporalError};
pub use identifiers::{PolicyId, ContactId, InvoiceId, PaymentId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
