//! Policy Domain
//!
//! This crate holds the policy record that billing runs against: its
//! premium, its billing cadence and its lifecycle status.
//!
//! # Policy Lifecycle
//!
//! ```text
//! Active -> Canceled
//!        \-> Expired -> Canceled
//! ```
//!
//! Canceled is terminal. A canceled policy always carries the date and the
//! reason it was canceled.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_policy::{BillingSchedule, PolicyBuilder};
//!
//! let policy = PolicyBuilder::new()
//!     .policy_number("Policy Two")
//!     .effective_date(start)
//!     .annual_premium(Money::new(dec!(1600), Currency::USD))
//!     .billing_schedule(BillingSchedule::Quarterly)
//!     .build()?;
//! ```

pub mod aggregate;
pub mod schedule;
pub mod events;
pub mod error;

pub use aggregate::{Policy, PolicyBuilder, PolicyStatus};
pub use schedule::BillingSchedule;
pub use events::PolicyEvent;
pub use error::PolicyError;
