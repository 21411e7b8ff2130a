//! Billing Domain - Policy Accounting
//!
//! This crate turns a policy's annual premium and billing schedule into a
//! dated series of invoices, records payments against the policy, and
//! answers the accounting questions asked of it at any point in time.
//!
//! # Accounting Rules
//!
//! - Each installment is billed on `effective_date + i * (12 / N)` months
//! - An invoice falls due one month after it is billed
//! - An invoice cancels the policy if still unpaid one month and 14 days
//!   after it is billed
//! - The balance on a date is everything billed minus everything paid up
//!   to and including that date
//! - Only agents may pay on a policy that is past due but not yet at its
//!   cancel date
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::PolicyAccounting;
//!
//! let accounting = PolicyAccounting::load(store, policy_id).await?;
//! let due = accounting.balance(Some(as_of)).await?;
//! accounting.make_payment(None, Some(as_of), due).await?;
//! ```

pub mod invoice;
pub mod payment;
pub mod generator;
pub mod balance;
pub mod delinquency;
pub mod ports;
pub mod accounting;
pub mod error;

pub use invoice::{Invoice, InvoiceView};
pub use payment::Payment;
pub use generator::generate_invoices;
pub use balance::account_balance;
pub use delinquency::{evaluate_cancellation, pending_non_pay, should_cancel, CancellationAssessment};
pub use ports::{AccountingSnapshot, AccountingStore};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryAccountingStore;
pub use accounting::PolicyAccounting;
pub use error::BillingError;
