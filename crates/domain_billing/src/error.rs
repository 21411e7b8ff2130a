//! Billing domain errors

use chrono::NaiveDate;
use thiserror::Error;

use core_kernel::{MoneyError, PortError, TemporalError};
use domain_party::PartyError;
use domain_policy::PolicyError;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// Billing schedule name is not in the schedule table
    #[error("Invalid billing schedule: {0}")]
    InvalidSchedule(String),

    /// Requested schedule is the one the policy already has
    #[error("Policy is already on the {0} billing schedule")]
    NoOpScheduleChange(String),

    /// Policy is canceled; no accounting is possible
    #[error("Policy was canceled on {cancel_date}: {cancel_reason}")]
    PolicyCanceled {
        cancel_date: NaiveDate,
        cancel_reason: String,
    },

    /// Payer could not be resolved
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    /// Policy is past due and the payer is not an agent
    #[error("Policy has passed its due date without being paid in full; only an agent can make a payment")]
    PaymentNotAllowed,

    /// Policy not found
    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Policy record error
    #[error(transparent)]
    Policy(PolicyError),

    /// Money arithmetic error
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Date arithmetic error
    #[error(transparent)]
    Temporal(#[from] TemporalError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] PortError),
}

impl BillingError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }
}

impl From<PolicyError> for BillingError {
    fn from(error: PolicyError) -> Self {
        match error {
            PolicyError::AlreadyCanceled {
                cancel_date,
                cancel_reason,
            } => BillingError::PolicyCanceled {
                cancel_date,
                cancel_reason,
            },
            PolicyError::InvalidSchedule(name) => BillingError::InvalidSchedule(name),
            PolicyError::Validation(message) => BillingError::Validation(message),
            other => BillingError::Policy(other),
        }
    }
}

impl From<PartyError> for BillingError {
    fn from(error: PartyError) -> Self {
        match error {
            PartyError::ContactNotFound(id) => BillingError::ContactNotFound(id),
            other => BillingError::Validation(other.to_string()),
        }
    }
}
