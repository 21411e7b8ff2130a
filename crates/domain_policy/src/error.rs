//! Policy domain errors
//!
//! This module defines all error types that can occur within the
//! policy domain.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in the policy domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// The policy was canceled and can no longer change
    #[error("Policy was canceled on {cancel_date}: {cancel_reason}")]
    AlreadyCanceled {
        cancel_date: NaiveDate,
        cancel_reason: String,
    },

    /// Billing schedule name is not one of the known schedules
    #[error("Invalid billing schedule: {0}")]
    InvalidSchedule(String),

    /// Required field is missing
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl PolicyError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PolicyError::Validation(message.into())
    }
}
