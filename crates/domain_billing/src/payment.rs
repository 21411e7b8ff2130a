//! Payment records
//!
//! Payments are immutable once recorded. They attach to the policy rather
//! than to an individual invoice.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ContactId, Money, PaymentId, PolicyId};

use crate::error::BillingError;

/// A payment received on a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: PaymentId,
    /// Policy being paid
    pub policy_id: PolicyId,
    /// Contact who made the payment
    pub contact_id: ContactId,
    /// Amount received
    pub amount_paid: Money,
    /// Date the payment counts toward the balance
    pub transaction_date: NaiveDate,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Creates a new payment
    ///
    /// # Errors
    ///
    /// Returns a validation error unless `amount_paid` is strictly positive
    pub fn new(
        policy_id: PolicyId,
        contact_id: ContactId,
        amount_paid: Money,
        transaction_date: NaiveDate,
    ) -> Result<Self, BillingError> {
        if !amount_paid.is_positive() {
            return Err(BillingError::validation(format!(
                "payment amount must be positive, got {}",
                amount_paid
            )));
        }

        Ok(Self {
            id: PaymentId::new_v7(),
            policy_id,
            contact_id,
            amount_paid,
            transaction_date,
            created_at: Utc::now(),
        })
    }
}
