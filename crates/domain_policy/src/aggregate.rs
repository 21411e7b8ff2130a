//! Policy record
//!
//! The policy is the consistency boundary for billing. It owns the premium
//! and schedule that invoices are generated from, and its status gates every
//! accounting operation.
//!
//! # Invariants
//!
//! - The annual premium is strictly positive
//! - The policy number is never blank
//! - A policy is Canceled exactly when it carries a cancel date and reason
//! - Canceled is terminal

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ContactId, Currency, Money, PolicyId};

use crate::error::PolicyError;
use crate::events::PolicyEvent;
use crate::schedule::BillingSchedule;

/// Policy lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PolicyStatus {
    /// Policy is in force and billable
    #[default]
    Active,
    /// Policy was canceled; no further accounting is allowed
    Canceled,
    /// Policy reached the end of its term
    Expired,
}

impl PolicyStatus {
    /// Display name, also the stored form
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Active => "Active",
            PolicyStatus::Canceled => "Canceled",
            PolicyStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyStatus {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(PolicyStatus::Active),
            "Canceled" => Ok(PolicyStatus::Canceled),
            "Expired" => Ok(PolicyStatus::Expired),
            other => Err(PolicyError::validation(format!("unknown policy status '{}'", other))),
        }
    }
}

/// An insurance policy as seen by billing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identifier
    pub id: PolicyId,
    /// Caller-assigned, unique policy number
    pub policy_number: String,
    /// First day of coverage; the first invoice is billed on this date
    pub effective_date: NaiveDate,
    /// Lifecycle status
    pub status: PolicyStatus,
    /// How the annual premium is split into invoices
    pub billing_schedule: BillingSchedule,
    /// Premium for one 12-month term
    pub annual_premium: Money,
    /// Contact who owns the policy
    pub named_insured: Option<ContactId>,
    /// Contact who services the policy
    pub agent: Option<ContactId>,
    /// Date the cancellation took effect
    pub cancel_date: Option<NaiveDate>,
    /// Why the policy was canceled
    pub cancel_reason: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Starts building a new policy
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::new()
    }

    /// Returns the currency every invoice and payment on this policy uses
    pub fn currency(&self) -> Currency {
        self.annual_premium.currency()
    }

    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    pub fn is_canceled(&self) -> bool {
        self.status == PolicyStatus::Canceled
    }

    /// Fails with the recorded cancellation details if the policy is canceled
    pub fn ensure_not_canceled(&self) -> Result<(), PolicyError> {
        if !self.is_canceled() {
            return Ok(());
        }
        match (self.cancel_date, &self.cancel_reason) {
            (Some(cancel_date), Some(reason)) => Err(PolicyError::AlreadyCanceled {
                cancel_date,
                cancel_reason: reason.clone(),
            }),
            _ => Err(PolicyError::validation(
                "canceled policy is missing its cancel date or reason",
            )),
        }
    }

    /// Switches the billing schedule
    ///
    /// The caller is responsible for regenerating invoices afterwards.
    pub fn change_billing_schedule(
        &mut self,
        schedule: BillingSchedule,
    ) -> Result<PolicyEvent, PolicyError> {
        self.ensure_not_canceled()?;

        let from = self.billing_schedule;
        let now = Utc::now();
        self.billing_schedule = schedule;
        self.updated_at = now;

        Ok(PolicyEvent::BillingScheduleChanged {
            policy_id: self.id,
            from,
            to: schedule,
            timestamp: now,
        })
    }

    /// Cancels the policy as of `cancel_date`
    ///
    /// # Errors
    ///
    /// Returns error if the reason is blank or the policy is already canceled
    pub fn cancel(
        &mut self,
        reason: impl Into<String>,
        cancel_date: NaiveDate,
    ) -> Result<PolicyEvent, PolicyError> {
        let reason = reason.into().trim().to_string();
        if reason.is_empty() {
            return Err(PolicyError::validation("cancel reason must not be empty"));
        }
        self.ensure_not_canceled()?;

        let now = Utc::now();
        self.status = PolicyStatus::Canceled;
        self.cancel_date = Some(cancel_date);
        self.cancel_reason = Some(reason.clone());
        self.updated_at = now;

        Ok(PolicyEvent::PolicyCanceled {
            policy_id: self.id,
            reason,
            cancel_date,
            timestamp: now,
        })
    }

    /// Checks the record invariants
    ///
    /// Used when a policy is rebuilt from storage rather than through the
    /// builder.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.policy_number.trim().is_empty() {
            return Err(PolicyError::validation("policy number must not be empty"));
        }
        if !self.annual_premium.is_positive() {
            return Err(PolicyError::validation(format!(
                "annual premium must be positive, got {}",
                self.annual_premium
            )));
        }
        if self.is_canceled() {
            if self.cancel_date.is_none() || self.cancel_reason.is_none() {
                return Err(PolicyError::validation(
                    "canceled policy is missing its cancel date or reason",
                ));
            }
        } else if self.cancel_date.is_some() || self.cancel_reason.is_some() {
            return Err(PolicyError::validation(format!(
                "{} policy carries cancellation details",
                self.status
            )));
        }
        Ok(())
    }
}

/// Builder for creating new policies
///
/// # Example
///
/// ```rust,ignore
/// let policy = PolicyBuilder::new()
///     .policy_number("Policy One")
///     .effective_date(start)
///     .annual_premium(Money::new(dec!(365), Currency::USD))
///     .named_insured(insured.id)
///     .agent(agent.id)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy_number: Option<String>,
    effective_date: Option<NaiveDate>,
    annual_premium: Option<Money>,
    billing_schedule: BillingSchedule,
    named_insured: Option<ContactId>,
    agent: Option<ContactId>,
}

impl PolicyBuilder {
    /// Creates a new policy builder with an Annual schedule
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = Some(number.into());
        self
    }

    pub fn effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = Some(date);
        self
    }

    pub fn annual_premium(mut self, premium: Money) -> Self {
        self.annual_premium = Some(premium);
        self
    }

    pub fn billing_schedule(mut self, schedule: BillingSchedule) -> Self {
        self.billing_schedule = schedule;
        self
    }

    pub fn named_insured(mut self, contact_id: ContactId) -> Self {
        self.named_insured = Some(contact_id);
        self
    }

    pub fn agent(mut self, contact_id: ContactId) -> Self {
        self.agent = Some(contact_id);
        self
    }

    /// Builds the policy in Active status
    ///
    /// # Errors
    ///
    /// Returns error if a required field is missing or invalid
    pub fn build(self) -> Result<Policy, PolicyError> {
        let policy_number = self
            .policy_number
            .ok_or_else(|| PolicyError::MissingRequiredField("policy_number".to_string()))?;
        let effective_date = self
            .effective_date
            .ok_or_else(|| PolicyError::MissingRequiredField("effective_date".to_string()))?;
        let annual_premium = self
            .annual_premium
            .ok_or_else(|| PolicyError::MissingRequiredField("annual_premium".to_string()))?;

        let now = Utc::now();
        let policy = Policy {
            id: PolicyId::new_v7(),
            policy_number: policy_number.trim().to_string(),
            effective_date,
            status: PolicyStatus::Active,
            billing_schedule: self.billing_schedule,
            annual_premium,
            named_insured: self.named_insured,
            agent: self.agent,
            cancel_date: None,
            cancel_reason: None,
            created_at: now,
            updated_at: now,
        };
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn policy() -> Policy {
        PolicyBuilder::new()
            .policy_number("Policy One")
            .effective_date(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
            .annual_premium(Money::new(dec!(365), Currency::USD))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_policy_defaults() {
        let p = policy();
        assert_eq!(p.status, PolicyStatus::Active);
        assert_eq!(p.billing_schedule, BillingSchedule::Annual);
        assert!(p.cancel_date.is_none());
    }

    #[test]
    fn test_cancel_sets_both_fields() {
        let mut p = policy();
        let date = NaiveDate::from_ymd_opt(2015, 3, 1).unwrap();
        p.cancel("non-payment", date).unwrap();

        assert!(p.is_canceled());
        assert_eq!(p.cancel_date, Some(date));
        assert_eq!(p.cancel_reason.as_deref(), Some("non-payment"));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_cancel_details_on_open_policy_fail_validation() {
        let mut p = policy();
        p.cancel_date = NaiveDate::from_ymd_opt(2015, 3, 1);
        assert!(p.validate().is_err());

        let mut p = policy();
        p.status = PolicyStatus::Expired;
        p.cancel_reason = Some("non-payment".to_string());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_canceled_with_only_a_date_fails_validation() {
        let mut p = policy();
        p.status = PolicyStatus::Canceled;
        p.cancel_date = NaiveDate::from_ymd_opt(2015, 3, 1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_status_without_cancellation_fails_validation() {
        let mut p = policy();
        p.status = PolicyStatus::Canceled;
        assert!(p.validate().is_err());
    }
}
