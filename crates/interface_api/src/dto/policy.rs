//! Policy DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContactId, Currency, PolicyId};
use domain_policy::{BillingSchedule, Policy, PolicyStatus};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreatePolicyRequest {
    #[validate(length(min = 1, max = 128))]
    pub policy_number: String,
    pub effective_date: NaiveDate,
    pub annual_premium: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub billing_schedule: Option<String>,
    #[serde(default)]
    pub named_insured: Option<ContactId>,
    #[serde(default)]
    pub agent: Option<ContactId>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SwitchScheduleRequest {
    #[validate(length(min = 1))]
    pub billing_schedule: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CancelPolicyRequest {
    #[validate(length(min = 1, max = 512))]
    pub reason: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub id: PolicyId,
    pub policy_number: String,
    pub effective_date: NaiveDate,
    pub status: PolicyStatus,
    pub billing_schedule: BillingSchedule,
    pub annual_premium: Decimal,
    pub currency: Currency,
    pub named_insured: Option<ContactId>,
    pub agent: Option<ContactId>,
    pub cancel_date: Option<NaiveDate>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Policy> for PolicyResponse {
    fn from(policy: &Policy) -> Self {
        Self {
            id: policy.id,
            policy_number: policy.policy_number.clone(),
            effective_date: policy.effective_date,
            status: policy.status,
            billing_schedule: policy.billing_schedule,
            annual_premium: policy.annual_premium.amount(),
            currency: policy.currency(),
            named_insured: policy.named_insured,
            agent: policy.agent,
            cancel_date: policy.cancel_date,
            cancel_reason: policy.cancel_reason.clone(),
            created_at: policy.created_at,
        }
    }
}
