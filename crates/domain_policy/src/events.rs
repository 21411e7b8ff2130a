//! Domain events for the policy record
//!
//! Every state-changing method on [`Policy`](crate::Policy) returns the
//! event describing what happened, for audit logging.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::PolicyId;

use crate::schedule::BillingSchedule;

/// Domain events emitted by the Policy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyEvent {
    /// Billing schedule was changed
    BillingScheduleChanged {
        policy_id: PolicyId,
        from: BillingSchedule,
        to: BillingSchedule,
        timestamp: DateTime<Utc>,
    },

    /// Policy has been canceled
    PolicyCanceled {
        policy_id: PolicyId,
        reason: String,
        cancel_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

impl PolicyEvent {
    /// Returns the policy ID associated with this event
    pub fn policy_id(&self) -> PolicyId {
        match self {
            PolicyEvent::BillingScheduleChanged { policy_id, .. } => *policy_id,
            PolicyEvent::PolicyCanceled { policy_id, .. } => *policy_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PolicyEvent::BillingScheduleChanged { timestamp, .. } => *timestamp,
            PolicyEvent::PolicyCanceled { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            PolicyEvent::BillingScheduleChanged { .. } => "BillingScheduleChanged",
            PolicyEvent::PolicyCanceled { .. } => "PolicyCanceled",
        }
    }
}
