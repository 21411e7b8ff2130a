//! Billing schedules
//!
//! The schedule is the only input that decides how many installments a
//! policy term is split into and how far apart their bill dates fall.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyError;

/// Number of months in one policy term
pub const TERM_MONTHS: u32 = 12;

/// How a policy's annual premium is split into invoices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BillingSchedule {
    /// One invoice for the full premium
    #[default]
    Annual,
    /// Two invoices, six months apart
    #[serde(rename = "Two-Pay")]
    TwoPay,
    /// Three invoices, four months apart
    #[serde(rename = "Semi-Annual")]
    SemiAnnual,
    /// Four invoices, three months apart
    Quarterly,
    /// Twelve invoices, one month apart
    Monthly,
}

impl BillingSchedule {
    /// Every schedule, in the order they are offered
    pub const ALL: [BillingSchedule; 5] = [
        BillingSchedule::Annual,
        BillingSchedule::TwoPay,
        BillingSchedule::SemiAnnual,
        BillingSchedule::Quarterly,
        BillingSchedule::Monthly,
    ];

    /// Returns the number of installments per term
    pub fn installments(&self) -> u32 {
        match self {
            BillingSchedule::Annual => 1,
            BillingSchedule::TwoPay => 2,
            BillingSchedule::SemiAnnual => 3,
            BillingSchedule::Quarterly => 4,
            BillingSchedule::Monthly => 12,
        }
    }

    /// Returns the spacing between consecutive bill dates
    pub fn months_between_installments(&self) -> u32 {
        TERM_MONTHS / self.installments()
    }

    /// Returns the display name used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingSchedule::Annual => "Annual",
            BillingSchedule::TwoPay => "Two-Pay",
            BillingSchedule::SemiAnnual => "Semi-Annual",
            BillingSchedule::Quarterly => "Quarterly",
            BillingSchedule::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for BillingSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingSchedule {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BillingSchedule::ALL
            .into_iter()
            .find(|schedule| schedule.as_str() == s)
            .ok_or_else(|| PolicyError::InvalidSchedule(s.to_string()))
    }
}
