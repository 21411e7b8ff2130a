//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use core_kernel::{Currency, Money};
use domain_policy::BillingSchedule;
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::INR),
    ]
}

/// Strategy for generating billing schedules
pub fn schedule_strategy() -> impl Strategy<Value = BillingSchedule> {
    proptest::sample::select(BillingSchedule::ALL.to_vec())
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for generating positive premiums in any currency
pub fn premium_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating effective dates between 2000 and 2040,
/// month-end days included
pub fn effective_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..14_610).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .map(|base| base + Duration::days(offset))
            .unwrap_or(NaiveDate::MIN)
    })
}
