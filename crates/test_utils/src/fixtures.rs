//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data. Dates follow the 2015 book of business
//! the accounting examples are written against.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_party::Contact;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Shorthand for a calendar date in tests
///
/// # Panics
///
/// Panics on an impossible date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid test date {}-{}-{}", year, month, day))
}

/// Shorthand for a USD amount
pub fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Premium that splits evenly across every schedule except Semi-Annual
    pub fn usd_1200() -> Money {
        usd(dec!(1200))
    }

    /// Premium that does not divide evenly into monthly installments
    pub fn usd_365() -> Money {
        usd(dec!(365))
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100), Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// New Year effective date
    pub fn jan_1() -> NaiveDate {
        date(2015, 1, 1)
    }

    /// First of February effective date
    pub fn feb_1() -> NaiveDate {
        date(2015, 2, 1)
    }

    /// Month-end effective date for clamping tests
    pub fn jan_31() -> NaiveDate {
        date(2015, 1, 31)
    }
}

/// Fixture for contacts
pub struct ContactFixtures;

impl ContactFixtures {
    /// A named insured contact
    ///
    /// # Panics
    ///
    /// Never for a non-blank name.
    pub fn named_insured(name: &str) -> Contact {
        Contact::named_insured(name).unwrap_or_else(|e| panic!("fixture contact: {}", e))
    }

    /// An agent contact
    pub fn agent(name: &str) -> Contact {
        Contact::agent(name).unwrap_or_else(|e| panic!("fixture contact: {}", e))
    }
}
