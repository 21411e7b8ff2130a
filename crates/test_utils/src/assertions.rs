//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_billing::Invoice;
use rust_decimal::Decimal;

/// Asserts that a Money value has exactly `expected` as its amount
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Expected {} {}, got {}",
        actual.currency().symbol(),
        expected,
        actual
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that the invoices add up to exactly `premium`
pub fn assert_invoices_sum_to(invoices: &[Invoice], premium: &Money) {
    let total = Money::sum(invoices.iter().map(|i| &i.amount_due), premium.currency())
        .unwrap_or_else(|e| panic!("invoice currencies disagree: {}", e));
    assert_eq!(
        total, *premium,
        "Invoices sum to {}, expected {}",
        total, premium
    );
}

/// Asserts the bill dates of `invoices`, in order
pub fn assert_bill_dates(invoices: &[Invoice], expected: &[NaiveDate]) {
    let actual: Vec<NaiveDate> = invoices.iter().map(|i| i.bill_date).collect();
    assert_eq!(actual, expected, "Unexpected bill dates");
}

/// Asserts that every invoice is live and in `currency`
pub fn assert_all_live(invoices: &[Invoice], currency: Currency) {
    for invoice in invoices {
        assert!(invoice.is_live(), "Invoice {} is tombstoned", invoice.id);
        assert_eq!(invoice.amount_due.currency(), currency);
    }
}
