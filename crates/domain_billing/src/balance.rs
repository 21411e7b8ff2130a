//! Balance calculation

use chrono::NaiveDate;

use core_kernel::{Currency, Money};

use crate::error::BillingError;
use crate::invoice::Invoice;
use crate::payment::Payment;

/// Returns what is owed on `as_of`
///
/// Sums every live invoice billed on or before `as_of` and subtracts every
/// payment transacted on or before `as_of`. Tombstoned invoices never count.
/// The result is negative when the policy is paid ahead.
pub fn account_balance(
    currency: Currency,
    invoices: &[Invoice],
    payments: &[Payment],
    as_of: NaiveDate,
) -> Result<Money, BillingError> {
    let billed = Money::sum(
        invoices
            .iter()
            .filter(|i| i.is_live() && i.bill_date <= as_of)
            .map(|i| &i.amount_due),
        currency,
    )?;
    let paid = Money::sum(
        payments
            .iter()
            .filter(|p| p.transaction_date <= as_of)
            .map(|p| &p.amount_paid),
        currency,
    )?;

    Ok(billed.checked_sub(&paid)?)
}
