//! Delinquency evaluation
//!
//! Two questions are asked of a policy's invoices on a given date:
//!
//! - Is it *pending cancellation for non-payment*? Some invoice is past its
//!   due date but not past its cancel date, and the account still owed money
//!   on that due date.
//! - *Should it cancel*? Some invoice is past its cancel date and the account
//!   still owed money on that cancel date.
//!
//! Both answers are advisory. Nothing here changes a policy's status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, InvoiceId, Money};

use crate::balance::account_balance;
use crate::error::BillingError;
use crate::invoice::Invoice;
use crate::payment::Payment;

/// The invoice that makes a policy eligible for cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationAssessment {
    /// First live invoice, by bill date, left unpaid past its cancel date
    pub invoice_id: InvoiceId,
    /// That invoice's cancel date
    pub cancel_date: NaiveDate,
    /// Balance owed on the cancel date
    pub outstanding: Money,
}

fn live_by_bill_date(invoices: &[Invoice]) -> Vec<&Invoice> {
    let mut live: Vec<&Invoice> = invoices.iter().filter(|i| i.is_live()).collect();
    live.sort_by_key(|i| i.bill_date);
    live
}

/// Returns true if some invoice is in its grace period on `as_of` with a
/// positive balance on its due date
pub fn pending_non_pay(
    currency: Currency,
    invoices: &[Invoice],
    payments: &[Payment],
    as_of: NaiveDate,
) -> Result<bool, BillingError> {
    for invoice in live_by_bill_date(invoices) {
        if !invoice.is_in_grace_period(as_of) {
            continue;
        }
        if account_balance(currency, invoices, payments, invoice.due_date)?.is_positive() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Finds the first invoice whose cancel date has passed on `as_of` with a
/// positive balance on that cancel date
pub fn evaluate_cancellation(
    currency: Currency,
    invoices: &[Invoice],
    payments: &[Payment],
    as_of: NaiveDate,
) -> Result<Option<CancellationAssessment>, BillingError> {
    for invoice in live_by_bill_date(invoices) {
        if invoice.cancel_date > as_of {
            continue;
        }
        let outstanding = account_balance(currency, invoices, payments, invoice.cancel_date)?;
        if outstanding.is_positive() {
            return Ok(Some(CancellationAssessment {
                invoice_id: invoice.id,
                cancel_date: invoice.cancel_date,
                outstanding,
            }));
        }
    }
    Ok(None)
}

/// Returns true if the policy is eligible for cancellation on `as_of`
pub fn should_cancel(
    currency: Currency,
    invoices: &[Invoice],
    payments: &[Payment],
    as_of: NaiveDate,
) -> Result<bool, BillingError> {
    Ok(evaluate_cancellation(currency, invoices, payments, as_of)?.is_some())
}
