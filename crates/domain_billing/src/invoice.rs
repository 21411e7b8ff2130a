//! Invoices
//!
//! An invoice is one installment of a policy's annual premium. Invoices are
//! only ever created by the generator; afterwards the only thing that can
//! change is the tombstone flag set when a schedule switch replaces them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::temporal::{add_months, add_months_and_days};
use core_kernel::{DateWindow, InvoiceId, Money, PolicyId, TemporalError};

/// Months between an invoice's bill date and its due date
pub const DUE_AFTER_MONTHS: u32 = 1;

/// Days of grace after the due date before the cancel date
pub const CANCEL_GRACE_DAYS: u64 = 14;

/// One installment billed against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier
    pub id: InvoiceId,
    /// Policy being billed
    pub policy_id: PolicyId,
    /// Date the installment is billed
    pub bill_date: NaiveDate,
    /// Date payment is due
    pub due_date: NaiveDate,
    /// Date the policy cancels if this invoice is still unpaid
    pub cancel_date: NaiveDate,
    /// Installment amount
    pub amount_due: Money,
    /// Tombstone set when the invoice was replaced by a schedule switch
    pub deleted: bool,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates an invoice billed on `bill_date`, deriving its due and cancel dates
    pub fn new(
        policy_id: PolicyId,
        bill_date: NaiveDate,
        amount_due: Money,
    ) -> Result<Self, TemporalError> {
        Ok(Self {
            id: InvoiceId::new_v7(),
            policy_id,
            bill_date,
            due_date: add_months(bill_date, DUE_AFTER_MONTHS)?,
            cancel_date: add_months_and_days(bill_date, DUE_AFTER_MONTHS, CANCEL_GRACE_DAYS)?,
            amount_due,
            deleted: false,
            created_at: Utc::now(),
        })
    }

    /// Returns true unless the invoice has been tombstoned
    pub fn is_live(&self) -> bool {
        !self.deleted
    }

    /// Marks the invoice as replaced
    pub fn tombstone(&mut self) {
        self.deleted = true;
    }

    /// Due date through cancel date, both inclusive
    pub fn grace_window(&self) -> DateWindow {
        DateWindow {
            start: self.due_date,
            end: self.cancel_date,
        }
    }

    /// Returns true if `date` falls inside the grace window
    pub fn is_in_grace_period(&self, date: NaiveDate) -> bool {
        self.grace_window().contains(date)
    }

    /// The `{id, bill_date, due_date, amount_due}` shape shown to callers
    pub fn view(&self) -> InvoiceView {
        InvoiceView::from(self)
    }
}

/// Public view of an invoice, dates rendered as `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub id: InvoiceId,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount_due: rust_decimal::Decimal,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            bill_date: invoice.bill_date,
            due_date: invoice.due_date,
            amount_due: invoice.amount_due.amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_due_and_cancel_dates() {
        let invoice = Invoice::new(
            PolicyId::new(),
            date(2015, 1, 1),
            Money::new(dec!(300), Currency::USD),
        )
        .unwrap();

        assert_eq!(invoice.due_date, date(2015, 2, 1));
        assert_eq!(invoice.cancel_date, date(2015, 2, 15));
        assert!(invoice.is_live());
    }

    #[test]
    fn test_grace_period_bounds() {
        let invoice = Invoice::new(
            PolicyId::new(),
            date(2015, 1, 1),
            Money::new(dec!(300), Currency::USD),
        )
        .unwrap();

        assert!(!invoice.is_in_grace_period(date(2015, 1, 31)));
        assert!(invoice.is_in_grace_period(date(2015, 2, 1)));
        assert!(invoice.is_in_grace_period(date(2015, 2, 15)));
        assert!(!invoice.is_in_grace_period(date(2015, 2, 16)));
        assert_eq!(
            invoice.grace_window(),
            DateWindow::new(date(2015, 2, 1), date(2015, 2, 15)).unwrap()
        );
    }

    #[test]
    fn test_view_serializes_iso_dates() {
        let invoice = Invoice::new(
            PolicyId::new(),
            date(2015, 4, 1),
            Money::new(dec!(300), Currency::USD),
        )
        .unwrap();
        let json = serde_json::to_value(invoice.view()).unwrap();

        assert_eq!(json["bill_date"], "2015-04-01");
        assert_eq!(json["due_date"], "2015-05-01");
    }
}
