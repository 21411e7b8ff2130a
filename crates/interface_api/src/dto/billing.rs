//! Invoice, payment and balance DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::temporal::parse_iso_date;
use core_kernel::{ContactId, Currency, InvoiceId, PaymentId, PolicyId, Timezone};
use domain_billing::{CancellationAssessment, Invoice, InvoiceView, Payment};

use crate::error::ApiError;

/// `?date=YYYY-MM-DD`; today in the configured timezone when absent
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    pub date: Option<String>,
}

impl AsOfQuery {
    /// The requested date, or today in `timezone`
    pub fn resolve(&self, timezone: Timezone) -> Result<NaiveDate, ApiError> {
        let date = self
            .date
            .as_deref()
            .map(parse_iso_date)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(timezone.resolve(date))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// Invoice view plus the cancel date and tombstone flag
#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: InvoiceView,
    pub cancel_date: NaiveDate,
    pub deleted: bool,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice: invoice.view(),
            cancel_date: invoice.cancel_date,
            deleted: invoice.deleted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub policy_id: PolicyId,
    pub as_of: NaiveDate,
    pub balance: Decimal,
    pub currency: Currency,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancellationDetail {
    pub invoice_id: InvoiceId,
    pub cancel_date: NaiveDate,
    pub outstanding: Decimal,
}

impl From<&CancellationAssessment> for CancellationDetail {
    fn from(assessment: &CancellationAssessment) -> Self {
        Self {
            invoice_id: assessment.invoice_id,
            cancel_date: assessment.cancel_date,
            outstanding: assessment.outstanding.amount(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DelinquencyResponse {
    pub policy_id: PolicyId,
    pub as_of: NaiveDate,
    pub pending_non_pay: bool,
    pub should_cancel: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation: Option<CancellationDetail>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MakePaymentRequest {
    #[serde(default)]
    pub contact_id: Option<ContactId>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub policy_id: PolicyId,
    pub contact_id: ContactId,
    pub amount_paid: Decimal,
    pub currency: Currency,
    pub transaction_date: NaiveDate,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            policy_id: payment.policy_id,
            contact_id: payment.contact_id,
            amount_paid: payment.amount_paid.amount(),
            currency: payment.amount_paid.currency(),
            transaction_date: payment.transaction_date,
        }
    }
}
