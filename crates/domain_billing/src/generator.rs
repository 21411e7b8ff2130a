//! Invoice generation
//!
//! Produces the full installment schedule for one policy term. The number
//! of installments and the months between them both come from the policy's
//! billing schedule; the premium is split with [`Money::prorate`] so the
//! invoices always add back up to the annual premium.

use tracing::debug;

use core_kernel::temporal::add_months;
use core_kernel::Money;
use domain_policy::Policy;

use crate::error::BillingError;
use crate::invoice::Invoice;

/// Generates the invoices for one 12-month term of `policy`, ordered by bill date
///
/// The first installment is billed on the effective date. Each share is the
/// premium divided by the installment count, truncated to the currency's
/// minor unit; the last installment absorbs the remainder.
pub fn generate_invoices(policy: &Policy) -> Result<Vec<Invoice>, BillingError> {
    let schedule = policy.billing_schedule;
    let spacing = schedule.months_between_installments();
    let amounts: Vec<Money> = policy.annual_premium.prorate(schedule.installments())?;

    let invoices = amounts
        .into_iter()
        .enumerate()
        .map(|(i, amount_due)| -> Result<Invoice, BillingError> {
            let bill_date = add_months(policy.effective_date, i as u32 * spacing)?;
            Ok(Invoice::new(policy.id, bill_date, amount_due)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        policy_id = %policy.id,
        schedule = %schedule,
        count = invoices.len(),
        "Generated invoice schedule"
    );

    Ok(invoices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::Currency;
    use domain_policy::{BillingSchedule, PolicyBuilder};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_end_effective_date_clamps_each_bill_date() {
        let policy = PolicyBuilder::new()
            .policy_number("Month End")
            .effective_date(date(2015, 1, 31))
            .annual_premium(Money::new(dec!(1200), Currency::USD))
            .billing_schedule(BillingSchedule::Monthly)
            .build()
            .unwrap();

        let invoices = generate_invoices(&policy).unwrap();
        assert_eq!(invoices[1].bill_date, date(2015, 2, 28));
        assert_eq!(invoices[2].bill_date, date(2015, 3, 31));
        assert_eq!(invoices[1].due_date, date(2015, 3, 28));
    }

    #[test]
    fn test_semi_annual_spacing() {
        let policy = PolicyBuilder::new()
            .policy_number("Thirds")
            .effective_date(date(2015, 1, 1))
            .annual_premium(Money::new(dec!(1000), Currency::USD))
            .billing_schedule(BillingSchedule::SemiAnnual)
            .build()
            .unwrap();

        let invoices = generate_invoices(&policy).unwrap();
        let bills: Vec<_> = invoices.iter().map(|i| i.bill_date).collect();
        assert_eq!(bills, vec![date(2015, 1, 1), date(2015, 5, 1), date(2015, 9, 1)]);
        assert_eq!(invoices[2].amount_due.amount(), dec!(333.34));
    }
}
