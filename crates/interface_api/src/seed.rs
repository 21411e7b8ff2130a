//! Demo data
//!
//! Six contacts and four policies with their invoices, plus one payment on
//! Policy Two. Loaded at startup when `API_SEED_DEMO_DATA=true`.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use core_kernel::{Currency, Money, PolicyId};
use domain_billing::{AccountingStore, BillingError, PolicyAccounting};
use domain_party::Contact;
use domain_policy::{BillingSchedule, Policy};

/// What the seed routine created
#[derive(Debug, Clone)]
pub struct SeedSummary {
    pub contacts: usize,
    pub policies: Vec<PolicyId>,
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, BillingError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| BillingError::validation(format!("invalid date {year}-{month}-{day}")))
}

/// Inserts the demo book of business
pub async fn seed_demo_data(store: Arc<dyn AccountingStore>) -> Result<SeedSummary, BillingError> {
    let john_doe_agent = Contact::agent("John Doe")?;
    let john_doe_insured = Contact::named_insured("John Doe")?;
    let bob_smith = Contact::agent("Bob Smith")?;
    let anna_white = Contact::named_insured("Anna White")?;
    let joe_lee = Contact::agent("Joe Lee")?;
    let ryan_bucket = Contact::named_insured("Ryan Bucket")?;

    let contacts = [
        &john_doe_agent,
        &john_doe_insured,
        &bob_smith,
        &anna_white,
        &joe_lee,
        &ryan_bucket,
    ];
    for c in contacts {
        store.save_contact(c).await?;
    }

    let plans: [(&str, NaiveDate, Decimal, BillingSchedule, &Contact, &Contact); 4] = [
        ("Policy One", date(2015, 1, 1)?, dec!(365), BillingSchedule::Annual, &john_doe_insured, &bob_smith),
        ("Policy Two", date(2015, 2, 1)?, dec!(1600), BillingSchedule::Quarterly, &anna_white, &joe_lee),
        ("Policy Three", date(2015, 1, 1)?, dec!(1200), BillingSchedule::Monthly, &ryan_bucket, &john_doe_agent),
        ("Policy Four", date(2015, 2, 1)?, dec!(500), BillingSchedule::TwoPay, &ryan_bucket, &john_doe_agent),
    ];

    let mut policies = Vec::with_capacity(plans.len());
    let mut policy_two = None;
    for (number, effective, premium, schedule, insured, agent) in plans {
        let policy = Policy::builder()
            .policy_number(number)
            .effective_date(effective)
            .annual_premium(Money::new(premium, Currency::USD))
            .billing_schedule(schedule)
            .named_insured(insured.id)
            .agent(agent.id)
            .build()?;

        let accounting = PolicyAccounting::create_policy(store.clone(), policy).await?;
        policies.push(accounting.policy().id);
        if number == "Policy Two" {
            policy_two = Some(accounting);
        }
    }

    if let Some(mut accounting) = policy_two {
        accounting
            .make_payment(
                Some(anna_white.id),
                Some(date(2015, 2, 1)?),
                Money::new(dec!(400), Currency::USD),
            )
            .await?;
    }

    info!(contacts = contacts.len(), policies = policies.len(), "Demo data loaded");
    Ok(SeedSummary {
        contacts: contacts.len(),
        policies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_billing::InMemoryAccountingStore;

    #[tokio::test]
    async fn test_seed_builds_the_demo_book() {
        let store: Arc<dyn AccountingStore> = Arc::new(InMemoryAccountingStore::new());
        let summary = seed_demo_data(store.clone()).await.unwrap();

        assert_eq!(summary.contacts, 6);
        assert_eq!(summary.policies.len(), 4);

        let policy_two = PolicyAccounting::load_by_number(store.clone(), "Policy Two")
            .await
            .unwrap();
        assert_eq!(policy_two.invoices().await.unwrap().len(), 4);
        assert_eq!(
            policy_two.balance(Some(date(2015, 2, 1).unwrap())).await.unwrap().amount(),
            dec!(0)
        );

        let policy_three = PolicyAccounting::load_by_number(store, "Policy Three")
            .await
            .unwrap();
        assert_eq!(policy_three.invoices().await.unwrap().len(), 12);
    }
}
