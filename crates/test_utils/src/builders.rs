//! Test Data Builders
//!
//! Provides builders with sensible defaults so tests specify only the
//! fields they care about.

use chrono::NaiveDate;
use core_kernel::{ContactId, Money};
use domain_billing::{InMemoryAccountingStore, PolicyAccounting};
use domain_party::Contact;
use domain_policy::{BillingSchedule, Policy, PolicyBuilder};
use fake::Fake;
use std::sync::Arc;

use crate::fixtures::{ContactFixtures, MoneyFixtures, TemporalFixtures};

/// Builder for constructing test policies
pub struct TestPolicyBuilder {
    policy_number: String,
    effective_date: NaiveDate,
    annual_premium: Money,
    billing_schedule: BillingSchedule,
    named_insured: Option<ContactId>,
    agent: Option<ContactId>,
}

impl Default for TestPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPolicyBuilder {
    /// Creates a new builder: $1200 annual premium effective 2015-01-01
    pub fn new() -> Self {
        let suffix: u32 = (10_000..99_999).fake();
        Self {
            policy_number: format!("Policy {}", suffix),
            effective_date: TemporalFixtures::jan_1(),
            annual_premium: MoneyFixtures::usd_1200(),
            billing_schedule: BillingSchedule::Annual,
            named_insured: None,
            agent: None,
        }
    }

    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = number.into();
        self
    }

    pub fn with_effective_date(mut self, date: NaiveDate) -> Self {
        self.effective_date = date;
        self
    }

    pub fn with_premium(mut self, premium: Money) -> Self {
        self.annual_premium = premium;
        self
    }

    pub fn with_schedule(mut self, schedule: BillingSchedule) -> Self {
        self.billing_schedule = schedule;
        self
    }

    pub fn with_named_insured(mut self, contact_id: ContactId) -> Self {
        self.named_insured = Some(contact_id);
        self
    }

    pub fn with_agent(mut self, contact_id: ContactId) -> Self {
        self.agent = Some(contact_id);
        self
    }

    /// Builds the policy
    ///
    /// # Panics
    ///
    /// Panics if the configured fields fail policy validation.
    pub fn build(self) -> Policy {
        let mut builder = PolicyBuilder::new()
            .policy_number(self.policy_number)
            .effective_date(self.effective_date)
            .annual_premium(self.annual_premium)
            .billing_schedule(self.billing_schedule);
        if let Some(id) = self.named_insured {
            builder = builder.named_insured(id);
        }
        if let Some(id) = self.agent {
            builder = builder.agent(id);
        }
        builder
            .build()
            .unwrap_or_else(|e| panic!("test policy failed validation: {}", e))
    }
}

/// A store holding one policy with a named insured and an agent
pub struct AccountingScenario {
    pub store: Arc<InMemoryAccountingStore>,
    pub insured: Contact,
    pub agent: Contact,
    pub policy: Policy,
}

impl AccountingScenario {
    /// Creates the contacts and the policy built from `builder`, then loads
    /// it so its invoices are generated
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store rejects the policy.
    pub async fn new(builder: TestPolicyBuilder) -> Self {
        let insured_name: String = fake::faker::name::en::Name().fake();
        let agent_name: String = fake::faker::name::en::Name().fake();
        let insured = ContactFixtures::named_insured(&insured_name);
        let agent = ContactFixtures::agent(&agent_name);

        let store = Arc::new(
            InMemoryAccountingStore::with_contacts(vec![insured.clone(), agent.clone()]).await,
        );
        let policy = builder
            .with_named_insured(insured.id)
            .with_agent(agent.id)
            .build();

        PolicyAccounting::create_policy(store.clone(), policy.clone())
            .await
            .unwrap_or_else(|e| panic!("scenario policy rejected: {}", e));

        Self {
            store,
            insured,
            agent,
            policy,
        }
    }

    /// Opens a fresh accounting handle on the scenario policy
    ///
    /// # Panics
    ///
    /// Panics if the policy cannot be loaded.
    pub async fn accounting(&self) -> PolicyAccounting {
        PolicyAccounting::load(self.store.clone(), self.policy.id)
            .await
            .unwrap_or_else(|e| panic!("scenario policy failed to load: {}", e))
    }
}
