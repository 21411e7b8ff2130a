//! Policy Lifecycle Controller
//!
//! [`PolicyAccounting`] is a handle on one policy. Loading it bootstraps the
//! invoice schedule if none exists; balance and delinquency queries read one
//! snapshot of invoices and payments and delegate to the pure functions in
//! [`balance`](crate::balance) and [`delinquency`](crate::delinquency).
//! Mutations go through the [`AccountingStore`] one atomic unit at a time;
//! a write the store rejects because the policy was canceled meanwhile
//! surfaces as `PolicyCanceled`.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{ContactId, Money, MoneyError, PolicyId, PortError, Timezone};
use domain_party::{Contact, ContactRole};
use domain_policy::{BillingSchedule, Policy, PolicyEvent};

use crate::balance::account_balance;
use crate::delinquency::{self, CancellationAssessment};
use crate::error::BillingError;
use crate::generator::generate_invoices;
use crate::invoice::Invoice;
use crate::payment::Payment;
use crate::ports::{AccountingSnapshot, AccountingStore};

/// Accounting handle for a single, non-canceled policy
pub struct PolicyAccounting {
    store: Arc<dyn AccountingStore>,
    policy: Policy,
    timezone: Timezone,
}

impl std::fmt::Debug for PolicyAccounting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyAccounting")
            .field("policy_id", &self.policy.id)
            .field("policy_number", &self.policy.policy_number)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl PolicyAccounting {
    /// Loads a policy, generating its invoices if it has none
    ///
    /// # Errors
    ///
    /// - `PolicyNotFound` if no policy has this ID
    /// - `PolicyCanceled` if the policy is canceled
    #[instrument(skip(store), fields(policy_id = %policy_id))]
    pub async fn load(
        store: Arc<dyn AccountingStore>,
        policy_id: PolicyId,
    ) -> Result<Self, BillingError> {
        let policy = store
            .get_policy(policy_id)
            .await
            .map_err(|e| policy_lookup_error(e, policy_id))?;
        Self::bootstrap(store, policy).await
    }

    /// Loads a policy by its policy number
    #[instrument(skip(store))]
    pub async fn load_by_number(
        store: Arc<dyn AccountingStore>,
        policy_number: &str,
    ) -> Result<Self, BillingError> {
        let policy = store
            .find_policy_by_number(policy_number)
            .await
            .map_err(|e| policy_lookup_error(e, policy_number))?;
        Self::bootstrap(store, policy).await
    }

    /// Persists a new policy and bootstraps its invoices
    ///
    /// Any contacts the policy points at must exist and hold the matching
    /// role; a missing one is a `Validation` error, not `ContactNotFound`.
    #[instrument(skip(store, policy), fields(policy_number = %policy.policy_number))]
    pub async fn create_policy(
        store: Arc<dyn AccountingStore>,
        policy: Policy,
    ) -> Result<Self, BillingError> {
        policy.validate()?;
        if let Some(id) = policy.named_insured {
            ensure_role(store.as_ref(), id, ContactRole::NamedInsured).await?;
        }
        if let Some(id) = policy.agent {
            ensure_role(store.as_ref(), id, ContactRole::Agent).await?;
        }

        store.save_policy(&policy).await?;
        info!(policy_id = %policy.id, "Policy created");

        Self::bootstrap(store, policy).await
    }

    async fn bootstrap(
        store: Arc<dyn AccountingStore>,
        policy: Policy,
    ) -> Result<Self, BillingError> {
        policy.ensure_not_canceled()?;

        if store.list_live_invoices(policy.id).await?.is_empty() {
            let invoices = generate_invoices(&policy)?;
            if let Err(e) = store.regenerate_invoices(&policy, &invoices).await {
                return Err(rejected_write(store.as_ref(), policy.id, e).await);
            }
            info!(
                policy_id = %policy.id,
                count = invoices.len(),
                "Bootstrapped invoice schedule"
            );
        }

        Ok(Self {
            store,
            policy,
            timezone: Timezone::default(),
        })
    }

    /// Sets the timezone that decides which day "today" is
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Returns the policy as last read or written by this handle
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Lists live invoices in bill-date order
    pub async fn invoices(&self) -> Result<Vec<Invoice>, BillingError> {
        Ok(self.store.list_live_invoices(self.policy.id).await?)
    }

    /// Lists every invoice, including ones replaced by schedule switches
    pub async fn invoice_history(&self) -> Result<Vec<Invoice>, BillingError> {
        Ok(self.store.list_all_invoices(self.policy.id).await?)
    }

    /// Lists payments in transaction-date order
    pub async fn payments(&self) -> Result<Vec<Payment>, BillingError> {
        Ok(self.store.list_payments(self.policy.id).await?)
    }

    /// Reads live invoices and payments in one store unit
    pub async fn snapshot(&self) -> Result<AccountingSnapshot, BillingError> {
        Ok(self.store.load_snapshot(self.policy.id).await?)
    }

    /// Balance owed on `as_of`, today if omitted
    #[instrument(skip(self), fields(policy_id = %self.policy.id))]
    pub async fn balance(&self, as_of: Option<NaiveDate>) -> Result<Money, BillingError> {
        let as_of = self.timezone.resolve(as_of);
        let snapshot = self.snapshot().await?;
        account_balance(self.policy.currency(), &snapshot.invoices, &snapshot.payments, as_of)
    }

    /// Whether the policy is past due but not yet at a cancel date on `as_of`
    #[instrument(skip(self), fields(policy_id = %self.policy.id))]
    pub async fn pending_non_pay(&self, as_of: Option<NaiveDate>) -> Result<bool, BillingError> {
        let as_of = self.timezone.resolve(as_of);
        let snapshot = self.snapshot().await?;
        delinquency::pending_non_pay(
            self.policy.currency(),
            &snapshot.invoices,
            &snapshot.payments,
            as_of,
        )
    }

    /// Which invoice, if any, makes the policy cancelable on `as_of`
    #[instrument(skip(self), fields(policy_id = %self.policy.id))]
    pub async fn cancellation_assessment(
        &self,
        as_of: Option<NaiveDate>,
    ) -> Result<Option<CancellationAssessment>, BillingError> {
        let as_of = self.timezone.resolve(as_of);
        let snapshot = self.snapshot().await?;
        let assessment = delinquency::evaluate_cancellation(
            self.policy.currency(),
            &snapshot.invoices,
            &snapshot.payments,
            as_of,
        )?;

        if let Some(ref found) = assessment {
            warn!(
                policy_id = %self.policy.id,
                invoice_id = %found.invoice_id,
                outstanding = %found.outstanding,
                "Policy is eligible for cancellation"
            );
        }
        Ok(assessment)
    }

    /// Whether the policy should be canceled on `as_of`
    ///
    /// Advisory only; call [`cancel_policy`](Self::cancel_policy) to act on it.
    pub async fn should_cancel(&self, as_of: Option<NaiveDate>) -> Result<bool, BillingError> {
        Ok(self.cancellation_assessment(as_of).await?.is_some())
    }

    /// Records a payment on the policy
    ///
    /// The payer defaults to the named insured. While the policy is pending
    /// cancellation for non-payment only an agent may pay.
    ///
    /// # Errors
    ///
    /// - `PolicyCanceled` if the policy was canceled through another handle
    /// - `ContactNotFound` if no payer can be resolved
    /// - `PaymentNotAllowed` if the policy is past due and the payer is not an agent
    /// - `Validation` / `Money` if the amount is not positive or in another currency
    #[instrument(skip(self, amount), fields(policy_id = %self.policy.id, amount = %amount))]
    pub async fn make_payment(
        &mut self,
        contact_id: Option<ContactId>,
        as_of: Option<NaiveDate>,
        amount: Money,
    ) -> Result<Payment, BillingError> {
        self.refresh().await?;
        let as_of = self.timezone.resolve(as_of);

        let contact_id = contact_id
            .or(self.policy.named_insured)
            .ok_or_else(|| BillingError::ContactNotFound("no payer and no named insured".to_string()))?;
        let contact = self.contact(contact_id).await?;

        if self.pending_non_pay(Some(as_of)).await? && !contact.is_agent() {
            warn!(
                contact_id = %contact.id,
                role = %contact.role,
                "Rejected payment on policy pending cancellation"
            );
            return Err(BillingError::PaymentNotAllowed);
        }

        if amount.currency() != self.policy.currency() {
            return Err(MoneyError::CurrencyMismatch(
                self.policy.currency().to_string(),
                amount.currency().to_string(),
            )
            .into());
        }
        let payment = Payment::new(self.policy.id, contact.id, amount, as_of)?;
        if let Err(e) = self.store.record_payment(&payment).await {
            return Err(rejected_write(self.store.as_ref(), self.policy.id, e).await);
        }

        info!(
            payment_id = %payment.id,
            contact_id = %contact.id,
            transaction_date = %as_of,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Moves the policy to another billing schedule and regenerates its invoices
    ///
    /// Existing live invoices are tombstoned and replaced in one unit.
    #[instrument(skip(self), fields(policy_id = %self.policy.id))]
    pub async fn switch_billing_schedule(
        &mut self,
        new_schedule: &str,
    ) -> Result<Vec<Invoice>, BillingError> {
        let schedule: BillingSchedule = new_schedule.parse()?;
        self.refresh().await?;

        if schedule == self.policy.billing_schedule {
            return Err(BillingError::NoOpScheduleChange(schedule.to_string()));
        }

        let mut policy = self.policy.clone();
        let event = policy.change_billing_schedule(schedule)?;
        let invoices = generate_invoices(&policy)?;
        if let Err(e) = self.store.regenerate_invoices(&policy, &invoices).await {
            return Err(rejected_write(self.store.as_ref(), policy.id, e).await);
        }
        self.policy = policy;

        log_event(&event);
        Ok(invoices)
    }

    /// Cancels the policy, consuming this handle
    ///
    /// The cancel date defaults to today. Any later load of the policy fails
    /// with `PolicyCanceled`.
    #[instrument(skip(self), fields(policy_id = %self.policy.id))]
    pub async fn cancel_policy(
        mut self,
        reason: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Policy, BillingError> {
        self.refresh().await?;
        let cancel_date = self.timezone.resolve(as_of);

        let event = self.policy.cancel(reason, cancel_date)?;
        if let Err(e) = self.store.record_cancellation(&self.policy).await {
            return Err(rejected_write(self.store.as_ref(), self.policy.id, e).await);
        }

        log_event(&event);
        Ok(self.policy)
    }

    /// Re-reads the policy so a cancellation made elsewhere is honoured
    async fn refresh(&mut self) -> Result<(), BillingError> {
        let policy = self
            .store
            .get_policy(self.policy.id)
            .await
            .map_err(|e| policy_lookup_error(e, self.policy.id))?;
        policy.ensure_not_canceled()?;
        self.policy = policy;
        Ok(())
    }

    async fn contact(&self, id: ContactId) -> Result<Contact, BillingError> {
        match self.store.get_contact(id).await {
            Ok(contact) => Ok(contact),
            Err(e) if e.is_not_found() => Err(BillingError::ContactNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

fn policy_lookup_error(error: PortError, key: impl std::fmt::Display) -> BillingError {
    if error.is_not_found() {
        BillingError::PolicyNotFound(key.to_string())
    } else {
        BillingError::Store(error)
    }
}

/// Reports a write the store refused because the policy was canceled after
/// this handle read it as `PolicyCanceled`
async fn rejected_write(
    store: &dyn AccountingStore,
    policy_id: PolicyId,
    error: PortError,
) -> BillingError {
    if !matches!(error, PortError::Conflict { .. }) {
        return error.into();
    }
    match store.get_policy(policy_id).await {
        Ok(stored) => match stored.ensure_not_canceled() {
            Err(canceled) => {
                warn!(policy_id = %policy_id, "Write rejected; policy was canceled concurrently");
                canceled.into()
            }
            Ok(()) => error.into(),
        },
        Err(_) => error.into(),
    }
}

async fn ensure_role(
    store: &dyn AccountingStore,
    id: ContactId,
    role: ContactRole,
) -> Result<(), BillingError> {
    let contact = match store.get_contact(id).await {
        Ok(contact) => contact,
        Err(e) if e.is_not_found() => {
            return Err(BillingError::validation(format!(
                "{} contact {} does not exist",
                role, id
            )))
        }
        Err(e) => return Err(e.into()),
    };
    if contact.role != role {
        return Err(BillingError::validation(format!(
            "contact {} is a {}, expected {}",
            id, contact.role, role
        )));
    }
    Ok(())
}

fn log_event(event: &PolicyEvent) {
    debug!(event = ?event, "Policy event");
    info!(
        policy_id = %event.policy_id(),
        event_type = event.event_type(),
        "Policy updated"
    );
}
