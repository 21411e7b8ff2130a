//! Billing Domain Ports
//!
//! The `AccountingStore` trait is everything the accounting controller needs
//! from persistence. Adapters:
//!
//! - **PostgreSQL**: `infra_db::PostgresAccountingStore`
//! - **In-memory**: [`mock::InMemoryAccountingStore`], for tests and demos
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::{AccountingStore, PolicyAccounting};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn AccountingStore> = Arc::new(PostgresAccountingStore::new(pool));
//! let accounting = PolicyAccounting::load(store, policy_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{ContactId, DomainPort, HealthCheckable, PolicyId, PortError};
use domain_party::Contact;
use domain_policy::Policy;

use crate::invoice::Invoice;
use crate::payment::Payment;

/// Live invoices and payments of one policy, read in one unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountingSnapshot {
    /// Non-deleted invoices ordered by bill date
    pub invoices: Vec<Invoice>,
    /// Payments ordered by transaction date
    pub payments: Vec<Payment>,
}

/// Persistence port for policy accounting
///
/// Each method is one unit of work. The policy writes (`regenerate_invoices`,
/// `record_cancellation` and `record_payment`) check the stored status in the
/// same unit and return `PortError::Conflict` when the stored policy is
/// already canceled, so a cancellation never gets overwritten by a handle
/// that read the policy earlier.
#[async_trait]
pub trait AccountingStore: DomainPort + HealthCheckable {
    // ========================================================================
    // Policies
    // ========================================================================

    /// Retrieves a policy by ID, or `PortError::NotFound`
    async fn get_policy(&self, id: PolicyId) -> Result<Policy, PortError>;

    /// Retrieves a policy by its policy number, or `PortError::NotFound`
    async fn find_policy_by_number(&self, policy_number: &str) -> Result<Policy, PortError>;

    /// Inserts or updates a policy
    ///
    /// Returns `PortError::Conflict` if another policy already uses the
    /// same policy number.
    async fn save_policy(&self, policy: &Policy) -> Result<(), PortError>;

    /// Writes the cancel date, reason and Canceled status of `policy`
    ///
    /// Leaves every other column alone.
    async fn record_cancellation(&self, policy: &Policy) -> Result<(), PortError>;

    // ========================================================================
    // Contacts
    // ========================================================================

    /// Retrieves a contact by ID, or `PortError::NotFound`
    async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError>;

    /// Inserts or updates a contact
    async fn save_contact(&self, contact: &Contact) -> Result<(), PortError>;

    // ========================================================================
    // Invoices
    // ========================================================================

    /// Lists the policy's non-deleted invoices ordered by bill date
    async fn list_live_invoices(&self, policy_id: PolicyId) -> Result<Vec<Invoice>, PortError>;

    /// Lists every invoice ever generated for the policy, tombstones included
    async fn list_all_invoices(&self, policy_id: PolicyId) -> Result<Vec<Invoice>, PortError>;

    /// Reads live invoices and payments together
    async fn load_snapshot(&self, policy_id: PolicyId) -> Result<AccountingSnapshot, PortError>;

    /// Stores the billing schedule of `policy`, tombstones its live invoices
    /// and inserts `invoices` as the new live set, all in one unit
    async fn regenerate_invoices(
        &self,
        policy: &Policy,
        invoices: &[Invoice],
    ) -> Result<(), PortError>;

    // ========================================================================
    // Payments
    // ========================================================================

    /// Lists the policy's payments ordered by transaction date
    async fn list_payments(&self, policy_id: PolicyId) -> Result<Vec<Payment>, PortError>;

    /// Records a payment against an open policy
    async fn record_payment(&self, payment: &Payment) -> Result<(), PortError>;
}

/// In-memory implementation of AccountingStore
///
/// All state sits behind one lock so every method is atomic.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    #[derive(Debug, Default)]
    struct State {
        policies: HashMap<PolicyId, Policy>,
        contacts: HashMap<ContactId, Contact>,
        invoices: HashMap<PolicyId, Vec<Invoice>>,
        payments: HashMap<PolicyId, Vec<Payment>>,
    }

    impl State {
        /// The stored policy, if it exists and is not canceled
        fn open_policy(&mut self, id: PolicyId) -> Result<&mut Policy, PortError> {
            let policy = self
                .policies
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Policy", id))?;
            if policy.is_canceled() {
                return Err(PortError::conflict(format!("policy {} is canceled", id)));
            }
            Ok(policy)
        }

        fn live_invoices(&self, id: PolicyId) -> Vec<Invoice> {
            let mut live: Vec<Invoice> = self
                .invoices
                .get(&id)
                .map(|all| all.iter().filter(|i| i.is_live()).cloned().collect())
                .unwrap_or_default();
            live.sort_by_key(|i| i.bill_date);
            live
        }

        fn payments(&self, id: PolicyId) -> Vec<Payment> {
            let mut payments = self.payments.get(&id).cloned().unwrap_or_default();
            payments.sort_by_key(|p| p.transaction_date);
            payments
        }
    }

    /// In-memory store backed by hash maps
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryAccountingStore {
        state: Arc<RwLock<State>>,
    }

    impl InMemoryAccountingStore {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with contacts for testing
        pub async fn with_contacts(contacts: Vec<Contact>) -> Self {
            let store = Self::new();
            {
                let mut state = store.state.write().await;
                for contact in contacts {
                    state.contacts.insert(contact.id, contact);
                }
            }
            store
        }
    }

    impl DomainPort for InMemoryAccountingStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryAccountingStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-accounting-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl AccountingStore for InMemoryAccountingStore {
        async fn get_policy(&self, id: PolicyId) -> Result<Policy, PortError> {
            self.state
                .read()
                .await
                .policies
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Policy", id))
        }

        async fn find_policy_by_number(&self, policy_number: &str) -> Result<Policy, PortError> {
            self.state
                .read()
                .await
                .policies
                .values()
                .find(|p| p.policy_number == policy_number)
                .cloned()
                .ok_or_else(|| PortError::not_found("Policy", policy_number))
        }

        async fn save_policy(&self, policy: &Policy) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            let duplicate = state
                .policies
                .values()
                .any(|p| p.policy_number == policy.policy_number && p.id != policy.id);
            if duplicate {
                return Err(PortError::conflict(format!(
                    "policy number '{}' is already in use",
                    policy.policy_number
                )));
            }
            state.policies.insert(policy.id, policy.clone());
            Ok(())
        }

        async fn record_cancellation(&self, policy: &Policy) -> Result<(), PortError> {
            if !policy.is_canceled() {
                return Err(PortError::validation_field(
                    "policy to record is not canceled",
                    "status",
                ));
            }
            let mut state = self.state.write().await;
            let stored = state.open_policy(policy.id)?;
            stored.status = policy.status;
            stored.cancel_date = policy.cancel_date;
            stored.cancel_reason = policy.cancel_reason.clone();
            stored.updated_at = policy.updated_at;
            Ok(())
        }

        async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError> {
            self.state
                .read()
                .await
                .contacts
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Contact", id))
        }

        async fn save_contact(&self, contact: &Contact) -> Result<(), PortError> {
            self.state
                .write()
                .await
                .contacts
                .insert(contact.id, contact.clone());
            Ok(())
        }

        async fn list_live_invoices(&self, policy_id: PolicyId) -> Result<Vec<Invoice>, PortError> {
            Ok(self.state.read().await.live_invoices(policy_id))
        }

        async fn list_all_invoices(&self, policy_id: PolicyId) -> Result<Vec<Invoice>, PortError> {
            Ok(self
                .state
                .read()
                .await
                .invoices
                .get(&policy_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn regenerate_invoices(
            &self,
            policy: &Policy,
            invoices: &[Invoice],
        ) -> Result<(), PortError> {
            if invoices.iter().any(|i| i.policy_id != policy.id) {
                return Err(PortError::validation_field(
                    "invoice belongs to a different policy",
                    "policy_id",
                ));
            }

            let mut state = self.state.write().await;
            let stored = state.open_policy(policy.id)?;
            stored.billing_schedule = policy.billing_schedule;
            stored.updated_at = policy.updated_at;

            let existing = state.invoices.entry(policy.id).or_default();
            existing.iter_mut().for_each(Invoice::tombstone);
            existing.extend(invoices.iter().cloned());
            Ok(())
        }

        async fn load_snapshot(&self, policy_id: PolicyId) -> Result<AccountingSnapshot, PortError> {
            let state = self.state.read().await;
            Ok(AccountingSnapshot {
                invoices: state.live_invoices(policy_id),
                payments: state.payments(policy_id),
            })
        }

        async fn list_payments(&self, policy_id: PolicyId) -> Result<Vec<Payment>, PortError> {
            Ok(self.state.read().await.payments(policy_id))
        }

        async fn record_payment(&self, payment: &Payment) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            state.open_policy(payment.policy_id)?;
            if !state.contacts.contains_key(&payment.contact_id) {
                return Err(PortError::not_found("Contact", payment.contact_id));
            }
            state
                .payments
                .entry(payment.policy_id)
                .or_default()
                .push(payment.clone());
            Ok(())
        }
    }
}
