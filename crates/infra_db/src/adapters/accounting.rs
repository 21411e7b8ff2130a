//! PostgreSQL Accounting Store
//!
//! Implements the billing domain's `AccountingStore` port on top of the
//! table repositories.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::PostgresAccountingStore;
//! use domain_billing::{AccountingStore, PolicyAccounting};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn AccountingStore> = Arc::new(PostgresAccountingStore::new(pool));
//! let accounting = PolicyAccounting::load(store, policy_id).await?;
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, ContactId, DomainPort, HealthCheckResult, HealthCheckable, PolicyId,
    PortError,
};
use domain_billing::{AccountingSnapshot, AccountingStore, Invoice, Payment};
use domain_party::Contact;
use domain_policy::{Policy, PolicyStatus};

use crate::error::{db_to_port_error, DatabaseError};
use crate::repositories::{
    ContactRepository, ContactRow, InvoiceRepository, InvoiceRow, PaymentRepository,
    PaymentRow, PolicyRepository, PolicyRow,
};

const ADAPTER_ID: &str = "postgres-accounting-store";

/// PostgreSQL-backed implementation of the AccountingStore port
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - `DatabaseError::DuplicateEntry` / `StaleWrite` -> `PortError::Conflict`
/// - Other errors -> `PortError::Internal`
///
/// Every write to an existing policy first takes `SELECT ... FOR UPDATE` on
/// its row and refuses to go on if the policy is canceled.
#[derive(Debug, Clone)]
pub struct PostgresAccountingStore {
    pool: PgPool,
    policies: PolicyRepository,
    contacts: ContactRepository,
}

impl PostgresAccountingStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            policies: PolicyRepository::new(pool.clone()),
            contacts: ContactRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn upsert_policy(&self, policy: &Policy) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        PolicyRepository::upsert(&mut *tx, &PolicyRow::from(policy)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_invoices(
        &self,
        policy: &Policy,
        invoices: &[Invoice],
    ) -> Result<u64, DatabaseError> {
        let policy_id = *policy.id.as_uuid();
        let mut tx = self.pool.begin().await?;

        lock_open_policy(&mut *tx, policy_id).await?;
        PolicyRepository::update_schedule(&mut *tx, &PolicyRow::from(policy)).await?;

        let tombstoned = InvoiceRepository::tombstone_live(&mut *tx, policy_id).await?;
        for invoice in invoices {
            InvoiceRepository::insert(&mut *tx, &InvoiceRow::from(invoice)).await?;
        }

        tx.commit().await.map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(tombstoned)
    }

    async fn write_cancellation(&self, policy: &Policy) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        lock_open_policy(&mut *tx, *policy.id.as_uuid()).await?;
        PolicyRepository::mark_canceled(&mut *tx, &PolicyRow::from(policy)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        lock_open_policy(&mut *tx, *payment.policy_id.as_uuid()).await?;
        PaymentRepository::insert(&mut *tx, &PaymentRow::from(payment)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn read_snapshot(
        &self,
        policy_id: uuid::Uuid,
    ) -> Result<(Vec<InvoiceRow>, Vec<PaymentRow>), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let invoices = InvoiceRepository::list_for_policy(&mut *tx, policy_id, false).await?;
        let payments = PaymentRepository::list_for_policy(&mut *tx, policy_id).await?;
        tx.commit().await?;
        Ok((invoices, payments))
    }
}

/// Takes the row lock and fails with `StaleWrite` if the policy is canceled
async fn lock_open_policy(conn: &mut PgConnection, policy_id: uuid::Uuid) -> Result<(), DatabaseError> {
    match PolicyRepository::lock_status(conn, policy_id).await? {
        PolicyStatus::Canceled => Err(DatabaseError::StaleWrite(format!(
            "policy {} is canceled",
            policy_id
        ))),
        _ => Ok(()),
    }
}

fn to_port<T>(result: Result<T, DatabaseError>) -> Result<T, PortError> {
    result.map_err(db_to_port_error)
}

fn convert_all<R, T>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, DatabaseError>,
) -> Result<Vec<T>, PortError> {
    to_port(rows.into_iter().map(convert).collect())
}

impl DomainPort for PostgresAccountingStore {}

#[async_trait]
impl HealthCheckable for PostgresAccountingStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl AccountingStore for PostgresAccountingStore {
    #[instrument(skip(self), fields(policy_id = %id))]
    async fn get_policy(&self, id: PolicyId) -> Result<Policy, PortError> {
        debug!("Fetching policy");
        let row = to_port(self.policies.find_by_id(*id.as_uuid()).await)?;
        to_port(row.into_domain())
    }

    #[instrument(skip(self))]
    async fn find_policy_by_number(&self, policy_number: &str) -> Result<Policy, PortError> {
        debug!("Fetching policy by number");
        let row = to_port(self.policies.find_by_number(policy_number).await)?;
        to_port(row.into_domain())
    }

    #[instrument(skip(self, policy), fields(policy_id = %policy.id))]
    async fn save_policy(&self, policy: &Policy) -> Result<(), PortError> {
        debug!(status = %policy.status, schedule = %policy.billing_schedule, "Saving policy");
        to_port(self.upsert_policy(policy).await)
    }

    #[instrument(skip(self, policy), fields(policy_id = %policy.id))]
    async fn record_cancellation(&self, policy: &Policy) -> Result<(), PortError> {
        if !policy.is_canceled() {
            return Err(PortError::validation_field(
                "policy to record is not canceled",
                "status",
            ));
        }
        debug!(cancel_date = ?policy.cancel_date, "Recording cancellation");
        to_port(self.write_cancellation(policy).await)
    }

    #[instrument(skip(self), fields(contact_id = %id))]
    async fn get_contact(&self, id: ContactId) -> Result<Contact, PortError> {
        debug!("Fetching contact");
        let row = to_port(self.contacts.find_by_id(*id.as_uuid()).await)?;
        to_port(row.into_domain())
    }

    #[instrument(skip(self, contact), fields(contact_id = %contact.id))]
    async fn save_contact(&self, contact: &Contact) -> Result<(), PortError> {
        debug!(role = %contact.role, "Saving contact");
        to_port(self.contacts.upsert(&ContactRow::from(contact)).await)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id))]
    async fn list_live_invoices(&self, policy_id: PolicyId) -> Result<Vec<Invoice>, PortError> {
        let rows = to_port(
            InvoiceRepository::list_for_policy(&self.pool, *policy_id.as_uuid(), false).await,
        )?;
        debug!(count = rows.len(), "Fetched live invoices");
        convert_all(rows, InvoiceRow::into_domain)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id))]
    async fn list_all_invoices(&self, policy_id: PolicyId) -> Result<Vec<Invoice>, PortError> {
        let rows = to_port(
            InvoiceRepository::list_for_policy(&self.pool, *policy_id.as_uuid(), true).await,
        )?;
        debug!(count = rows.len(), "Fetched invoice history");
        convert_all(rows, InvoiceRow::into_domain)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id))]
    async fn load_snapshot(&self, policy_id: PolicyId) -> Result<AccountingSnapshot, PortError> {
        let (invoices, payments) = to_port(self.read_snapshot(*policy_id.as_uuid()).await)?;
        debug!(
            invoices = invoices.len(),
            payments = payments.len(),
            "Fetched accounting snapshot"
        );
        Ok(AccountingSnapshot {
            invoices: convert_all(invoices, InvoiceRow::into_domain)?,
            payments: convert_all(payments, PaymentRow::into_domain)?,
        })
    }

    #[instrument(skip(self, policy, invoices), fields(policy_id = %policy.id, count = invoices.len()))]
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

        let tombstoned = to_port(self.replace_invoices(policy, invoices).await)?;
        debug!(tombstoned, "Regenerated invoices");
        Ok(())
    }

    #[instrument(skip(self), fields(policy_id = %policy_id))]
    async fn list_payments(&self, policy_id: PolicyId) -> Result<Vec<Payment>, PortError> {
        let rows = to_port(PaymentRepository::list_for_policy(&self.pool, *policy_id.as_uuid()).await)?;
        debug!(count = rows.len(), "Fetched payments");
        convert_all(rows, PaymentRow::into_domain)
    }

    #[instrument(skip(self, payment), fields(policy_id = %payment.policy_id, payment_id = %payment.id))]
    async fn record_payment(&self, payment: &Payment) -> Result<(), PortError> {
        debug!(amount = %payment.amount_paid, "Recording payment");
        to_port(self.insert_payment(payment).await)
    }
}
