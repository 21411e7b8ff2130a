//! Policy repository implementation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{ContactId, Currency, Money, PolicyId};
use domain_policy::{BillingSchedule, Policy, PolicyStatus};

use crate::error::DatabaseError;

const POLICY_COLUMNS: &str = r#"
    id, policy_number, effective_date, status, billing_schedule,
    annual_premium, currency, named_insured, agent,
    cancel_date, cancel_reason, created_at, updated_at
"#;

/// Database row for the `policies` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PolicyRow {
    pub id: Uuid,
    pub policy_number: String,
    pub effective_date: NaiveDate,
    pub status: String,
    pub billing_schedule: String,
    pub annual_premium: Decimal,
    pub currency: String,
    pub named_insured: Option<Uuid>,
    pub agent: Option<Uuid>,
    pub cancel_date: Option<NaiveDate>,
    pub cancel_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Policy> for PolicyRow {
    fn from(policy: &Policy) -> Self {
        Self {
            id: *policy.id.as_uuid(),
            policy_number: policy.policy_number.clone(),
            effective_date: policy.effective_date,
            status: policy.status.as_str().to_string(),
            billing_schedule: policy.billing_schedule.as_str().to_string(),
            annual_premium: policy.annual_premium.amount(),
            currency: policy.currency().code().to_string(),
            named_insured: policy.named_insured.map(Uuid::from),
            agent: policy.agent.map(Uuid::from),
            cancel_date: policy.cancel_date,
            cancel_reason: policy.cancel_reason.clone(),
            created_at: policy.created_at,
            updated_at: policy.updated_at,
        }
    }
}

impl PolicyRow {
    /// Converts the row back into a validated domain policy
    pub fn into_domain(self) -> Result<Policy, DatabaseError> {
        let corrupt = |e: &dyn std::fmt::Display| DatabaseError::corrupt("policies", e);

        let status: PolicyStatus = self.status.parse().map_err(|e| corrupt(&e))?;
        let billing_schedule: BillingSchedule =
            self.billing_schedule.parse().map_err(|e| corrupt(&e))?;
        let currency: Currency = self.currency.trim().parse().map_err(|e| corrupt(&e))?;

        let policy = Policy {
            id: PolicyId::from_uuid(self.id),
            policy_number: self.policy_number,
            effective_date: self.effective_date,
            status,
            billing_schedule,
            annual_premium: Money::new(self.annual_premium, currency),
            named_insured: self.named_insured.map(ContactId::from_uuid),
            agent: self.agent.map(ContactId::from_uuid),
            cancel_date: self.cancel_date,
            cancel_reason: self.cancel_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        policy.validate().map_err(|e| corrupt(&e))?;
        Ok(policy)
    }
}

/// Repository for the `policies` table
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Creates a new PolicyRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a policy row by ID
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no policy has this ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<PolicyRow, DatabaseError> {
        let query = format!("SELECT {POLICY_COLUMNS} FROM policies WHERE id = $1");
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Policy", id))
    }

    /// Retrieves a policy row by its policy number
    pub async fn find_by_number(&self, policy_number: &str) -> Result<PolicyRow, DatabaseError> {
        let query = format!("SELECT {POLICY_COLUMNS} FROM policies WHERE policy_number = $1");
        sqlx::query_as::<_, PolicyRow>(&query)
            .bind(policy_number)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Policy", policy_number))
    }

    /// Inserts the policy, or updates every mutable column if it exists
    ///
    /// A policy number already used by a different policy violates the
    /// unique constraint and surfaces as `DatabaseError::DuplicateEntry`.
    pub async fn upsert(conn: &mut PgConnection, row: &PolicyRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO policies (
                id, policy_number, effective_date, status, billing_schedule,
                annual_premium, currency, named_insured, agent,
                cancel_date, cancel_reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (id) DO UPDATE SET
                policy_number = EXCLUDED.policy_number,
                effective_date = EXCLUDED.effective_date,
                status = EXCLUDED.status,
                billing_schedule = EXCLUDED.billing_schedule,
                annual_premium = EXCLUDED.annual_premium,
                currency = EXCLUDED.currency,
                named_insured = EXCLUDED.named_insured,
                agent = EXCLUDED.agent,
                cancel_date = EXCLUDED.cancel_date,
                cancel_reason = EXCLUDED.cancel_reason,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(row.id)
        .bind(&row.policy_number)
        .bind(row.effective_date)
        .bind(&row.status)
        .bind(&row.billing_schedule)
        .bind(row.annual_premium)
        .bind(&row.currency)
        .bind(row.named_insured)
        .bind(row.agent)
        .bind(row.cancel_date)
        .bind(&row.cancel_reason)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Locks the policy row for the rest of the transaction and returns its
    /// status
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no policy has this ID
    pub async fn lock_status(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<PolicyStatus, DatabaseError> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM policies WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Policy", id))?;

        status
            .parse()
            .map_err(|e| DatabaseError::corrupt("policies", e))
    }

    /// Writes only the billing schedule
    pub async fn update_schedule(conn: &mut PgConnection, row: &PolicyRow) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE policies SET billing_schedule = $2, updated_at = $3 WHERE id = $1")
            .bind(row.id)
            .bind(&row.billing_schedule)
            .bind(row.updated_at)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Writes only the cancellation columns
    pub async fn mark_canceled(conn: &mut PgConnection, row: &PolicyRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE policies
            SET status = $2, cancel_date = $3, cancel_reason = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(row.id)
        .bind(&row.status)
        .bind(row.cancel_date)
        .bind(&row.cancel_reason)
        .bind(row.updated_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
