//! Payment repository implementation

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use core_kernel::{ContactId, Currency, Money, PaymentId, PolicyId};
use domain_billing::Payment;

use crate::error::DatabaseError;

/// Database row for the `payments` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub policy_id: Uuid,
    pub contact_id: Uuid,
    pub amount_paid: Decimal,
    pub currency: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            policy_id: *payment.policy_id.as_uuid(),
            contact_id: *payment.contact_id.as_uuid(),
            amount_paid: payment.amount_paid.amount(),
            currency: payment.amount_paid.currency().code().to_string(),
            transaction_date: payment.transaction_date,
            created_at: payment.created_at,
        }
    }
}

impl PaymentRow {
    /// Converts the row back into a domain payment
    pub fn into_domain(self) -> Result<Payment, DatabaseError> {
        let currency: Currency = self
            .currency
            .trim()
            .parse()
            .map_err(|e| DatabaseError::corrupt("payments", e))?;

        Ok(Payment {
            id: PaymentId::from_uuid(self.id),
            policy_id: PolicyId::from_uuid(self.policy_id),
            contact_id: ContactId::from_uuid(self.contact_id),
            amount_paid: Money::new(self.amount_paid, currency),
            transaction_date: self.transaction_date,
            created_at: self.created_at,
        })
    }
}

/// Repository for the `payments` table
///
/// Reads accept any executor so they can run on the pool or inside a
/// snapshot transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentRepository;

impl PaymentRepository {
    /// Lists a policy's payments ordered by transaction date
    pub async fn list_for_policy<'e>(
        executor: impl PgExecutor<'e>,
        policy_id: Uuid,
    ) -> Result<Vec<PaymentRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT
                id, policy_id, contact_id, amount_paid, currency,
                transaction_date, created_at
            FROM payments
            WHERE policy_id = $1
            ORDER BY transaction_date, created_at
            "#,
        )
        .bind(policy_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Inserts one payment
    pub async fn insert(conn: &mut PgConnection, row: &PaymentRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, policy_id, contact_id, amount_paid, currency,
                transaction_date, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(row.id)
        .bind(row.policy_id)
        .bind(row.contact_id)
        .bind(row.amount_paid)
        .bind(&row.currency)
        .bind(row.transaction_date)
        .bind(row.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}
