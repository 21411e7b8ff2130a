//! Invoice repository implementation
//!
//! Invoices are never deleted. Regeneration flips the `deleted` flag on the
//! live set and inserts the replacement rows in the same transaction.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgExecutor};
use uuid::Uuid;

use core_kernel::{Currency, InvoiceId, Money, PolicyId};
use domain_billing::Invoice;

use crate::error::DatabaseError;

/// Database row for the `invoices` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct InvoiceRow {
    pub id: Uuid,
    pub policy_id: Uuid,
    pub bill_date: NaiveDate,
    pub due_date: NaiveDate,
    pub cancel_date: NaiveDate,
    pub amount_due: Decimal,
    pub currency: String,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Invoice> for InvoiceRow {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: *invoice.id.as_uuid(),
            policy_id: *invoice.policy_id.as_uuid(),
            bill_date: invoice.bill_date,
            due_date: invoice.due_date,
            cancel_date: invoice.cancel_date,
            amount_due: invoice.amount_due.amount(),
            currency: invoice.amount_due.currency().code().to_string(),
            deleted: invoice.deleted,
            created_at: invoice.created_at,
        }
    }
}

impl InvoiceRow {
    /// Converts the row back into a domain invoice
    pub fn into_domain(self) -> Result<Invoice, DatabaseError> {
        let currency: Currency = self
            .currency
            .trim()
            .parse()
            .map_err(|e| DatabaseError::corrupt("invoices", e))?;

        Ok(Invoice {
            id: InvoiceId::from_uuid(self.id),
            policy_id: PolicyId::from_uuid(self.policy_id),
            bill_date: self.bill_date,
            due_date: self.due_date,
            cancel_date: self.cancel_date,
            amount_due: Money::new(self.amount_due, currency),
            deleted: self.deleted,
            created_at: self.created_at,
        })
    }
}

/// Repository for the `invoices` table
///
/// Reads accept any executor so they can run on the pool or inside a
/// snapshot transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceRepository;

impl InvoiceRepository {
    /// Lists a policy's invoices, optionally including tombstones
    pub async fn list_for_policy<'e>(
        executor: impl PgExecutor<'e>,
        policy_id: Uuid,
        include_deleted: bool,
    ) -> Result<Vec<InvoiceRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT
                id, policy_id, bill_date, due_date, cancel_date,
                amount_due, currency, deleted, created_at
            FROM invoices
            WHERE policy_id = $1 AND ($2 OR NOT deleted)
            ORDER BY bill_date, created_at
            "#,
        )
        .bind(policy_id)
        .bind(include_deleted)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Marks every live invoice of the policy as deleted
    ///
    /// Returns the number of rows tombstoned.
    pub async fn tombstone_live(
        conn: &mut PgConnection,
        policy_id: Uuid,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            "UPDATE invoices SET deleted = TRUE WHERE policy_id = $1 AND NOT deleted",
        )
        .bind(policy_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Inserts one invoice
    pub async fn insert(conn: &mut PgConnection, row: &InvoiceRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, policy_id, bill_date, due_date, cancel_date,
                amount_due, currency, deleted, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(row.id)
        .bind(row.policy_id)
        .bind(row.bill_date)
        .bind(row.due_date)
        .bind(row.cancel_date)
        .bind(row.amount_due)
        .bind(&row.currency)
        .bind(row.deleted)
        .bind(row.created_at)
        .execute(conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_row_round_trip() {
        let bill_date = NaiveDate::from_ymd_opt(2015, 1, 31).unwrap();
        let invoice =
            Invoice::new(PolicyId::new(), bill_date, Money::new(dec!(100), Currency::EUR))
                .unwrap();

        let row = InvoiceRow::from(&invoice);
        assert_eq!(row.currency, "EUR");
        assert_eq!(row.due_date, NaiveDate::from_ymd_opt(2015, 2, 28).unwrap());
        assert!(!row.deleted);
        assert_eq!(row.into_domain().unwrap(), invoice);
    }

    #[test]
    fn test_tombstone_flag_survives() {
        let mut invoice = Invoice::new(
            PolicyId::new(),
            NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            Money::new(dec!(50), Currency::USD),
        )
        .unwrap();
        invoice.tombstone();

        let restored = InvoiceRow::from(&invoice).into_domain().unwrap();
        assert!(!restored.is_live());
    }
}
