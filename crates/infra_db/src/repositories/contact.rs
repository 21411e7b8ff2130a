//! Contact repository implementation

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use core_kernel::ContactId;
use domain_party::{Contact, ContactRole};

use crate::error::DatabaseError;

/// Database row for the `contacts` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: *contact.id.as_uuid(),
            name: contact.name.clone(),
            role: contact.role.as_str().to_string(),
            created_at: contact.created_at,
        }
    }
}

impl ContactRow {
    /// Converts the row back into a domain contact
    pub fn into_domain(self) -> Result<Contact, DatabaseError> {
        let role: ContactRole = self
            .role
            .parse()
            .map_err(|e| DatabaseError::corrupt("contacts", e))?;

        let contact = Contact {
            id: ContactId::from_uuid(self.id),
            name: self.name,
            role,
            created_at: self.created_at,
        };
        contact
            .validate()
            .map_err(|e| DatabaseError::corrupt("contacts", e))?;
        Ok(contact)
    }
}

/// Repository for the `contacts` table
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Creates a new ContactRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a contact row by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<ContactRow, DatabaseError> {
        sqlx::query_as::<_, ContactRow>(
            "SELECT id, name, role, created_at FROM contacts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Contact", id))
    }

    /// Inserts the contact, or updates its name and role if it exists
    pub async fn upsert(&self, row: &ContactRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, role, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                role = EXCLUDED.role
            "#,
        )
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.role)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
