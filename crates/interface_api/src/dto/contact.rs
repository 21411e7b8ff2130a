//! Contact DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ContactId;
use domain_party::{Contact, ContactRole};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateContactRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    /// "Named Insured" or "Agent"
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: ContactId,
    pub name: String,
    pub role: ContactRole,
}

impl From<&Contact> for ContactResponse {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
            role: contact.role,
        }
    }
}
