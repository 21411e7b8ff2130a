//! Contact entity
//!
//! A contact is a named person with a single role. Policies point at two
//! contacts (named insured and agent) and every payment names its payer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use core_kernel::ContactId;
use crate::error::PartyError;

/// The role a contact plays on the policies it is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactRole {
    /// The policy owner
    #[serde(rename = "Named Insured")]
    NamedInsured,
    /// The agent servicing the policy
    #[serde(rename = "Agent")]
    Agent,
}

impl ContactRole {
    /// Returns the display name used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactRole::NamedInsured => "Named Insured",
            ContactRole::Agent => "Agent",
        }
    }

    /// Agents may pay on a policy even while it is pending cancellation
    pub fn is_agent(&self) -> bool {
        matches!(self, ContactRole::Agent)
    }
}

impl fmt::Display for ContactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactRole {
    type Err = PartyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Named Insured" => Ok(ContactRole::NamedInsured),
            "Agent" => Ok(ContactRole::Agent),
            other => Err(PartyError::UnknownRole(other.to_string())),
        }
    }
}

/// A person attached to one or more policies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Contact {
    pub id: ContactId,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub role: ContactRole,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Creates a new contact, rejecting blank names
    pub fn new(name: impl Into<String>, role: ContactRole) -> Result<Self, PartyError> {
        let contact = Self {
            id: ContactId::new_v7(),
            name: name.into().trim().to_string(),
            role,
            created_at: Utc::now(),
        };
        contact.ensure_valid()?;
        Ok(contact)
    }

    /// Creates a named insured contact
    pub fn named_insured(name: impl Into<String>) -> Result<Self, PartyError> {
        Self::new(name, ContactRole::NamedInsured)
    }

    /// Creates an agent contact
    pub fn agent(name: impl Into<String>) -> Result<Self, PartyError> {
        Self::new(name, ContactRole::Agent)
    }

    /// Renames the contact
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), PartyError> {
        let previous = std::mem::replace(&mut self.name, name.into().trim().to_string());
        if let Err(e) = self.ensure_valid() {
            self.name = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Returns a copy of the contact with a different role
    pub fn with_role(mut self, role: ContactRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_agent(&self) -> bool {
        self.role.is_agent()
    }

    fn ensure_valid(&self) -> Result<(), PartyError> {
        self.validate()
            .map_err(|e| PartyError::invalid(format!("name: {}", e)))
    }
}
