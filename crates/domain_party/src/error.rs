//! Party domain errors

use thiserror::Error;

/// Errors that can occur in the party domain
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PartyError {
    /// Contact with the given ID was not found
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    /// Invalid contact data provided
    #[error("Invalid contact data: {0}")]
    InvalidData(String),

    /// Unrecognised contact role
    #[error("Unknown contact role: {0}")]
    UnknownRole(String),
}

impl PartyError {
    /// Creates a ContactNotFound error from any ID type
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        PartyError::ContactNotFound(id.to_string())
    }

    /// Creates an InvalidData error with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        PartyError::InvalidData(message.into())
    }
}
