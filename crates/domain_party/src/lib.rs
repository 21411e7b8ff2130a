//! Party Domain
//!
//! Contacts are the people attached to a policy: the named insured who
//! owns it and the agent who services it. A contact's role decides whether
//! it may pay on a policy that is past due.

pub mod contact;
pub mod error;

pub use contact::{Contact, ContactRole};
pub use error::PartyError;
