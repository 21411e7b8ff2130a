//! Request and response bodies

pub mod policy;
pub mod billing;
pub mod contact;
