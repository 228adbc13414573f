//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: opaque identifiers for decisions, proposals and participants
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod ids;
