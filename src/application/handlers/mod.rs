//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analytics;
pub mod survey;

mod audit_trail;

#[cfg(test)]
pub(crate) mod fixtures;
