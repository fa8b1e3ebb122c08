//! TacticSphere - Multi-tenant maturity assessment backend
//!
//! Companies run surveys of Likert and open questions grouped into
//! weighted pillars. This crate provisions survey assignments, records
//! answers, reports per-pillar progress and aggregates weighted maturity
//! analytics across departments and employees.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
