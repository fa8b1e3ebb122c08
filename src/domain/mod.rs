//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, errors, caller identity, access policy)
//! - `catalog` - Company, department, employee, pillar, question and questionnaire records
//! - `assignment` - Survey assignment aggregate, scope, validity window, responses
//! - `scoring` - Raw answers to normalized scores and weighted percents
//! - `progress` - Per-assignment completion and score
//! - `analytics` - Dashboard filters, single-pass aggregator and report
//! - `export` - Flat export rows and CSV encoding
//! - `audit` - Audit trail entries
//! - `likert` - Maturity level table

pub mod analytics;
pub mod assignment;
pub mod audit;
pub mod catalog;
pub mod export;
pub mod foundation;
pub mod likert;
pub mod progress;
pub mod scoring;
