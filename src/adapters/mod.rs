//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx implementations of every storage port
//! - `memory` - In-memory store for tests and local runs
//! - `auth` - JWT and mock session validators
//! - `audit` - Tracing-backed audit logger
//! - `http` - axum routes, DTOs and middleware

pub mod audit;
pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;

pub use audit::TracingAuditLogger;
pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use memory::InMemorySurveyStore;
