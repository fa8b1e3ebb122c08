//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, caller identity, access rules, and error types
//! that form the vocabulary of the assessment domain.

mod auth;
mod authorization;
mod errors;
mod ids;

pub use auth::{AuthError, CallerIdentity, Role};
pub use authorization::{AccessError, AccessPolicy, AnalyticsScope};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    parse_id_list, AssignmentId, CompanyId, DepartmentId, EmployeeId, PillarId, QuestionId,
    QuestionnaireId, ResponseId, UserId,
};
