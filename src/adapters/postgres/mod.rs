//! PostgreSQL adapters - sqlx implementations of the storage ports.
//!
//! Each adapter holds a cloned `PgPool`. Text-encoded enums are parsed
//! back with their `FromStr` impls; a value the domain cannot read is
//! reported as a database error naming the column.

mod analytics_reader;
mod assignment_repository;
mod audit_log;
mod catalog_reader;
mod progress_reader;
mod questionnaire_repository;
mod response_repository;

pub use analytics_reader::PostgresAnalyticsReader;
pub use assignment_repository::PostgresAssignmentRepository;
pub use audit_log::PostgresAuditLog;
pub use catalog_reader::PostgresCatalogReader;
pub use progress_reader::PostgresProgressReader;
pub use questionnaire_repository::PostgresQuestionnaireRepository;
pub use response_repository::PostgresResponseRepository;

use std::fmt::Display;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Parses a text column into a domain enum.
fn parse_column<T>(column: &'static str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|e| corrupt(column, e))
}

fn corrupt(column: &'static str, err: impl Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid value in {}: {}", column, err))
        .with_detail("column", column)
}

/// Binds an id filter as a nullable `bigint[]`; an empty filter is NULL.
fn id_array<T: Copy>(ids: &[T], raw: impl Fn(T) -> i64) -> Option<Vec<i64>> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.iter().copied().map(raw).collect())
    }
}
