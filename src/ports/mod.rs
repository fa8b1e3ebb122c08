//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports (write side)
//!
//! - `AssignmentRepository` - Survey assignments and their vigency windows
//! - `QuestionnaireRepository` - Questionnaires and their ordered question sets
//! - `ResponseRepository` - Answers keyed by (assignment, question, employee)
//!
//! ## Reader Ports (query side)
//!
//! - `CatalogReader` - Companies, departments, employees, pillars, questions
//! - `ProgressReader` - Per-pillar totals and stored answers of one assignment
//! - `AnalyticsReader` - Dashboard snapshots and raw export rows
//! - `AuditReader` - Recent audit entries
//!
//! ## Side Channels
//!
//! - `AuditLogger` - Fire-and-forget audit trail
//! - `SessionValidator` - Bearer token validation

mod analytics_reader;
mod assignment_repository;
mod audit_log;
mod catalog_reader;
mod progress_reader;
mod questionnaire_repository;
mod response_repository;
mod session_validator;

pub use analytics_reader::AnalyticsReader;
pub use assignment_repository::AssignmentRepository;
pub use audit_log::{AuditLogger, AuditReader};
pub use catalog_reader::CatalogReader;
pub use progress_reader::ProgressReader;
pub use questionnaire_repository::{NewQuestionnaire, QuestionnaireRepository};
pub use response_repository::ResponseRepository;
pub use session_validator::SessionValidator;
