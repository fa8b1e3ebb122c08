//! Assignment-specific error types.

use thiserror::Error;

use crate::domain::foundation::{
    AccessError, AssignmentId, CompanyId, DomainError, ErrorCode, PillarId, QuestionnaireId,
};

/// Errors raised by the survey assignment flows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// A business rule on the assignment's shape was broken.
    #[error("Validation failed: {rule}")]
    Validation { rule: String },

    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),

    #[error("Questionnaire not found: {0}")]
    QuestionnaireNotFound(QuestionnaireId),

    #[error("Assignment not found: {0}")]
    NotFound(AssignmentId),

    #[error("Pillar not found: {0}")]
    PillarNotFound(PillarId),

    #[error("Assignment {0} is outside its validity window")]
    NotActive(AssignmentId),

    #[error("employee_id is required for this assignment")]
    EmployeeRequired,

    #[error("No questions are defined system-wide to build a questionnaire")]
    NoQuestionsDefined,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl AssignmentError {
    pub fn validation(rule: impl Into<String>) -> Self {
        AssignmentError::Validation { rule: rule.into() }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        AssignmentError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AssignmentError::Validation { .. }
            | AssignmentError::EmployeeRequired
            | AssignmentError::NoQuestionsDefined => ErrorCode::ValidationFailed,
            AssignmentError::CompanyNotFound(_) => ErrorCode::CompanyNotFound,
            AssignmentError::QuestionnaireNotFound(_) => ErrorCode::QuestionnaireNotFound,
            AssignmentError::NotFound(_) => ErrorCode::AssignmentNotFound,
            AssignmentError::PillarNotFound(_) => ErrorCode::NotFound,
            AssignmentError::NotActive(_) => ErrorCode::AssignmentNotActive,
            AssignmentError::Forbidden(_) => ErrorCode::Forbidden,
            AssignmentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for AssignmentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => AssignmentError::Validation { rule: err.message },
            ErrorCode::Forbidden => AssignmentError::Forbidden(err.message),
            _ => AssignmentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<AccessError> for AssignmentError {
    fn from(err: AccessError) -> Self {
        AssignmentError::Forbidden(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_error_category() {
        assert_eq!(AssignmentError::validation("x").code(), ErrorCode::ValidationFailed);
        assert_eq!(AssignmentError::EmployeeRequired.code(), ErrorCode::ValidationFailed);
        assert_eq!(
            AssignmentError::NotActive(AssignmentId::new(1)).code(),
            ErrorCode::AssignmentNotActive
        );
        assert_eq!(
            AssignmentError::NotFound(AssignmentId::new(1)).code(),
            ErrorCode::AssignmentNotFound
        );
    }

    #[test]
    fn domain_errors_convert_by_code() {
        let err: AssignmentError = DomainError::database("connection reset").into();
        assert!(matches!(err, AssignmentError::Infrastructure(_)));

        let err: AssignmentError = DomainError::validation("scope_id", "bad scope").into();
        assert_eq!(err, AssignmentError::validation("bad scope"));
    }

    #[test]
    fn access_errors_become_forbidden() {
        let err: AssignmentError = AccessError::Inactive.into();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
