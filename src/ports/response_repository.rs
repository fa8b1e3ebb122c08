//! Response repository port.
//!
//! The `(assignment, question, employee)` key is unique at the store,
//! with anonymous rows colliding on the null employee. `insert` reports a
//! collision as `ErrorCode::UniqueViolation` so callers can retry as an
//! update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::assignment::{NewResponse, RespondentFilter, ResponseKey, SurveyResponse};
use crate::domain::foundation::{AssignmentId, DomainError, QuestionId, ResponseId};

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    async fn find_by_key(&self, key: &ResponseKey) -> Result<Option<SurveyResponse>, DomainError>;

    /// # Errors
    ///
    /// - `UniqueViolation` if a response with the same key exists
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, response: &NewResponse) -> Result<SurveyResponse, DomainError>;

    async fn update_value(
        &self,
        id: ResponseId,
        value: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Responses of an assignment to the given questions, visible to `filter`.
    async fn list_for_questions(
        &self,
        assignment_id: AssignmentId,
        question_ids: &[QuestionId],
        filter: RespondentFilter,
    ) -> Result<Vec<SurveyResponse>, DomainError>;
}
