//! Questionnaire repository port.

use async_trait::async_trait;

use crate::domain::catalog::{
    QuestionSetChanges, Questionnaire, QuestionnaireQuestion, QuestionnaireStatus,
};
use crate::domain::foundation::{CompanyId, DomainError, QuestionId, QuestionnaireId};

/// A questionnaire about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestionnaire {
    pub company_id: CompanyId,
    pub title: String,
    pub version: i32,
    pub status: QuestionnaireStatus,
}

#[async_trait]
pub trait QuestionnaireRepository: Send + Sync {
    async fn find_by_id(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, DomainError>;

    /// Highest `(version, id)` among the company's published questionnaires.
    async fn latest_published(&self, company_id: CompanyId) -> Result<Option<Questionnaire>, DomainError>;

    /// Questionnaires of one company, or of every company when `None`.
    async fn list(&self, company_id: Option<CompanyId>) -> Result<Vec<Questionnaire>, DomainError>;

    async fn create(&self, questionnaire: &NewQuestionnaire) -> Result<Questionnaire, DomainError>;

    /// Current question attachments, ordered by position.
    async fn question_links(&self, id: QuestionnaireId) -> Result<Vec<QuestionnaireQuestion>, DomainError>;

    /// Applies additions and removals atomically.
    async fn apply_question_changes(
        &self,
        id: QuestionnaireId,
        changes: &QuestionSetChanges,
    ) -> Result<(), DomainError>;

    async fn contains_question(
        &self,
        id: QuestionnaireId,
        question_id: QuestionId,
    ) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questionnaire_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn QuestionnaireRepository) {}
    }
}
