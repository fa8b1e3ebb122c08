use async_trait::async_trait;

use crate::domain::assignment::{Assignment, RespondentFilter};
use crate::domain::foundation::DomainError;
use crate::domain::progress::{AnswerRow, PillarQuestionCount};

/// Read-only port for progress queries.
///
/// Both reads are restricted to questions attached to the assignment's
/// questionnaire whose pillar is global or owned by the assignment's company.
#[async_trait]
pub trait ProgressReader: Send + Sync {
    /// Question counts per pillar, ordered by pillar id.
    async fn pillar_question_counts(
        &self,
        assignment: &Assignment,
    ) -> Result<Vec<PillarQuestionCount>, DomainError>;

    /// Stored answers matching `filter`.
    async fn answer_rows(
        &self,
        assignment: &Assignment,
        filter: RespondentFilter,
    ) -> Result<Vec<AnswerRow>, DomainError>;
}
