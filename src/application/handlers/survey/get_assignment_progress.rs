//! GetAssignmentProgressHandler - Completion and score of one assignment.
//!
//! An assignment id that does not resolve yields the empty progress shape
//! instead of an error, so dashboards survive stale links.

use std::sync::Arc;

use tracing::debug;

use crate::domain::assignment::AssignmentError;
use crate::domain::foundation::{AccessPolicy, AssignmentId, CallerIdentity, EmployeeId};
use crate::domain::progress::{compute_progress, AssignmentProgress};
use crate::ports::{AssignmentRepository, ProgressReader};

#[derive(Debug, Clone)]
pub struct GetAssignmentProgressQuery {
    pub caller: CallerIdentity,
    pub assignment_id: AssignmentId,
    pub employee_id: Option<EmployeeId>,
}

pub struct GetAssignmentProgressHandler {
    assignments: Arc<dyn AssignmentRepository>,
    reader: Arc<dyn ProgressReader>,
    policy: AccessPolicy,
}

impl GetAssignmentProgressHandler {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, reader: Arc<dyn ProgressReader>) -> Self {
        Self {
            assignments,
            reader,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(
        &self,
        query: GetAssignmentProgressQuery,
    ) -> Result<AssignmentProgress, AssignmentError> {
        let Some(assignment) = self.assignments.find_by_id(query.assignment_id).await? else {
            debug!(assignment_id = %query.assignment_id, "progress requested for unknown assignment");
            return Ok(AssignmentProgress::empty());
        };
        self.policy
            .ensure_company_access(&query.caller, assignment.company_id)?;

        let filter = assignment.respondent_filter(query.employee_id);
        let totals = self.reader.pillar_question_counts(&assignment).await?;
        let rows = self.reader.answer_rows(&assignment, filter).await?;

        Ok(compute_progress(&totals, &rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySurveyStore;
    use crate::application::handlers::fixtures::*;
    use crate::domain::assignment::{NewResponse, ResponseKey};
    use crate::domain::foundation::QuestionId;
    use crate::ports::ResponseRepository;
    use chrono::Utc;

    async fn answer(
        store: &InMemorySurveyStore,
        assignment_id: AssignmentId,
        question: i64,
        employee: Option<EmployeeId>,
        value: &str,
    ) {
        let response = NewResponse {
            key: ResponseKey {
                assignment_id,
                question_id: QuestionId::new(question),
                employee_id: employee,
            },
            value: value.to_string(),
            submitted_at: Utc::now(),
        };
        ResponseRepository::insert(store, &response).await.unwrap();
    }

    fn query(assignment_id: AssignmentId, employee: Option<EmployeeId>) -> GetAssignmentProgressQuery {
        GetAssignmentProgressQuery {
            caller: admin(),
            assignment_id,
            employee_id: employee,
        }
    }

    #[tokio::test]
    async fn two_likert_answers_complete_the_pillar() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11, 12]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;
        answer(&store, assignment.id, 11, Some(ANA), "5").await;
        answer(&store, assignment.id, 12, Some(ANA), "3").await;

        let progress = GetAssignmentProgressHandler::new(store.clone(), store.clone())
            .handle(query(assignment.id, Some(ANA)))
            .await
            .unwrap();

        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.completion, 1.0);
        assert!((progress.score - 0.75).abs() < 1e-9);
        assert_eq!(progress.pillars.len(), 1);
        assert_eq!(progress.pillars[0].pillar_id, INFRA);
    }

    #[tokio::test]
    async fn other_employees_answers_are_not_counted() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11, 12, 21]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;
        answer(&store, assignment.id, 11, Some(LUIS), "5").await;
        answer(&store, assignment.id, 21, Some(ANA), "si").await;

        let progress = GetAssignmentProgressHandler::new(store.clone(), store.clone())
            .handle(query(assignment.id, Some(ANA)))
            .await
            .unwrap();

        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.score, 1.0);
        assert_eq!(progress.pillars[0].answered, 0);
        assert_eq!(progress.pillars[1].answered, 1);
    }

    #[tokio::test]
    async fn identified_assignment_without_employee_shows_totals_only() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11, 12]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;
        answer(&store, assignment.id, 11, Some(ANA), "5").await;

        let progress = GetAssignmentProgressHandler::new(store.clone(), store.clone())
            .handle(query(assignment.id, None))
            .await
            .unwrap();

        assert_eq!(progress.total, 2);
        assert_eq!(progress.answered, 0);
        assert_eq!(progress.completion, 0.0);
    }

    #[tokio::test]
    async fn unknown_assignment_yields_empty_progress() {
        let store = seeded_store().await;

        let progress = GetAssignmentProgressHandler::new(store.clone(), store.clone())
            .handle(query(AssignmentId::new(12345), Some(ANA)))
            .await
            .unwrap();

        assert_eq!(progress, AssignmentProgress::empty());
    }

    #[tokio::test]
    async fn other_company_member_is_forbidden() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let assignment = open_assignment(&store, &questionnaire, true).await;
        let mut q = query(assignment.id, None);
        q.caller = member_of(GLOBEX);

        let result = GetAssignmentProgressHandler::new(store.clone(), store.clone())
            .handle(q)
            .await;

        assert!(matches!(result, Err(AssignmentError::Forbidden(_))));
    }
}
