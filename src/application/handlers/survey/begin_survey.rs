//! BeginSurveyHandler - Entry point of the classic survey flow.

use std::sync::Arc;

use chrono::Utc;

use super::load_accessible;
use crate::domain::assignment::AssignmentError;
use crate::domain::foundation::{AccessPolicy, AssignmentId, CallerIdentity};
use crate::ports::AssignmentRepository;

#[derive(Debug, Clone)]
pub struct BeginSurveyCommand {
    pub caller: CallerIdentity,
    pub assignment_id: AssignmentId,
}

/// Confirms the caller may answer an assignment right now.
pub struct BeginSurveyHandler {
    assignments: Arc<dyn AssignmentRepository>,
    policy: AccessPolicy,
}

impl BeginSurveyHandler {
    pub fn new(assignments: Arc<dyn AssignmentRepository>) -> Self {
        Self {
            assignments,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(&self, cmd: BeginSurveyCommand) -> Result<AssignmentId, AssignmentError> {
        let assignment =
            load_accessible(self.assignments.as_ref(), &self.policy, &cmd.caller, cmd.assignment_id)
                .await?;
        assignment.ensure_active(Utc::now())?;
        Ok(assignment.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::*;
    use chrono::Duration;

    #[tokio::test]
    async fn active_assignment_can_begin() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let assignment = open_assignment(&store, &questionnaire, true).await;

        let id = BeginSurveyHandler::new(store.clone())
            .handle(BeginSurveyCommand {
                caller: member_of(ACME),
                assignment_id: assignment.id,
            })
            .await
            .unwrap();

        assert_eq!(id, assignment.id);
    }

    #[tokio::test]
    async fn future_assignment_is_not_active() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let now = Utc::now();
        let assignment = window_assignment(
            &store,
            &questionnaire,
            true,
            now + Duration::days(1),
            now + Duration::days(2),
        )
        .await;

        let err = BeginSurveyHandler::new(store.clone())
            .handle(BeginSurveyCommand {
                caller: admin(),
                assignment_id: assignment.id,
            })
            .await
            .unwrap_err();

        assert_eq!(err, AssignmentError::NotActive(assignment.id));
    }

    #[tokio::test]
    async fn unknown_assignment_is_not_found() {
        let store = seeded_store().await;

        let err = BeginSurveyHandler::new(store.clone())
            .handle(BeginSurveyCommand {
                caller: admin(),
                assignment_id: AssignmentId::new(404),
            })
            .await
            .unwrap_err();

        assert_eq!(err, AssignmentError::NotFound(AssignmentId::new(404)));
    }

    #[tokio::test]
    async fn deactivated_caller_is_forbidden() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let assignment = open_assignment(&store, &questionnaire, true).await;

        let err = BeginSurveyHandler::new(store.clone())
            .handle(BeginSurveyCommand {
                caller: admin().deactivated(),
                assignment_id: assignment.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AssignmentError::Forbidden(_)));
    }
}
