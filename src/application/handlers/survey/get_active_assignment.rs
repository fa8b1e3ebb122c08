//! GetActiveAssignmentHandler - Query for the company-wide assignment
//! currently in vigency.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::assignment::{Assignment, AssignmentError};
use crate::domain::foundation::{AccessPolicy, CallerIdentity, CompanyId};
use crate::ports::AssignmentRepository;

#[derive(Debug, Clone)]
pub struct GetActiveAssignmentQuery {
    pub caller: CallerIdentity,
    pub company_id: CompanyId,
}

pub struct GetActiveAssignmentHandler {
    assignments: Arc<dyn AssignmentRepository>,
    policy: AccessPolicy,
}

impl GetActiveAssignmentHandler {
    pub fn new(assignments: Arc<dyn AssignmentRepository>) -> Self {
        Self {
            assignments,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(
        &self,
        query: GetActiveAssignmentQuery,
    ) -> Result<Option<Assignment>, AssignmentError> {
        self.policy.ensure_company_access(&query.caller, query.company_id)?;
        Ok(self
            .assignments
            .find_active_company_wide(query.company_id, Utc::now())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::*;
    use chrono::Duration;

    #[tokio::test]
    async fn returns_active_assignment_for_member() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;

        let found = GetActiveAssignmentHandler::new(store.clone())
            .handle(GetActiveAssignmentQuery {
                caller: member_of(ACME),
                company_id: ACME,
            })
            .await
            .unwrap();

        assert_eq!(found.map(|a| a.id), Some(assignment.id));
    }

    #[tokio::test]
    async fn expired_assignment_is_not_returned() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let now = Utc::now();
        window_assignment(
            &store,
            &questionnaire,
            false,
            now - Duration::days(10),
            now - Duration::days(1),
        )
        .await;

        let found = GetActiveAssignmentHandler::new(store.clone())
            .handle(GetActiveAssignmentQuery {
                caller: admin(),
                company_id: ACME,
            })
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn other_company_member_is_forbidden() {
        let store = seeded_store().await;

        let result = GetActiveAssignmentHandler::new(store.clone())
            .handle(GetActiveAssignmentQuery {
                caller: member_of(GLOBEX),
                company_id: ACME,
            })
            .await;

        assert!(matches!(result, Err(AssignmentError::Forbidden(_))));
    }
}
