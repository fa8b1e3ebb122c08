//! ListAssignmentPillarsHandler - Pillars an assignment's questionnaire covers.

use std::sync::Arc;

use super::load_accessible;
use crate::domain::assignment::AssignmentError;
use crate::domain::catalog::Pillar;
use crate::domain::foundation::{AccessPolicy, AssignmentId, CallerIdentity};
use crate::ports::{AssignmentRepository, CatalogReader};

#[derive(Debug, Clone)]
pub struct ListAssignmentPillarsQuery {
    pub caller: CallerIdentity,
    pub assignment_id: AssignmentId,
}

pub struct ListAssignmentPillarsHandler {
    assignments: Arc<dyn AssignmentRepository>,
    catalog: Arc<dyn CatalogReader>,
    policy: AccessPolicy,
}

impl ListAssignmentPillarsHandler {
    pub fn new(assignments: Arc<dyn AssignmentRepository>, catalog: Arc<dyn CatalogReader>) -> Self {
        Self {
            assignments,
            catalog,
            policy: AccessPolicy::default(),
        }
    }

    /// Ordered by pillar id.
    pub async fn handle(&self, query: ListAssignmentPillarsQuery) -> Result<Vec<Pillar>, AssignmentError> {
        let assignment = load_accessible(
            self.assignments.as_ref(),
            &self.policy,
            &query.caller,
            query.assignment_id,
        )
        .await?;
        Ok(self
            .catalog
            .questionnaire_pillars(assignment.questionnaire_id, assignment.company_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::fixtures::*;

    #[tokio::test]
    async fn lists_visible_pillars_with_attached_questions() {
        let store = seeded_store().await;
        // 31 sits under Globex's pillar and must not leak into Acme's listing
        let questionnaire = publish_questionnaire(&store, ACME, &[21, 31, 12]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;

        let pillars = ListAssignmentPillarsHandler::new(store.clone(), store.clone())
            .handle(ListAssignmentPillarsQuery {
                caller: member_of(ACME),
                assignment_id: assignment.id,
            })
            .await
            .unwrap();

        let ids: Vec<_> = pillars.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![INFRA, PROCESSES]);
    }

    #[tokio::test]
    async fn other_company_member_is_forbidden() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;

        let result = ListAssignmentPillarsHandler::new(store.clone(), store.clone())
            .handle(ListAssignmentPillarsQuery {
                caller: member_of(GLOBEX),
                assignment_id: assignment.id,
            })
            .await;

        assert!(matches!(result, Err(AssignmentError::Forbidden(_))));
    }
}
