//! CreateAssignmentHandler - Command handler for explicit assignment creation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use crate::application::handlers::audit_trail::record_quietly;
use crate::domain::assignment::{
    Assignment, AssignmentError, AssignmentScope, NewAssignment, ScopeType, ValidityWindow,
};
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{AccessPolicy, CallerIdentity, CompanyId, QuestionnaireId};
use crate::ports::{AssignmentRepository, AuditLogger, CatalogReader, QuestionnaireRepository};

#[derive(Debug, Clone)]
pub struct CreateAssignmentCommand {
    pub caller: CallerIdentity,
    pub company_id: CompanyId,
    pub questionnaire_id: QuestionnaireId,
    pub scope_type: ScopeType,
    pub scope_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub anonymous: bool,
}

pub struct CreateAssignmentHandler {
    catalog: Arc<dyn CatalogReader>,
    questionnaires: Arc<dyn QuestionnaireRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    audit: Arc<dyn AuditLogger>,
    policy: AccessPolicy,
}

impl CreateAssignmentHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        questionnaires: Arc<dyn QuestionnaireRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        Self {
            catalog,
            questionnaires,
            assignments,
            audit,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(&self, cmd: CreateAssignmentCommand) -> Result<Assignment, AssignmentError> {
        self.policy.ensure_company_access(&cmd.caller, cmd.company_id)?;

        let window = ValidityWindow::new(cmd.starts_at, cmd.ends_at)?;
        let scope = AssignmentScope::from_parts(cmd.scope_type, cmd.scope_id)?;

        self.catalog
            .find_company(cmd.company_id)
            .await?
            .ok_or(AssignmentError::CompanyNotFound(cmd.company_id))?;

        let questionnaire = self
            .questionnaires
            .find_by_id(cmd.questionnaire_id)
            .await?
            .ok_or(AssignmentError::QuestionnaireNotFound(cmd.questionnaire_id))?;
        if questionnaire.company_id != cmd.company_id {
            return Err(AssignmentError::validation(
                "questionnaire does not belong to the company",
            ));
        }

        self.ensure_scope_owner(&scope, cmd.company_id).await?;

        let assignment = self
            .assignments
            .insert(&NewAssignment {
                company_id: cmd.company_id,
                questionnaire_id: cmd.questionnaire_id,
                scope,
                window,
                anonymous: cmd.anonymous,
            })
            .await?;

        info!(
            company_id = %cmd.company_id,
            assignment_id = %assignment.id,
            scope_type = %scope.scope_type(),
            "assignment created"
        );

        let entry = AuditEntry::by(&cmd.caller, AuditAction::AssignmentCreate, Utc::now())
            .company(Some(cmd.company_id))
            .entity("Assignment", assignment.id.get())
            .extra(json!({ "scope": scope, "anonymous": cmd.anonymous }));
        record_quietly(self.audit.as_ref(), entry).await;

        Ok(assignment)
    }

    async fn ensure_scope_owner(
        &self,
        scope: &AssignmentScope,
        company_id: CompanyId,
    ) -> Result<(), AssignmentError> {
        let owner = match scope {
            AssignmentScope::Company => return Ok(()),
            AssignmentScope::Department(id) => self
                .catalog
                .find_department(*id)
                .await?
                .map(|d| d.company_id),
            AssignmentScope::Employee(id) => self
                .catalog
                .find_employee(*id)
                .await?
                .map(|e| e.company_id),
        };
        if owner == Some(company_id) {
            Ok(())
        } else {
            Err(AssignmentError::validation(format!(
                "{} scope must reference an entity of the same company",
                scope.scope_type()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySurveyStore;
    use crate::application::handlers::fixtures::*;
    use chrono::Duration;

    fn handler(store: &Arc<InMemorySurveyStore>) -> CreateAssignmentHandler {
        CreateAssignmentHandler::new(store.clone(), store.clone(), store.clone(), store.clone())
    }

    fn command(
        questionnaire_id: QuestionnaireId,
        scope_type: ScopeType,
        scope_id: Option<i64>,
    ) -> CreateAssignmentCommand {
        let now = Utc::now();
        CreateAssignmentCommand {
            caller: admin(),
            company_id: ACME,
            questionnaire_id,
            scope_type,
            scope_id,
            starts_at: now,
            ends_at: now + Duration::days(7),
            anonymous: false,
        }
    }

    fn rule_of(err: AssignmentError) -> String {
        match err {
            AssignmentError::Validation { rule } => rule,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn creates_department_scoped_assignment() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;

        let assignment = handler(&store)
            .handle(command(questionnaire.id, ScopeType::Department, Some(ENGINEERING.get())))
            .await
            .unwrap();

        assert_eq!(assignment.scope, AssignmentScope::Department(ENGINEERING));
        assert_eq!(store.audit_entries().await[0].entry.action, AuditAction::AssignmentCreate);
    }

    #[tokio::test]
    async fn company_scope_with_scope_id_fails() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;

        let err = handler(&store)
            .handle(command(questionnaire.id, ScopeType::Company, Some(5)))
            .await
            .unwrap_err();

        assert_eq!(rule_of(err), "COMPANY scope must not carry a scope_id");
    }

    #[tokio::test]
    async fn department_scope_without_scope_id_fails() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;

        let err = handler(&store)
            .handle(command(questionnaire.id, ScopeType::Department, None))
            .await
            .unwrap_err();

        assert_eq!(rule_of(err), "DEPARTMENT scope requires a scope_id");
    }

    #[tokio::test]
    async fn foreign_department_fails() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;

        let err = handler(&store)
            .handle(command(questionnaire.id, ScopeType::Department, Some(OPS.get())))
            .await
            .unwrap_err();

        assert!(rule_of(err).contains("same company"));
        assert_eq!(store.assignment_count().await, 0);
    }

    #[tokio::test]
    async fn foreign_employee_fails() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;

        let err = handler(&store)
            .handle(command(questionnaire.id, ScopeType::Employee, Some(OMAR.get())))
            .await
            .unwrap_err();

        assert!(matches!(err, AssignmentError::Validation { .. }));
    }

    #[tokio::test]
    async fn inverted_window_fails() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11]).await;
        let mut cmd = command(questionnaire.id, ScopeType::Company, None);
        cmd.ends_at = cmd.starts_at - Duration::hours(1);

        let err = handler(&store).handle(cmd).await.unwrap_err();

        assert!(matches!(err, AssignmentError::Validation { .. }));
    }

    #[tokio::test]
    async fn questionnaire_of_other_company_fails() {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, GLOBEX, &[31]).await;

        let err = handler(&store)
            .handle(command(questionnaire.id, ScopeType::Company, None))
            .await
            .unwrap_err();

        assert!(rule_of(err).contains("questionnaire"));
    }

    #[tokio::test]
    async fn missing_questionnaire_is_reported() {
        let store = seeded_store().await;

        let err = handler(&store)
            .handle(command(QuestionnaireId::new(77), ScopeType::Company, None))
            .await
            .unwrap_err();

        assert_eq!(err, AssignmentError::QuestionnaireNotFound(QuestionnaireId::new(77)));
    }
}
