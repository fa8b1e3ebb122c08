//! EnsureAutoAssignmentHandler - Self-healing provisioning of the
//! company-wide survey assignment.
//!
//! Repeated calls converge on a single long-lived assignment per company:
//! the active one is retargeted and its window extended in place instead
//! of inserting a new row.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::info;

use crate::application::handlers::audit_trail::record_quietly;
use crate::domain::assignment::{
    Assignment, AssignmentError, AssignmentScope, NewAssignment, ValidityWindow,
};
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::catalog::{plan_question_set, QuestionnaireStatus, AUTO_QUESTIONNAIRE_TITLE};
use crate::domain::foundation::{AccessPolicy, CallerIdentity, CompanyId, QuestionId};
use crate::ports::{
    AssignmentRepository, AuditLogger, CatalogReader, NewQuestionnaire, QuestionnaireRepository,
};

/// Validity window of auto-provisioned assignments, relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAssignmentWindow {
    pub lead: Duration,
    pub horizon: Duration,
}

impl Default for AutoAssignmentWindow {
    fn default() -> Self {
        Self {
            lead: Duration::hours(1),
            horizon: Duration::days(3650),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnsureAutoAssignmentCommand {
    pub caller: CallerIdentity,
    pub company_id: CompanyId,
    pub anonymous: bool,
}

#[derive(Debug, Clone)]
pub struct EnsureAutoAssignmentResult {
    pub assignment: Assignment,
    /// True when an existing assignment was retargeted.
    pub reused: bool,
}

pub struct EnsureAutoAssignmentHandler {
    catalog: Arc<dyn CatalogReader>,
    questionnaires: Arc<dyn QuestionnaireRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    audit: Arc<dyn AuditLogger>,
    policy: AccessPolicy,
    window: AutoAssignmentWindow,
}

impl EnsureAutoAssignmentHandler {
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
            window: AutoAssignmentWindow::default(),
        }
    }

    pub fn with_window(mut self, window: AutoAssignmentWindow) -> Self {
        self.window = window;
        self
    }

    pub async fn handle(
        &self,
        cmd: EnsureAutoAssignmentCommand,
    ) -> Result<EnsureAutoAssignmentResult, AssignmentError> {
        self.policy.ensure_company_access(&cmd.caller, cmd.company_id)?;
        self.catalog
            .find_company(cmd.company_id)
            .await?
            .ok_or(AssignmentError::CompanyNotFound(cmd.company_id))?;

        // 1. Reconcile the company's questionnaire with every reachable question
        let desired: Vec<QuestionId> = self
            .catalog
            .questions_visible_to(cmd.company_id)
            .await?
            .iter()
            .map(|q| q.id)
            .collect();
        if desired.is_empty() {
            return Err(AssignmentError::NoQuestionsDefined);
        }

        let questionnaire = match self.questionnaires.latest_published(cmd.company_id).await? {
            Some(existing) => existing,
            None => {
                self.questionnaires
                    .create(&NewQuestionnaire {
                        company_id: cmd.company_id,
                        title: AUTO_QUESTIONNAIRE_TITLE.to_string(),
                        version: 1,
                        status: QuestionnaireStatus::Published,
                    })
                    .await?
            }
        };
        let existing = self.questionnaires.question_links(questionnaire.id).await?;
        let changes = plan_question_set(questionnaire.id, &existing, &desired, true);
        if !changes.is_empty() {
            self.questionnaires
                .apply_question_changes(questionnaire.id, &changes)
                .await?;
        }

        // 2. Retarget the active assignment, or 3. create one
        let now = Utc::now();
        let window = ValidityWindow::around(now, self.window.lead, self.window.horizon)?;
        let (assignment, reused) = match self
            .assignments
            .find_active_company_wide(cmd.company_id, now)
            .await?
        {
            Some(mut active) => {
                active.retarget(questionnaire.id, window, cmd.anonymous);
                self.assignments.update(&active).await?;
                (active, true)
            }
            None => {
                let created = self
                    .assignments
                    .insert(&NewAssignment {
                        company_id: cmd.company_id,
                        questionnaire_id: questionnaire.id,
                        scope: AssignmentScope::Company,
                        window,
                        anonymous: cmd.anonymous,
                    })
                    .await?;
                (created, false)
            }
        };

        info!(
            company_id = %cmd.company_id,
            assignment_id = %assignment.id,
            questionnaire_id = %questionnaire.id,
            added = changes.added.len(),
            removed = changes.removed.len(),
            reused,
            "auto assignment ensured"
        );

        let entry = AuditEntry::by(&cmd.caller, AuditAction::AssignmentProvision, now)
            .company(Some(cmd.company_id))
            .entity("Assignment", assignment.id.get())
            .extra(json!({
                "questionnaire_id": questionnaire.id,
                "reused": reused,
            }));
        record_quietly(self.audit.as_ref(), entry).await;

        Ok(EnsureAutoAssignmentResult { assignment, reused })
    }
}
