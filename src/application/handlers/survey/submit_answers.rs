//! SubmitAnswersHandler - Bulk upsert of survey answers.
//!
//! Each answer is keyed by (assignment, question, employee). Anonymous
//! assignments always write the null-employee key, so resubmissions from
//! any session overwrite the same row.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use super::load_accessible;
use crate::application::handlers::audit_trail::record_quietly;
use crate::domain::assignment::{
    AnswerItem, AssignmentError, NewResponse, ResponseKey, SubmitOutcome,
};
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::foundation::{
    AccessPolicy, AssignmentId, CallerIdentity, EmployeeId, QuestionId,
};
use crate::ports::{
    AssignmentRepository, AuditLogger, CatalogReader, QuestionnaireRepository, ResponseRepository,
};

#[derive(Debug, Clone)]
pub struct SubmitAnswersCommand {
    pub caller: CallerIdentity,
    pub assignment_id: AssignmentId,
    pub employee_id: Option<EmployeeId>,
    pub answers: Vec<AnswerItem>,
}

enum Upsert {
    Created,
    Updated,
}

pub struct SubmitAnswersHandler {
    assignments: Arc<dyn AssignmentRepository>,
    questionnaires: Arc<dyn QuestionnaireRepository>,
    catalog: Arc<dyn CatalogReader>,
    responses: Arc<dyn ResponseRepository>,
    audit: Arc<dyn AuditLogger>,
    policy: AccessPolicy,
}

impl SubmitAnswersHandler {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        questionnaires: Arc<dyn QuestionnaireRepository>,
        catalog: Arc<dyn CatalogReader>,
        responses: Arc<dyn ResponseRepository>,
        audit: Arc<dyn AuditLogger>,
    ) -> Self {
        Self {
            assignments,
            questionnaires,
            catalog,
            responses,
            audit,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(&self, cmd: SubmitAnswersCommand) -> Result<SubmitOutcome, AssignmentError> {
        let assignment = load_accessible(
            self.assignments.as_ref(),
            &self.policy,
            &cmd.caller,
            cmd.assignment_id,
        )
        .await?;

        let now = Utc::now();
        assignment.ensure_active(now)?;

        let employee_id = if assignment.anonymous {
            None
        } else {
            let id = cmd.employee_id.ok_or(AssignmentError::EmployeeRequired)?;
            let belongs = self
                .catalog
                .find_employee(id)
                .await?
                .map_or(false, |e| e.company_id == assignment.company_id);
            if !belongs {
                return Err(AssignmentError::validation(
                    "employee does not belong to the assignment's company",
                ));
            }
            Some(id)
        };

        let attached: HashSet<QuestionId> = self
            .questionnaires
            .question_links(assignment.questionnaire_id)
            .await?
            .iter()
            .map(|l| l.question_id)
            .collect();

        let mut outcome = SubmitOutcome::default();
        for item in &cmd.answers {
            if !attached.contains(&item.question_id) {
                debug!(
                    assignment_id = %assignment.id,
                    question_id = %item.question_id,
                    "skipping answer to question outside the questionnaire"
                );
                continue;
            }
            let key = ResponseKey {
                assignment_id: assignment.id,
                question_id: item.question_id,
                employee_id,
            };
            match self.upsert(key, item.stored_value(), now).await? {
                Upsert::Created => outcome.created += 1,
                Upsert::Updated => outcome.updated += 1,
            }
        }

        info!(
            assignment_id = %assignment.id,
            created = outcome.created,
            updated = outcome.updated,
            "answers submitted"
        );

        let entry = AuditEntry::by(&cmd.caller, AuditAction::SurveyAnswerBulk, now)
            .company(Some(assignment.company_id))
            .entity("Assignment", assignment.id.get())
            .extra(json!({ "created": outcome.created, "updated": outcome.updated }));
        record_quietly(self.audit.as_ref(), entry).await;

        Ok(outcome)
    }

    async fn upsert(
        &self,
        key: ResponseKey,
        value: String,
        submitted_at: DateTime<Utc>,
    ) -> Result<Upsert, AssignmentError> {
        if let Some(existing) = self.responses.find_by_key(&key).await? {
            self.responses
                .update_value(existing.id, &value, submitted_at)
                .await?;
            return Ok(Upsert::Updated);
        }

        let new_response = NewResponse {
            key,
            value,
            submitted_at,
        };
        match self.responses.insert(&new_response).await {
            Ok(_) => Ok(Upsert::Created),
            Err(err) if err.is_unique_violation() => {
                warn!(
                    assignment_id = %key.assignment_id,
                    question_id = %key.question_id,
                    "concurrent answer detected, retrying as update"
                );
                let existing = self.responses.find_by_key(&key).await?.ok_or_else(|| {
                    AssignmentError::infrastructure("response vanished after unique violation")
                })?;
                self.responses
                    .update_value(existing.id, &new_response.value, submitted_at)
                    .await?;
                Ok(Upsert::Updated)
            }
            Err(err) => Err(err.into()),
        }
    }
}
