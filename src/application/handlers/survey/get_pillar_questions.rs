//! GetPillarQuestionsHandler - Questions of one pillar with the
//! respondent's current answers.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::load_accessible;
use crate::domain::assignment::AssignmentError;
use crate::domain::catalog::QuestionType;
use crate::domain::foundation::{
    AccessPolicy, AssignmentId, CallerIdentity, EmployeeId, PillarId, QuestionId,
};
use crate::ports::{AssignmentRepository, CatalogReader, ResponseRepository};

#[derive(Debug, Clone)]
pub struct GetPillarQuestionsQuery {
    pub caller: CallerIdentity,
    pub assignment_id: AssignmentId,
    pub pillar_id: PillarId,
    pub employee_id: Option<EmployeeId>,
}

/// A question as shown to a respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PillarQuestionView {
    pub id: QuestionId,
    pub statement: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub required: bool,
    pub weight: i32,
    /// Only present for elevated roles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    pub answer: Option<String>,
}

pub struct GetPillarQuestionsHandler {
    assignments: Arc<dyn AssignmentRepository>,
    catalog: Arc<dyn CatalogReader>,
    responses: Arc<dyn ResponseRepository>,
    policy: AccessPolicy,
}

impl GetPillarQuestionsHandler {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        catalog: Arc<dyn CatalogReader>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            assignments,
            catalog,
            responses,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(
        &self,
        query: GetPillarQuestionsQuery,
    ) -> Result<Vec<PillarQuestionView>, AssignmentError> {
        let assignment = load_accessible(
            self.assignments.as_ref(),
            &self.policy,
            &query.caller,
            query.assignment_id,
        )
        .await?;

        let pillar = self
            .catalog
            .find_pillar(query.pillar_id)
            .await?
            .filter(|p| p.is_visible_to(assignment.company_id))
            .ok_or(AssignmentError::PillarNotFound(query.pillar_id))?;

        let questions = self
            .catalog
            .questionnaire_questions_of_pillar(assignment.questionnaire_id, pillar.id)
            .await?;
        let question_ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();

        let filter = assignment.respondent_filter(query.employee_id);
        let answers: HashMap<QuestionId, String> = self
            .responses
            .list_for_questions(assignment.id, &question_ids, filter)
            .await?
            .into_iter()
            .map(|r| (r.key.question_id, r.value))
            .collect();

        let show_expected = self.policy.is_elevated(&query.caller);
        Ok(questions
            .into_iter()
            .map(|q| PillarQuestionView {
                answer: answers.get(&q.id).cloned(),
                expected_answer: if show_expected { q.expected_answer } else { None },
                id: q.id,
                statement: q.statement,
                question_type: q.question_type,
                required: q.required,
                weight: q.weight,
            })
            .collect())
    }
}
