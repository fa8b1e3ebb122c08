//! Data Transfer Objects for survey endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::handlers::survey::PillarQuestionView;
use crate::domain::assignment::{AnswerItem, Assignment, ScopeType};
use crate::domain::likert::{LikertLevel, LIKERT_LEVELS};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/survey/simple/begin`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleBeginRequest {
    pub company_id: i64,
    #[serde(default)]
    pub anonymous: bool,
}

/// Body of `POST /api/survey/begin`.
#[derive(Debug, Clone, Deserialize)]
pub struct BeginSurveyRequest {
    pub assignment_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub company_id: i64,
    pub questionnaire_id: i64,
    pub scope_type: ScopeType,
    pub scope_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<AnswerItem>,
}

/// `?employee_id=` on progress, questions and answer routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RespondentParams {
    pub employee_id: Option<i64>,
}

/// Query of `GET /api/companies/:company_id/assignments/active`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActiveAssignmentParams {
    /// Provision the company-wide assignment when none is active.
    #[serde(default)]
    pub create_if_missing: bool,
    #[serde(default)]
    pub anonymous: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct BeginSurveyResponse {
    pub assignment_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentView {
    pub id: i64,
    pub company_id: i64,
    pub questionnaire_id: i64,
    pub scope_type: ScopeType,
    pub scope_id: Option<i64>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub anonymous: bool,
    /// Whether `now` lies inside the validity window.
    pub active: bool,
}

impl AssignmentView {
    pub fn at(assignment: &Assignment, now: DateTime<Utc>) -> Self {
        Self {
            id: assignment.id.get(),
            company_id: assignment.company_id.get(),
            questionnaire_id: assignment.questionnaire_id.get(),
            scope_type: assignment.scope.scope_type(),
            scope_id: assignment.scope.scope_id(),
            starts_at: assignment.window.starts_at(),
            ends_at: assignment.window.ends_at(),
            anonymous: assignment.anonymous,
            active: assignment.is_active(now),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PillarQuestionsResponse {
    pub pillar_id: i64,
    pub likert_levels: &'static [LikertLevel],
    pub questions: Vec<PillarQuestionView>,
}

impl PillarQuestionsResponse {
    pub fn new(pillar_id: i64, questions: Vec<PillarQuestionView>) -> Self {
        Self {
            pillar_id,
            likert_levels: &LIKERT_LEVELS,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswersResponse {
    pub ok: bool,
    pub created: u32,
    pub updated: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncQuestionResponse {
    pub question_id: i64,
    pub questionnaires_updated: usize,
}
