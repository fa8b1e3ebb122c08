//! HTTP handlers for survey endpoints.
//!
//! These handlers connect Axum routes to the survey command and query
//! handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;

use crate::adapters::http::error::{ApiError, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::survey::{
    AutoAssignmentWindow, BeginSurveyCommand, BeginSurveyHandler, CreateAssignmentCommand,
    CreateAssignmentHandler, EnsureAutoAssignmentCommand, EnsureAutoAssignmentHandler,
    GetActiveAssignmentHandler, GetActiveAssignmentQuery, GetAssignmentProgressHandler,
    GetAssignmentProgressQuery, GetPillarQuestionsHandler, GetPillarQuestionsQuery,
    ListAssignmentPillarsHandler, ListAssignmentPillarsQuery, SubmitAnswersCommand,
    SubmitAnswersHandler, SyncQuestionCommand, SyncQuestionHandler,
};
use crate::domain::catalog::Pillar;
use crate::domain::foundation::{
    AccessPolicy, AssignmentId, CompanyId, EmployeeId, PillarId, QuestionId, QuestionnaireId,
};
use crate::domain::progress::AssignmentProgress;
use crate::ports::{
    AssignmentRepository, AuditLogger, CatalogReader, ProgressReader, QuestionnaireRepository,
    ResponseRepository,
};

use super::dto::{
    ActiveAssignmentParams, AssignmentView, BeginSurveyRequest, BeginSurveyResponse,
    CreateAssignmentRequest, PillarQuestionsResponse, RespondentParams, SimpleBeginRequest,
    SubmitAnswersRequest, SubmitAnswersResponse, SyncQuestionResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing survey dependencies.
#[derive(Clone)]
pub struct SurveyAppState {
    pub assignments: Arc<dyn AssignmentRepository>,
    pub questionnaires: Arc<dyn QuestionnaireRepository>,
    pub catalog: Arc<dyn CatalogReader>,
    pub responses: Arc<dyn ResponseRepository>,
    pub progress: Arc<dyn ProgressReader>,
    pub audit: Arc<dyn AuditLogger>,
    pub auto_window: AutoAssignmentWindow,
}

impl SurveyAppState {
    pub fn ensure_auto_assignment_handler(&self) -> EnsureAutoAssignmentHandler {
        EnsureAutoAssignmentHandler::new(
            self.catalog.clone(),
            self.questionnaires.clone(),
            self.assignments.clone(),
            self.audit.clone(),
        )
        .with_window(self.auto_window)
    }

    pub fn begin_survey_handler(&self) -> BeginSurveyHandler {
        BeginSurveyHandler::new(self.assignments.clone())
    }

    pub fn create_assignment_handler(&self) -> CreateAssignmentHandler {
        CreateAssignmentHandler::new(
            self.catalog.clone(),
            self.questionnaires.clone(),
            self.assignments.clone(),
            self.audit.clone(),
        )
    }

    pub fn get_active_assignment_handler(&self) -> GetActiveAssignmentHandler {
        GetActiveAssignmentHandler::new(self.assignments.clone())
    }

    pub fn get_progress_handler(&self) -> GetAssignmentProgressHandler {
        GetAssignmentProgressHandler::new(self.assignments.clone(), self.progress.clone())
    }

    pub fn list_pillars_handler(&self) -> ListAssignmentPillarsHandler {
        ListAssignmentPillarsHandler::new(self.assignments.clone(), self.catalog.clone())
    }

    pub fn get_pillar_questions_handler(&self) -> GetPillarQuestionsHandler {
        GetPillarQuestionsHandler::new(
            self.assignments.clone(),
            self.catalog.clone(),
            self.responses.clone(),
        )
    }

    pub fn submit_answers_handler(&self) -> SubmitAnswersHandler {
        SubmitAnswersHandler::new(
            self.assignments.clone(),
            self.questionnaires.clone(),
            self.catalog.clone(),
            self.responses.clone(),
            self.audit.clone(),
        )
    }

    pub fn sync_question_handler(&self) -> SyncQuestionHandler {
        SyncQuestionHandler::new(self.catalog.clone(), self.questionnaires.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/survey/simple/begin
///
/// Provisions (or reuses) the company-wide assignment and returns its id.
pub async fn begin_simple_survey(
    State(state): State<SurveyAppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<SimpleBeginRequest>,
) -> Result<Json<BeginSurveyResponse>, ApiError> {
    let result = state
        .ensure_auto_assignment_handler()
        .handle(EnsureAutoAssignmentCommand {
            caller,
            company_id: CompanyId::new(request.company_id),
            anonymous: request.anonymous,
        })
        .await?;

    Ok(Json(BeginSurveyResponse {
        assignment_id: result.assignment.id.get(),
    }))
}

/// POST /api/survey/begin
pub async fn begin_survey(
    State(state): State<SurveyAppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<BeginSurveyRequest>,
) -> Result<Json<BeginSurveyResponse>, ApiError> {
    let id = state
        .begin_survey_handler()
        .handle(BeginSurveyCommand {
            caller,
            assignment_id: AssignmentId::new(request.assignment_id),
        })
        .await?;

    Ok(Json(BeginSurveyResponse {
        assignment_id: id.get(),
    }))
}

/// POST /api/assignments
pub async fn create_assignment(
    State(state): State<SurveyAppState>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentView>), ApiError> {
    let assignment = state
        .create_assignment_handler()
        .handle(CreateAssignmentCommand {
            caller,
            company_id: CompanyId::new(request.company_id),
            questionnaire_id: QuestionnaireId::new(request.questionnaire_id),
            scope_type: request.scope_type,
            scope_id: request.scope_id,
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            anonymous: request.anonymous,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AssignmentView::at(&assignment, Utc::now()))))
}

/// GET /api/companies/:company_id/assignments/active
///
/// Returns `null` when the company has no active company-wide assignment,
/// unless `create_if_missing` asks for one to be provisioned.
pub async fn get_active_assignment(
    State(state): State<SurveyAppState>,
    Path(company_id): Path<i64>,
    Query(params): Query<ActiveAssignmentParams>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<Option<AssignmentView>>, ApiError> {
    let company_id = CompanyId::new(company_id);
    let assignment = if params.create_if_missing {
        let result = state
            .ensure_auto_assignment_handler()
            .handle(EnsureAutoAssignmentCommand {
                caller,
                company_id,
                anonymous: params.anonymous,
            })
            .await?;
        Some(result.assignment)
    } else {
        state
            .get_active_assignment_handler()
            .handle(GetActiveAssignmentQuery { caller, company_id })
            .await?
    };

    let now = Utc::now();
    Ok(Json(assignment.map(|a| AssignmentView::at(&a, now))))
}

/// GET /api/survey/:assignment_id/progress
pub async fn get_progress(
    State(state): State<SurveyAppState>,
    Path(assignment_id): Path<i64>,
    Query(params): Query<RespondentParams>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<AssignmentProgress>, ApiError> {
    let progress = state
        .get_progress_handler()
        .handle(GetAssignmentProgressQuery {
            caller,
            assignment_id: AssignmentId::new(assignment_id),
            employee_id: params.employee_id.map(EmployeeId::new),
        })
        .await?;

    Ok(Json(progress))
}

/// GET /api/survey/:assignment_id/pillars
pub async fn list_pillars(
    State(state): State<SurveyAppState>,
    Path(assignment_id): Path<i64>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<Vec<Pillar>>, ApiError> {
    let pillars = state
        .list_pillars_handler()
        .handle(ListAssignmentPillarsQuery {
            caller,
            assignment_id: AssignmentId::new(assignment_id),
        })
        .await?;

    Ok(Json(pillars))
}

/// GET /api/survey/:assignment_id/pillars/:pillar_id
pub async fn get_pillar_questions(
    State(state): State<SurveyAppState>,
    Path((assignment_id, pillar_id)): Path<(i64, i64)>,
    Query(params): Query<RespondentParams>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<PillarQuestionsResponse>, ApiError> {
    let questions = state
        .get_pillar_questions_handler()
        .handle(GetPillarQuestionsQuery {
            caller,
            assignment_id: AssignmentId::new(assignment_id),
            pillar_id: PillarId::new(pillar_id),
            employee_id: params.employee_id.map(EmployeeId::new),
        })
        .await?;

    Ok(Json(PillarQuestionsResponse::new(pillar_id, questions)))
}

/// POST /api/survey/:assignment_id/answers
pub async fn submit_answers(
    State(state): State<SurveyAppState>,
    Path(assignment_id): Path<i64>,
    Query(params): Query<RespondentParams>,
    RequireAuth(caller): RequireAuth,
    Json(request): Json<SubmitAnswersRequest>,
) -> Result<Json<SubmitAnswersResponse>, ApiError> {
    let outcome = state
        .submit_answers_handler()
        .handle(SubmitAnswersCommand {
            caller,
            assignment_id: AssignmentId::new(assignment_id),
            employee_id: params.employee_id.map(EmployeeId::new),
            answers: request.answers,
        })
        .await?;

    Ok(Json(SubmitAnswersResponse {
        ok: true,
        created: outcome.created,
        updated: outcome.updated,
    }))
}

/// POST /api/questions/:question_id/sync
///
/// Attaches a question to every questionnaire that can see its pillar.
pub async fn sync_question(
    State(state): State<SurveyAppState>,
    Path(question_id): Path<i64>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<SyncQuestionResponse>, ApiError> {
    if !AccessPolicy::default().is_elevated(&caller) || !caller.active {
        return Err(ApiError::Forbidden(ErrorResponse::forbidden(format!(
            "role {} may not sync questions",
            caller.role
        ))));
    }

    let updated = state
        .sync_question_handler()
        .handle(SyncQuestionCommand {
            question_id: QuestionId::new(question_id),
        })
        .await?;

    Ok(Json(SyncQuestionResponse {
        question_id,
        questionnaires_updated: updated,
    }))
}
