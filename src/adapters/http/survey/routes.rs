//! HTTP routes for survey endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    begin_simple_survey, begin_survey, create_assignment, get_active_assignment,
    get_pillar_questions, get_progress, list_pillars, submit_answers, sync_question,
    SurveyAppState,
};

/// Creates the survey router with all routes.
pub fn survey_routes(state: SurveyAppState) -> Router {
    Router::new()
        // POST /api/survey/simple/begin
        .route("/api/survey/simple/begin", post(begin_simple_survey))
        // POST /api/survey/begin
        .route("/api/survey/begin", post(begin_survey))
        // GET /api/survey/:assignment_id/progress
        .route("/api/survey/:assignment_id/progress", get(get_progress))
        // GET /api/survey/:assignment_id/pillars
        .route("/api/survey/:assignment_id/pillars", get(list_pillars))
        // GET /api/survey/:assignment_id/pillars/:pillar_id
        .route(
            "/api/survey/:assignment_id/pillars/:pillar_id",
            get(get_pillar_questions),
        )
        // POST /api/survey/:assignment_id/answers
        .route("/api/survey/:assignment_id/answers", post(submit_answers))
        // POST /api/assignments
        .route("/api/assignments", post(create_assignment))
        // GET /api/companies/:company_id/assignments/active
        .route(
            "/api/companies/:company_id/assignments/active",
            get(get_active_assignment),
        )
        // POST /api/questions/:question_id/sync
        .route("/api/questions/:question_id/sync", post(sync_question))
        .with_state(state)
}
