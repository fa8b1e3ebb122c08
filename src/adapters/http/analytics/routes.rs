//! HTTP routes for analytics endpoints.

use axum::routing::get;
use axum::Router;

use super::handlers::{export_audit_log, export_responses, get_dashboard, AnalyticsAppState};

/// Creates the analytics router with all routes.
pub fn analytics_routes(state: AnalyticsAppState) -> Router {
    Router::new()
        // GET /api/analytics/dashboard
        .route("/api/analytics/dashboard", get(get_dashboard))
        // GET /api/analytics/responses/export
        .route("/api/analytics/responses/export", get(export_responses))
        // GET /api/audit/export
        .route("/api/audit/export", get(export_audit_log))
        .with_state(state)
}
