//! HTTP handlers for analytics endpoints.
//!
//! Exports are streamed as CSV one encoded row per body chunk.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Json, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::stream;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::analytics::{
    ExportAuditLogHandler, ExportAuditLogQuery, ExportResponsesCommand, ExportResponsesHandler,
    GetDashboardAnalyticsHandler, GetDashboardAnalyticsQuery,
};
use crate::domain::analytics::AnalyticsReport;
use crate::domain::export::{csv_header, csv_line, CsvRecord};
use crate::domain::foundation::CompanyId;
use crate::ports::{AnalyticsReader, AuditLogger, AuditReader};

use super::dto::{AuditExportParams, DashboardParams, ExportParams};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing analytics dependencies.
#[derive(Clone)]
pub struct AnalyticsAppState {
    pub reader: Arc<dyn AnalyticsReader>,
    pub audit: Arc<dyn AuditLogger>,
    pub audit_reader: Arc<dyn AuditReader>,
}

impl AnalyticsAppState {
    pub fn dashboard_handler(&self) -> GetDashboardAnalyticsHandler {
        GetDashboardAnalyticsHandler::new(self.reader.clone())
    }

    pub fn export_responses_handler(&self) -> ExportResponsesHandler {
        ExportResponsesHandler::new(self.reader.clone(), self.audit.clone())
    }

    pub fn export_audit_handler(&self) -> ExportAuditLogHandler {
        ExportAuditLogHandler::new(self.audit_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// CSV Streaming
// ════════════════════════════════════════════════════════════════════════════════

/// Streams `rows` as a CSV attachment named `file_name`.
fn csv_attachment<T>(file_name: &str, rows: Vec<T>) -> Response
where
    T: CsvRecord + Send + 'static,
{
    let chunks = std::iter::once(csv_header::<T>())
        .chain(rows.into_iter().map(|row| csv_line(&row)));
    let body = Body::from_stream(stream::iter(chunks));

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/analytics/dashboard
///
/// Without `company_id` the report covers every company.
pub async fn get_dashboard(
    State(state): State<AnalyticsAppState>,
    Query(params): Query<DashboardParams>,
    RequireAuth(caller): RequireAuth,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let filters = params
        .filter_params()
        .to_filters()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let report = state
        .dashboard_handler()
        .handle(GetDashboardAnalyticsQuery {
            caller,
            company_id: params.company_id(),
            filters,
            include_timeline: params.include_timeline,
        })
        .await?;

    Ok(Json(report))
}

/// GET /api/analytics/responses/export
pub async fn export_responses(
    State(state): State<AnalyticsAppState>,
    Query(params): Query<ExportParams>,
    RequireAuth(caller): RequireAuth,
) -> Result<Response, ApiError> {
    let filters = params
        .filter_params()
        .to_filters()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let export = state
        .export_responses_handler()
        .handle(ExportResponsesCommand {
            caller,
            company_id: CompanyId::new(params.company_id),
            filters,
        })
        .await?;

    Ok(csv_attachment(&export.file_name, export.rows))
}

/// GET /api/audit/export
pub async fn export_audit_log(
    State(state): State<AnalyticsAppState>,
    Query(params): Query<AuditExportParams>,
    RequireAuth(caller): RequireAuth,
) -> Result<Response, ApiError> {
    let export = state
        .export_audit_handler()
        .handle(ExportAuditLogQuery {
            caller,
            company_id: params.company_id.map(CompanyId::new),
            limit: params.limit,
        })
        .await?;

    Ok(csv_attachment(&export.file_name, export.rows))
}
