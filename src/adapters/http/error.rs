//! Shared error body and status mapping for every HTTP module.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::analytics::AnalyticsError;
use crate::domain::assignment::AssignmentError;
use crate::domain::foundation::ErrorCode;

/// Standard error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// API error that implements IntoResponse.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(ErrorResponse),
    Unauthorized(ErrorResponse),
    Forbidden(ErrorResponse),
    NotFound(ErrorResponse),
    Internal(ErrorResponse),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(ErrorResponse::bad_request(message))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_code(code: ErrorCode, message: String) -> Self {
        let body = ErrorResponse::new(code.to_string(), message);
        match code {
            ErrorCode::ValidationFailed | ErrorCode::UniqueViolation => ApiError::BadRequest(body),
            ErrorCode::Unauthorized => ApiError::Unauthorized(body),
            ErrorCode::Forbidden | ErrorCode::AssignmentNotActive => ApiError::Forbidden(body),
            code if code.is_not_found() => ApiError::NotFound(body),
            _ => ApiError::Internal(body),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest(body)
            | ApiError::Unauthorized(body)
            | ApiError::Forbidden(body)
            | ApiError::NotFound(body)
            | ApiError::Internal(body) => body,
        };
        (status, Json(body)).into_response()
    }
}

impl From<AssignmentError> for ApiError {
    fn from(error: AssignmentError) -> Self {
        match error {
            AssignmentError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "survey request failed");
                ApiError::Internal(ErrorResponse::internal("Internal server error"))
            }
            other => ApiError::from_code(other.code(), other.to_string()),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(error: AnalyticsError) -> Self {
        match error {
            AnalyticsError::Database(msg) => {
                tracing::error!(error = %msg, "analytics request failed");
                ApiError::Internal(ErrorResponse::internal("Internal server error"))
            }
            other => ApiError::from_code(other.code(), other.to_string()),
        }
    }
}
