//! HTTP adapters - REST API implementations.
//!
//! Each module has its own DTOs, handlers and routes. `api_router` merges
//! them behind the bearer-token middleware.

pub mod analytics;
pub mod error;
pub mod middleware;
pub mod survey;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use analytics::{analytics_routes, AnalyticsAppState};
pub use error::{ApiError, ErrorResponse};
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use survey::{survey_routes, SurveyAppState};

async fn health() -> &'static str {
    "ok"
}

/// All API routes with authentication and request tracing.
pub fn api_router(survey: SurveyAppState, analytics: AnalyticsAppState, validator: AuthState) -> Router {
    Router::new()
        .merge(survey_routes(survey))
        .merge(analytics_routes(analytics))
        .layer(axum::middleware::from_fn_with_state(validator, auth_middleware))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

/// Adds CORS and the request timeout configured for the server.
pub fn with_server_layers(router: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors)
}
