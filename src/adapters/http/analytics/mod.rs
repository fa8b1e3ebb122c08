//! HTTP adapter for analytics and export endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::AnalyticsAppState;
pub use routes::analytics_routes;
