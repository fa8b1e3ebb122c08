//! HTTP adapter for survey assignment endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::*;
pub use handlers::SurveyAppState;
pub use routes::survey_routes;
