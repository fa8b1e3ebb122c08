//! In-memory adapters.

mod survey_store;

pub use survey_store::InMemorySurveyStore;
