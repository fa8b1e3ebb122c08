//! Catalog records read by the survey and analytics flows.
//!
//! CRUD for these entities lives outside this crate; here they are plain
//! records plus the questionnaire reconciliation rules.

mod organization;
mod question;
mod questionnaire;

pub use organization::{full_name, Company, Department, Employee};
pub use question::{Pillar, Question, QuestionType};
pub use questionnaire::{
    plan_question_set, QuestionSetChanges, Questionnaire, QuestionnaireQuestion,
    QuestionnaireStatus, AUTO_QUESTIONNAIRE_TITLE,
};
