//! Survey handlers.
//!
//! ## Commands
//! - Auto-provisioning and explicit creation of assignments
//! - Beginning a survey and bulk answer submission
//! - Attaching new questions to existing questionnaires
//!
//! ## Queries
//! - Active company-wide assignment
//! - Pillars and questions of an assignment
//! - Assignment progress

mod begin_survey;
mod create_assignment;
mod ensure_auto_assignment;
mod get_active_assignment;
mod get_assignment_progress;
mod get_pillar_questions;
mod list_assignment_pillars;
mod submit_answers;
mod sync_question;

use crate::domain::assignment::{Assignment, AssignmentError};
use crate::domain::foundation::{AccessPolicy, AssignmentId, CallerIdentity};
use crate::ports::AssignmentRepository;

// Commands
pub use begin_survey::{BeginSurveyCommand, BeginSurveyHandler};
pub use create_assignment::{CreateAssignmentCommand, CreateAssignmentHandler};
pub use ensure_auto_assignment::{
    AutoAssignmentWindow, EnsureAutoAssignmentCommand, EnsureAutoAssignmentHandler,
    EnsureAutoAssignmentResult,
};
pub use submit_answers::{SubmitAnswersCommand, SubmitAnswersHandler};
pub use sync_question::{SyncQuestionCommand, SyncQuestionHandler};

// Queries
pub use get_active_assignment::{GetActiveAssignmentHandler, GetActiveAssignmentQuery};
pub use get_assignment_progress::{GetAssignmentProgressHandler, GetAssignmentProgressQuery};
pub use get_pillar_questions::{GetPillarQuestionsHandler, GetPillarQuestionsQuery, PillarQuestionView};
pub use list_assignment_pillars::{ListAssignmentPillarsHandler, ListAssignmentPillarsQuery};

/// Loads an assignment the caller may access.
async fn load_accessible(
    assignments: &dyn AssignmentRepository,
    policy: &AccessPolicy,
    caller: &CallerIdentity,
    id: AssignmentId,
) -> Result<Assignment, AssignmentError> {
    let assignment = assignments
        .find_by_id(id)
        .await?
        .ok_or(AssignmentError::NotFound(id))?;
    policy.ensure_company_access(caller, assignment.company_id)?;
    Ok(assignment)
}
