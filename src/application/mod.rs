//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::analytics::{
    ExportAuditLogHandler, ExportAuditLogQuery, ExportResponsesCommand, ExportResponsesHandler,
    GetDashboardAnalyticsHandler, GetDashboardAnalyticsQuery,
};
pub use handlers::survey::{
    AutoAssignmentWindow, BeginSurveyCommand, BeginSurveyHandler, CreateAssignmentCommand,
    CreateAssignmentHandler, EnsureAutoAssignmentCommand, EnsureAutoAssignmentHandler,
    GetActiveAssignmentHandler, GetActiveAssignmentQuery, GetAssignmentProgressHandler,
    GetAssignmentProgressQuery, GetPillarQuestionsHandler, GetPillarQuestionsQuery,
    ListAssignmentPillarsHandler, ListAssignmentPillarsQuery, SubmitAnswersCommand,
    SubmitAnswersHandler, SyncQuestionCommand, SyncQuestionHandler,
};
