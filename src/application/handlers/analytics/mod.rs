//! Analytics handlers.
//!
//! ## Queries
//! - Dashboard analytics for one company or the global view
//! - Audit log export
//!
//! ## Commands
//! - Raw response export (audited)

mod export_audit_log;
mod export_responses;
mod get_dashboard_analytics;

pub use export_audit_log::{
    AuditExport, ExportAuditLogHandler, ExportAuditLogQuery, DEFAULT_AUDIT_EXPORT_LIMIT,
    MAX_AUDIT_EXPORT_LIMIT,
};
pub use export_responses::{ExportResponsesCommand, ExportResponsesHandler, ResponseExport};
pub use get_dashboard_analytics::{GetDashboardAnalyticsHandler, GetDashboardAnalyticsQuery};
