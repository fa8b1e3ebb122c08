//! Best-effort audit recording shared by the handlers.

use tracing::warn;

use crate::domain::audit::AuditEntry;
use crate::ports::AuditLogger;

/// Records `entry`, logging and discarding any failure.
pub(crate) async fn record_quietly(logger: &dyn AuditLogger, entry: AuditEntry) {
    let action = entry.action;
    if let Err(error) = logger.record(entry).await {
        warn!(%action, %error, "audit entry dropped");
    }
}
