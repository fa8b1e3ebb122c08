//! Audit logger that traces entries on a dedicated target.
//!
//! Operators can route `tacticsphere::audit` to its own sink with an
//! `EnvFilter` directive. When an inner logger is configured the entry is
//! also persisted there and its error is returned unchanged.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::audit::AuditEntry;
use crate::domain::foundation::DomainError;
use crate::ports::AuditLogger;

pub const AUDIT_TARGET: &str = "tacticsphere::audit";

#[derive(Clone, Default)]
pub struct TracingAuditLogger {
    inner: Option<Arc<dyn AuditLogger>>,
}

impl TracingAuditLogger {
    /// Trace-only logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Traces, then forwards to `inner`.
    pub fn forwarding_to(inner: Arc<dyn AuditLogger>) -> Self {
        Self { inner: Some(inner) }
    }
}

impl std::fmt::Debug for TracingAuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingAuditLogger")
            .field("forwarding", &self.inner.is_some())
            .finish()
    }
}

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn record(&self, entry: AuditEntry) -> Result<(), DomainError> {
        tracing::info!(
            target: AUDIT_TARGET,
            action = %entry.action,
            user_id = ?entry.user_id.map(|id| id.get()),
            user_role = ?entry.user_role.map(|r| r.as_str()),
            company_id = ?entry.company_id.map(|id| id.get()),
            entity_type = ?entry.entity_type,
            entity_id = ?entry.entity_id,
            notes = ?entry.notes,
            extra = %entry.extra,
            "audit"
        );
        match &self.inner {
            Some(inner) => inner.record(entry).await,
            None => Ok(()),
        }
    }
}
