//! Audit trail ports.
//!
//! Recording is fire-and-forget from the caller's point of view: handlers
//! log a failed `record` and carry on.

use async_trait::async_trait;

use crate::domain::audit::{AuditEntry, AuditRecord};
use crate::domain::foundation::{CompanyId, DomainError};

#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), DomainError>;
}

#[async_trait]
pub trait AuditReader: Send + Sync {
    /// Most recent entries first, optionally restricted to one company.
    async fn list_recent(
        &self,
        company_id: Option<CompanyId>,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_ports_are_object_safe() {
        fn _accepts_logger(_logger: &dyn AuditLogger) {}
        fn _accepts_reader(_reader: &dyn AuditReader) {}
    }
}
