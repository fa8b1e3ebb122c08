//! ExportAuditLogHandler - Recent audit entries for tabular export.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::analytics::AnalyticsError;
use crate::domain::export::{export_file_name, AuditExportRow};
use crate::domain::foundation::{AccessPolicy, CallerIdentity, CompanyId};
use crate::ports::AuditReader;

pub const DEFAULT_AUDIT_EXPORT_LIMIT: u32 = 1_000;
pub const MAX_AUDIT_EXPORT_LIMIT: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct ExportAuditLogQuery {
    pub caller: CallerIdentity,
    /// `None` exports every company; only global roles may ask for it.
    pub company_id: Option<CompanyId>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct AuditExport {
    pub file_name: String,
    pub rows: Vec<AuditExportRow>,
}

pub struct ExportAuditLogHandler {
    reader: Arc<dyn AuditReader>,
    policy: AccessPolicy,
}

impl ExportAuditLogHandler {
    pub fn new(reader: Arc<dyn AuditReader>) -> Self {
        Self {
            reader,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(&self, query: ExportAuditLogQuery) -> Result<AuditExport, AnalyticsError> {
        if !self.policy.is_elevated(&query.caller) {
            return Err(AnalyticsError::Forbidden(format!(
                "role {} may not read the audit log",
                query.caller.role.as_str()
            )));
        }
        let scope = self
            .policy
            .resolve_analytics_scope(&query.caller, query.company_id)?;
        let limit = query
            .limit
            .unwrap_or(DEFAULT_AUDIT_EXPORT_LIMIT)
            .clamp(1, MAX_AUDIT_EXPORT_LIMIT);

        let records = self.reader.list_recent(scope.company_id(), limit).await?;

        Ok(AuditExport {
            file_name: export_file_name("audit", Utc::now()),
            rows: records.iter().map(AuditExportRow::from).collect(),
        })
    }
}
