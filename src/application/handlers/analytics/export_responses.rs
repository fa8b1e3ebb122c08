//! ExportResponsesHandler - Raw response rows for tabular export.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::application::handlers::audit_trail::record_quietly;
use crate::domain::analytics::{AnalyticsError, AnalyticsFilters};
use crate::domain::audit::{AuditAction, AuditEntry};
use crate::domain::export::{export_file_name, ResponseExportRow};
use crate::domain::foundation::{AccessPolicy, CallerIdentity, CompanyId};
use crate::ports::{AnalyticsReader, AuditLogger};

#[derive(Debug, Clone)]
pub struct ExportResponsesCommand {
    pub caller: CallerIdentity,
    pub company_id: CompanyId,
    pub filters: AnalyticsFilters,
}

#[derive(Debug, Clone)]
pub struct ResponseExport {
    pub file_name: String,
    /// Newest first.
    pub rows: Vec<ResponseExportRow>,
}

pub struct ExportResponsesHandler {
    reader: Arc<dyn AnalyticsReader>,
    audit: Arc<dyn AuditLogger>,
    policy: AccessPolicy,
}

impl ExportResponsesHandler {
    pub fn new(reader: Arc<dyn AnalyticsReader>, audit: Arc<dyn AuditLogger>) -> Self {
        Self {
            reader,
            audit,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(&self, cmd: ExportResponsesCommand) -> Result<ResponseExport, AnalyticsError> {
        if !self.policy.is_elevated(&cmd.caller) {
            return Err(AnalyticsError::Forbidden(format!(
                "role {} may not export responses",
                cmd.caller.role.as_str()
            )));
        }
        self.policy.ensure_company_access(&cmd.caller, cmd.company_id)?;
        cmd.filters.validate()?;

        let rows = self.reader.export_rows(cmd.company_id, &cmd.filters).await?;
        let now = Utc::now();

        info!(company_id = %cmd.company_id, rows = rows.len(), "responses exported");

        let entry = AuditEntry::by(&cmd.caller, AuditAction::ReportExport, now)
            .company(Some(cmd.company_id))
            .notes("responses csv")
            .extra(json!({ "rows": rows.len(), "filters": cmd.filters }));
        record_quietly(self.audit.as_ref(), entry).await;

        Ok(ResponseExport {
            file_name: export_file_name("responses", now),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySurveyStore;
    use crate::application::handlers::fixtures::*;
    use crate::domain::assignment::{NewResponse, ResponseKey};
    use crate::domain::foundation::{AssignmentId, EmployeeId, QuestionId};
    use crate::ports::ResponseRepository;
    use chrono::{DateTime, Duration};

    async fn answer(
        store: &InMemorySurveyStore,
        assignment_id: AssignmentId,
        question: i64,
        employee: Option<EmployeeId>,
        value: &str,
        at: DateTime<Utc>,
    ) {
        let response = NewResponse {
            key: ResponseKey {
                assignment_id,
                question_id: QuestionId::new(question),
                employee_id: employee,
            },
            value: value.to_string(),
            submitted_at: at,
        };
        ResponseRepository::insert(store, &response).await.unwrap();
    }

    fn command(caller: CallerIdentity, filters: AnalyticsFilters) -> ExportResponsesCommand {
        ExportResponsesCommand {
            caller,
            company_id: ACME,
            filters,
        }
    }

    async fn world() -> std::sync::Arc<InMemorySurveyStore> {
        let store = seeded_store().await;
        let questionnaire = publish_questionnaire(&store, ACME, &[11, 22]).await;
        let assignment = open_assignment(&store, &questionnaire, false).await;
        let now = Utc::now();
        answer(&store, assignment.id, 11, Some(ANA), "4", now - Duration::hours(2)).await;
        answer(&store, assignment.id, 22, Some(ANA), "We use tickets", now - Duration::hours(1)).await;
        answer(&store, assignment.id, 11, Some(LUIS), "2", now).await;
        store
    }

    #[tokio::test]
    async fn exports_every_question_type_newest_first() {
        let store = world().await;

        let export = ExportResponsesHandler::new(store.clone(), store.clone())
            .handle(command(admin(), AnalyticsFilters::default()))
            .await
            .unwrap();

        let values: Vec<&str> = export.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["2", "We use tickets", "4"]);
        assert_eq!(export.rows[0].department_name.as_deref(), Some("Sales"));
        assert_eq!(export.rows[2].expected_answer.as_deref(), Some("Runbooks exist"));
        assert!(export.file_name.starts_with("responses-"));
    }

    #[tokio::test]
    async fn department_filter_restricts_rows() {
        let store = world().await;
        let filters = AnalyticsFilters {
            department_ids: vec![ENGINEERING],
            ..AnalyticsFilters::default()
        };

        let export = ExportResponsesHandler::new(store.clone(), store.clone())
            .handle(command(admin(), filters))
            .await
            .unwrap();

        assert_eq!(export.rows.len(), 2);
        assert!(export.rows.iter().all(|r| r.employee_id == Some(ANA)));
    }

    #[tokio::test]
    async fn regular_users_cannot_export() {
        let store = world().await;

        let err = ExportResponsesHandler::new(store.clone(), store.clone())
            .handle(command(member_of(ACME), AnalyticsFilters::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyticsError::Forbidden(_)));
    }

    #[tokio::test]
    async fn export_is_audited() {
        let store = world().await;

        ExportResponsesHandler::new(store.clone(), store.clone())
            .handle(command(admin(), AnalyticsFilters::default()))
            .await
            .unwrap();

        let entries = store.audit_entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry.action, AuditAction::ReportExport);
        assert_eq!(entries[0].entry.extra["rows"], 3);
    }
}
