//! Flat export rows and their CSV encoding.
//!
//! Rows are encoded one at a time so the HTTP layer can stream them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::assignment::ScopeType;
use crate::domain::audit::AuditRecord;
use crate::domain::foundation::{AssignmentId, EmployeeId, PillarId, QuestionId, ResponseId};

/// A raw response flattened for export, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseExportRow {
    pub response_id: ResponseId,
    pub submitted_at: DateTime<Utc>,
    pub assignment_id: AssignmentId,
    pub scope_type: ScopeType,
    pub scope_id: Option<i64>,
    pub question_id: QuestionId,
    pub question_statement: String,
    pub expected_answer: Option<String>,
    pub pillar_id: PillarId,
    pub pillar_name: String,
    pub employee_id: Option<EmployeeId>,
    pub employee_name: Option<String>,
    pub department_name: Option<String>,
    pub value: String,
}

/// An audit record flattened for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditExportRow {
    pub id: i64,
    pub occurred_at: DateTime<Utc>,
    pub action: String,
    pub user_id: Option<i64>,
    pub user_role: Option<String>,
    pub company_id: Option<i64>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub notes: Option<String>,
    pub extra: String,
}

impl From<&AuditRecord> for AuditExportRow {
    fn from(record: &AuditRecord) -> Self {
        let entry = &record.entry;
        Self {
            id: record.id,
            occurred_at: entry.occurred_at,
            action: entry.action.to_string(),
            user_id: entry.user_id.map(|id| id.get()),
            user_role: entry.user_role.map(|r| r.to_string()),
            company_id: entry.company_id.map(|id| id.get()),
            entity_type: entry.entity_type.clone(),
            entity_id: entry.entity_id,
            notes: entry.notes.clone(),
            extra: if entry.extra.is_null() {
                String::new()
            } else {
                entry.extra.to_string()
            },
        }
    }
}

/// A row type with a fixed CSV header.
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

impl CsvRecord for ResponseExportRow {
    const HEADERS: &'static [&'static str] = &[
        "response_id",
        "submitted_at",
        "assignment_id",
        "scope_type",
        "scope_id",
        "question_id",
        "question_statement",
        "expected_answer",
        "pillar_id",
        "pillar_name",
        "employee_id",
        "employee_name",
        "department_name",
        "value",
    ];
}

impl CsvRecord for AuditExportRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "occurred_at",
        "action",
        "user_id",
        "user_role",
        "company_id",
        "entity_type",
        "entity_id",
        "notes",
        "extra",
    ];
}

/// Encodes the header line of `T`.
pub fn csv_header<T: CsvRecord>() -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(T::HEADERS)?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Encodes one row as a CSV line.
pub fn csv_line<T: CsvRecord>(row: &T) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.serialize(row)?;
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// File name for an export generated at `at`.
pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.csv", prefix, at.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::{AuditAction, AuditEntry};
    use crate::domain::foundation::{CallerIdentity, CompanyId, Role, UserId};
    use chrono::TimeZone;

    fn response_row(employee: Option<(i64, &str)>) -> ResponseExportRow {
        ResponseExportRow {
            response_id: ResponseId::new(1),
            submitted_at: Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap(),
            assignment_id: AssignmentId::new(2),
            scope_type: ScopeType::Company,
            scope_id: None,
            question_id: QuestionId::new(3),
            question_statement: "Do you use CI, daily?".to_string(),
            expected_answer: None,
            pillar_id: PillarId::new(4),
            pillar_name: "Delivery".to_string(),
            employee_id: employee.map(|(id, _)| EmployeeId::new(id)),
            employee_name: employee.map(|(_, name)| name.to_string()),
            department_name: None,
            value: "4".to_string(),
        }
    }

    #[test]
    fn header_matches_column_order() {
        let header = String::from_utf8(csv_header::<ResponseExportRow>().unwrap()).unwrap();
        assert!(header.starts_with("response_id,submitted_at,assignment_id,scope_type"));
        assert!(header.trim_end().ends_with("department_name,value"));
    }

    #[test]
    fn line_quotes_commas_and_leaves_nulls_empty() {
        let line = String::from_utf8(csv_line(&response_row(None)).unwrap()).unwrap();
        assert_eq!(
            line,
            "1,2025-02-03T04:05:06Z,2,COMPANY,,3,\"Do you use CI, daily?\",,4,Delivery,,,,4\n"
        );
    }

    #[test]
    fn header_and_lines_concatenate_into_a_document() {
        let mut out = csv_header::<ResponseExportRow>().unwrap();
        for row in [response_row(Some((7, "Ana Rojas"))), response_row(None)] {
            out.extend(csv_line(&row).unwrap());
        }
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains(",7,Ana Rojas,"));
    }

    #[test]
    fn audit_rows_flatten_extra_as_json() {
        let caller = CallerIdentity::new(UserId::new(1), Role::Admin, Some(CompanyId::new(2)));
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let record = AuditRecord {
            id: 9,
            entry: AuditEntry::by(&caller, AuditAction::SurveyAnswerBulk, at)
                .extra(serde_json::json!({"created": 1})),
        };
        let row = AuditExportRow::from(&record);
        assert_eq!(row.action, "SURVEY_ANSWER_BULK");
        assert_eq!(row.user_role.as_deref(), Some("ADMIN"));
        assert_eq!(row.extra, r#"{"created":1}"#);
    }

    #[test]
    fn file_name_uses_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 1).unwrap();
        assert_eq!(export_file_name("responses", at), "responses-20251231235901.csv");
    }
}
