//! PostgreSQL implementation of AnalyticsReader.
//!
//! A snapshot is three set-based queries regardless of data volume:
//! filtered Likert rows, department names and the employee universe.
//! Every optional filter is bound as a nullable parameter so the SQL text
//! never changes with the request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

use super::{corrupt, id_array, parse_column};
use crate::domain::analytics::{
    AnalyticsFilters, AnalyticsQuery, AnalyticsRow, AnalyticsSnapshot, RespondentRef,
    UniverseEmployee,
};
use crate::domain::assignment::{AssignmentScope, ScopeType};
use crate::domain::catalog::full_name;
use crate::domain::export::ResponseExportRow;
use crate::domain::foundation::{
    AssignmentId, CompanyId, DepartmentId, DomainError, EmployeeId, PillarId, QuestionId,
    ResponseId,
};
use crate::ports::AnalyticsReader;

/// Joins and filters shared by the snapshot and export queries.
///
/// Parameters: `$1` company, `$2` from, `$3` before, `$4` pillars,
/// `$5` employees, `$6` departments. The employee filter takes precedence
/// over the department filter; the department filter also admits rows of
/// department-scoped assignments.
const FILTERED_RESPONSES: &str = r#"
    FROM responses r
    JOIN assignments a ON a.id = r.assignment_id
    JOIN questions q ON q.id = r.question_id
    JOIN pillars p ON p.id = q.pillar_id
    LEFT JOIN employees e ON e.id = r.employee_id
    LEFT JOIN departments d ON d.id = e.department_id
    WHERE ($1::bigint IS NULL OR a.company_id = $1)
      AND ($2::timestamptz IS NULL OR r.submitted_at >= $2)
      AND ($3::timestamptz IS NULL OR r.submitted_at < $3)
      AND ($4::bigint[] IS NULL OR p.id = ANY($4))
      AND COALESCE(
          CASE
              WHEN $5::bigint[] IS NOT NULL THEN e.id = ANY($5)
              WHEN $6::bigint[] IS NOT NULL THEN
                  e.department_id = ANY($6)
                  OR (a.scope_type = 'DEPARTMENT' AND a.scope_id = ANY($6))
              ELSE TRUE
          END,
          FALSE)
"#;

#[derive(Clone)]
pub struct PostgresAnalyticsReader {
    pool: PgPool,
}

impl PostgresAnalyticsReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn filtered<'q, O>(
    sql: &'q str,
    company_id: Option<CompanyId>,
    filters: &AnalyticsFilters,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    sqlx::query_as::<_, O>(sql)
        .bind(company_id.map(|id| id.get()))
        .bind(filters.submitted_from())
        .bind(filters.submitted_before())
        .bind(id_array(&filters.pillar_ids, |id| id.get()))
        .bind(id_array(&filters.employee_ids, |id| id.get()))
        .bind(id_array(&filters.department_ids, |id| id.get()))
}

fn scope_of(scope_type: &str, scope_id: Option<i64>) -> Result<AssignmentScope, DomainError> {
    let scope_type: ScopeType = parse_column("assignments.scope_type", scope_type)?;
    AssignmentScope::from_parts(scope_type, scope_id).map_err(|e| corrupt("assignments.scope_id", e))
}

#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    response_id: i64,
    submitted_at: DateTime<Utc>,
    value: String,
    question_weight: i32,
    pillar_id: i64,
    pillar_name: String,
    pillar_weight: i32,
    scope_type: String,
    scope_id: Option<i64>,
    employee_id: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    department_id: Option<i64>,
}

impl TryFrom<SnapshotRow> for AnalyticsRow {
    type Error = DomainError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let respondent = row.employee_id.map(|id| RespondentRef {
            id: EmployeeId::new(id),
            name: full_name(row.first_name.as_deref().unwrap_or_default(), row.last_name.as_deref()),
            department_id: row.department_id.map(DepartmentId::new),
        });
        Ok(AnalyticsRow {
            response_id: ResponseId::new(row.response_id),
            submitted_at: row.submitted_at,
            value: row.value,
            question_weight: row.question_weight,
            pillar_id: PillarId::new(row.pillar_id),
            pillar_name: row.pillar_name,
            pillar_weight: row.pillar_weight,
            assignment_scope: scope_of(&row.scope_type, row.scope_id)?,
            respondent,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ExportSqlRow {
    response_id: i64,
    submitted_at: DateTime<Utc>,
    assignment_id: i64,
    scope_type: String,
    scope_id: Option<i64>,
    question_id: i64,
    question_statement: String,
    expected_answer: Option<String>,
    pillar_id: i64,
    pillar_name: String,
    employee_id: Option<i64>,
    first_name: Option<String>,
    last_name: Option<String>,
    department_name: Option<String>,
    value: String,
}

impl TryFrom<ExportSqlRow> for ResponseExportRow {
    type Error = DomainError;

    fn try_from(row: ExportSqlRow) -> Result<Self, Self::Error> {
        let employee_name = row
            .employee_id
            .map(|_| full_name(row.first_name.as_deref().unwrap_or_default(), row.last_name.as_deref()));
        Ok(ResponseExportRow {
            response_id: ResponseId::new(row.response_id),
            submitted_at: row.submitted_at,
            assignment_id: AssignmentId::new(row.assignment_id),
            scope_type: parse_column("assignments.scope_type", &row.scope_type)?,
            scope_id: row.scope_id,
            question_id: QuestionId::new(row.question_id),
            question_statement: row.question_statement,
            expected_answer: row.expected_answer,
            pillar_id: PillarId::new(row.pillar_id),
            pillar_name: row.pillar_name,
            employee_id: row.employee_id.map(EmployeeId::new),
            employee_name,
            department_name: row.department_name,
            value: row.value,
        })
    }
}

#[async_trait]
impl AnalyticsReader for PostgresAnalyticsReader {
    async fn load_snapshot(&self, query: &AnalyticsQuery) -> Result<AnalyticsSnapshot, DomainError> {
        let company_id = query.scope.company_id();
        let sql = format!(
            r#"
            SELECT r.id AS response_id, r.submitted_at, r.value,
                   q.weight AS question_weight,
                   p.id AS pillar_id, p.name AS pillar_name, p.weight AS pillar_weight,
                   a.scope_type, a.scope_id,
                   e.id AS employee_id, e.first_name, e.last_name, e.department_id
            {}
              AND q.question_type = 'LIKERT'
            ORDER BY r.submitted_at, r.id
            "#,
            FILTERED_RESPONSES
        );
        let rows: Vec<SnapshotRow> = filtered(&sql, company_id, &query.filters)
            .fetch_all(&self.pool)
            .await?;
        let rows = rows
            .into_iter()
            .map(AnalyticsRow::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let departments: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, name FROM departments WHERE $1::bigint IS NULL OR company_id = $1",
        )
        .bind(company_id.map(|id| id.get()))
        .fetch_all(&self.pool)
        .await?;

        let employees: Vec<(i64, Option<i64>)> = sqlx::query_as(
            "SELECT id, department_id FROM employees WHERE $1::bigint IS NULL OR company_id = $1 ORDER BY id",
        )
        .bind(company_id.map(|id| id.get()))
        .fetch_all(&self.pool)
        .await?;

        Ok(AnalyticsSnapshot {
            rows,
            department_names: departments
                .into_iter()
                .map(|(id, name)| (DepartmentId::new(id), name))
                .collect(),
            employees: employees
                .into_iter()
                .map(|(id, department_id)| UniverseEmployee {
                    id: EmployeeId::new(id),
                    department_id: department_id.map(DepartmentId::new),
                })
                .collect(),
        })
    }

    async fn export_rows(
        &self,
        company_id: CompanyId,
        filters: &AnalyticsFilters,
    ) -> Result<Vec<ResponseExportRow>, DomainError> {
        let sql = format!(
            r#"
            SELECT r.id AS response_id, r.submitted_at, a.id AS assignment_id,
                   a.scope_type, a.scope_id,
                   q.id AS question_id, q.statement AS question_statement, q.expected_answer,
                   p.id AS pillar_id, p.name AS pillar_name,
                   e.id AS employee_id, e.first_name, e.last_name,
                   d.name AS department_name,
                   r.value
            {}
            ORDER BY r.submitted_at DESC, r.id DESC
            "#,
            FILTERED_RESPONSES
        );
        let rows: Vec<ExportSqlRow> = filtered(&sql, Some(company_id), filters)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(ResponseExportRow::try_from).collect()
    }
}
