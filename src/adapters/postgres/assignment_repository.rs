//! PostgreSQL implementation of AssignmentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{corrupt, parse_column};
use crate::domain::assignment::{Assignment, AssignmentScope, NewAssignment, ScopeType, ValidityWindow};
use crate::domain::foundation::{AssignmentId, CompanyId, DomainError, ErrorCode, QuestionnaireId};
use crate::ports::AssignmentRepository;

const COLUMNS: &str =
    "id, company_id, questionnaire_id, scope_type, scope_id, starts_at, ends_at, anonymous";

#[derive(Clone)]
pub struct PostgresAssignmentRepository {
    pool: PgPool,
}

impl PostgresAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AssignmentRow {
    id: i64,
    company_id: i64,
    questionnaire_id: i64,
    scope_type: String,
    scope_id: Option<i64>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    anonymous: bool,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = DomainError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        let scope_type: ScopeType = parse_column("assignments.scope_type", &row.scope_type)?;
        let scope = AssignmentScope::from_parts(scope_type, row.scope_id)
            .map_err(|e| corrupt("assignments.scope_id", e))?;
        let window = ValidityWindow::new(row.starts_at, row.ends_at)
            .map_err(|e| corrupt("assignments.ends_at", e))?;
        Ok(Assignment {
            id: AssignmentId::new(row.id),
            company_id: CompanyId::new(row.company_id),
            questionnaire_id: QuestionnaireId::new(row.questionnaire_id),
            scope,
            window,
            anonymous: row.anonymous,
        })
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn find_by_id(&self, id: AssignmentId) -> Result<Option<Assignment>, DomainError> {
        let row: Option<AssignmentRow> =
            sqlx::query_as(&format!("SELECT {} FROM assignments WHERE id = $1", COLUMNS))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Assignment::try_from).transpose()
    }

    async fn find_active_company_wide(
        &self,
        company_id: CompanyId,
        at: DateTime<Utc>,
    ) -> Result<Option<Assignment>, DomainError> {
        let row: Option<AssignmentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM assignments
            WHERE company_id = $1
              AND scope_type = 'COMPANY'
              AND starts_at <= $2
              AND ends_at >= $2
            ORDER BY starts_at DESC, id DESC
            LIMIT 1
            "#,
            COLUMNS
        ))
        .bind(company_id.get())
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Assignment::try_from).transpose()
    }

    async fn insert(&self, assignment: &NewAssignment) -> Result<Assignment, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO assignments (
                company_id, questionnaire_id, scope_type, scope_id, starts_at, ends_at, anonymous
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(assignment.company_id.get())
        .bind(assignment.questionnaire_id.get())
        .bind(assignment.scope.scope_type().as_str())
        .bind(assignment.scope.scope_id())
        .bind(assignment.window.starts_at())
        .bind(assignment.window.ends_at())
        .bind(assignment.anonymous)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment.clone().with_id(AssignmentId::new(id)))
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE assignments SET
                questionnaire_id = $2,
                scope_type = $3,
                scope_id = $4,
                starts_at = $5,
                ends_at = $6,
                anonymous = $7
            WHERE id = $1
            "#,
        )
        .bind(assignment.id.get())
        .bind(assignment.questionnaire_id.get())
        .bind(assignment.scope.scope_type().as_str())
        .bind(assignment.scope.scope_id())
        .bind(assignment.window.starts_at())
        .bind(assignment.window.ends_at())
        .bind(assignment.anonymous)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AssignmentNotFound,
                format!("Assignment not found: {}", assignment.id),
            ));
        }
        Ok(())
    }
}
