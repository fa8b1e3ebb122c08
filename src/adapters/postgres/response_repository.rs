//! PostgreSQL implementation of ResponseRepository.
//!
//! The response key is backed by `UNIQUE NULLS NOT DISTINCT`, so two
//! anonymous answers to the same question collide like identified ones.
//! Collisions surface as `ErrorCode::UniqueViolation` through the
//! `From<sqlx::Error>` conversion.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::assignment::{NewResponse, RespondentFilter, ResponseKey, SurveyResponse};
use crate::domain::foundation::{
    AssignmentId, DomainError, EmployeeId, ErrorCode, QuestionId, ResponseId,
};
use crate::ports::ResponseRepository;

#[derive(Clone)]
pub struct PostgresResponseRepository {
    pool: PgPool,
}

impl PostgresResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResponseRow {
    id: i64,
    assignment_id: i64,
    question_id: i64,
    employee_id: Option<i64>,
    value: String,
    submitted_at: DateTime<Utc>,
}

impl From<ResponseRow> for SurveyResponse {
    fn from(row: ResponseRow) -> Self {
        SurveyResponse {
            id: ResponseId::new(row.id),
            key: ResponseKey {
                assignment_id: AssignmentId::new(row.assignment_id),
                question_id: QuestionId::new(row.question_id),
                employee_id: row.employee_id.map(EmployeeId::new),
            },
            value: row.value,
            submitted_at: row.submitted_at,
        }
    }
}

/// SQL fragment and bind value for a respondent filter on `employee_id`.
///
/// `Nobody` binds no employee and matches no row.
fn respondent_clause(filter: RespondentFilter, param: u8) -> (String, Option<i64>) {
    match filter {
        RespondentFilter::AnonymousOnly => ("employee_id IS NULL".to_string(), None),
        RespondentFilter::Employee(id) => (format!("employee_id = ${}", param), Some(id.get())),
        RespondentFilter::Nobody => ("FALSE".to_string(), None),
    }
}

#[async_trait]
impl ResponseRepository for PostgresResponseRepository {
    async fn find_by_key(&self, key: &ResponseKey) -> Result<Option<SurveyResponse>, DomainError> {
        let row: Option<ResponseRow> = sqlx::query_as(
            r#"
            SELECT id, assignment_id, question_id, employee_id, value, submitted_at
            FROM responses
            WHERE assignment_id = $1
              AND question_id = $2
              AND employee_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(key.assignment_id.get())
        .bind(key.question_id.get())
        .bind(key.employee_id.map(|id| id.get()))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(SurveyResponse::from))
    }

    async fn insert(&self, response: &NewResponse) -> Result<SurveyResponse, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO responses (assignment_id, question_id, employee_id, value, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(response.key.assignment_id.get())
        .bind(response.key.question_id.get())
        .bind(response.key.employee_id.map(|id| id.get()))
        .bind(&response.value)
        .bind(response.submitted_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(SurveyResponse {
            id: ResponseId::new(id),
            key: response.key,
            value: response.value.clone(),
            submitted_at: response.submitted_at,
        })
    }

    async fn update_value(
        &self,
        id: ResponseId,
        value: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE responses SET value = $2, submitted_at = $3 WHERE id = $1")
            .bind(id.get())
            .bind(value)
            .bind(submitted_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::NotFound,
                format!("Response not found: {}", id),
            ));
        }
        Ok(())
    }

    async fn list_for_questions(
        &self,
        assignment_id: AssignmentId,
        question_ids: &[QuestionId],
        filter: RespondentFilter,
    ) -> Result<Vec<SurveyResponse>, DomainError> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let (respondent, employee) = respondent_clause(filter, 3);
        let sql = format!(
            r#"
            SELECT id, assignment_id, question_id, employee_id, value, submitted_at
            FROM responses
            WHERE assignment_id = $1
              AND question_id = ANY($2)
              AND {}
            ORDER BY question_id
            "#,
            respondent
        );
        let ids: Vec<i64> = question_ids.iter().map(|q| q.get()).collect();

        let mut query = sqlx::query_as::<_, ResponseRow>(&sql)
            .bind(assignment_id.get())
            .bind(ids);
        if let Some(employee) = employee {
            query = query.bind(employee);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(SurveyResponse::from).collect())
    }
}
