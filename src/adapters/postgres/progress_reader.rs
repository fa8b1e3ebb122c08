//! PostgreSQL implementation of ProgressReader.
//!
//! Both queries join through the assignment's questionnaire and keep only
//! questions whose pillar the company may see.

use async_trait::async_trait;
use sqlx::PgPool;

use super::parse_column;
use crate::domain::assignment::{Assignment, RespondentFilter};
use crate::domain::foundation::{DomainError, PillarId};
use crate::domain::progress::{AnswerRow, PillarQuestionCount};
use crate::ports::ProgressReader;

#[derive(Clone)]
pub struct PostgresProgressReader {
    pool: PgPool,
}

impl PostgresProgressReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CountRow {
    pillar_id: i64,
    pillar_name: String,
    total: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct AnswerSqlRow {
    pillar_id: i64,
    question_type: String,
    value: Option<String>,
}

#[async_trait]
impl ProgressReader for PostgresProgressReader {
    async fn pillar_question_counts(
        &self,
        assignment: &Assignment,
    ) -> Result<Vec<PillarQuestionCount>, DomainError> {
        let rows: Vec<CountRow> = sqlx::query_as(
            r#"
            SELECT p.id AS pillar_id, p.name AS pillar_name, COUNT(*) AS total
            FROM questionnaire_questions qq
            JOIN questions q ON q.id = qq.question_id
            JOIN pillars p ON p.id = q.pillar_id
            WHERE qq.questionnaire_id = $1
              AND (p.company_id IS NULL OR p.company_id = $2)
            GROUP BY p.id, p.name
            ORDER BY p.id
            "#,
        )
        .bind(assignment.questionnaire_id.get())
        .bind(assignment.company_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PillarQuestionCount {
                pillar_id: PillarId::new(row.pillar_id),
                pillar_name: row.pillar_name,
                total: u32::try_from(row.total).unwrap_or(u32::MAX),
            })
            .collect())
    }

    async fn answer_rows(
        &self,
        assignment: &Assignment,
        filter: RespondentFilter,
    ) -> Result<Vec<AnswerRow>, DomainError> {
        if filter == RespondentFilter::Nobody {
            return Ok(Vec::new());
        }
        let rows: Vec<AnswerSqlRow> = sqlx::query_as(
            r#"
            SELECT q.pillar_id, q.question_type, r.value
            FROM responses r
            JOIN questionnaire_questions qq
              ON qq.question_id = r.question_id AND qq.questionnaire_id = $2
            JOIN questions q ON q.id = r.question_id
            JOIN pillars p ON p.id = q.pillar_id
            WHERE r.assignment_id = $1
              AND (p.company_id IS NULL OR p.company_id = $3)
              AND (($4::bigint IS NULL AND r.employee_id IS NULL) OR r.employee_id = $4)
            "#,
        )
        .bind(assignment.id.get())
        .bind(assignment.questionnaire_id.get())
        .bind(assignment.company_id.get())
        .bind(filter.employee_id().map(|id| id.get()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(AnswerRow {
                    pillar_id: PillarId::new(row.pillar_id),
                    question_type: parse_column("questions.question_type", &row.question_type)?,
                    value: row.value,
                })
            })
            .collect()
    }
}
