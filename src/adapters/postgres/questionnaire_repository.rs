//! PostgreSQL implementation of QuestionnaireRepository.
//!
//! Question-set changes run in one transaction so a questionnaire never
//! shows half of a reconciliation.

use async_trait::async_trait;
use sqlx::PgPool;

use super::parse_column;
use crate::domain::catalog::{Questionnaire, QuestionnaireQuestion, QuestionSetChanges};
use crate::domain::foundation::{CompanyId, DomainError, QuestionId, QuestionnaireId};
use crate::ports::{NewQuestionnaire, QuestionnaireRepository};

#[derive(Clone)]
pub struct PostgresQuestionnaireRepository {
    pool: PgPool,
}

impl PostgresQuestionnaireRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuestionnaireRow {
    id: i64,
    company_id: i64,
    title: String,
    version: i32,
    status: String,
}

impl TryFrom<QuestionnaireRow> for Questionnaire {
    type Error = DomainError;

    fn try_from(row: QuestionnaireRow) -> Result<Self, Self::Error> {
        Ok(Questionnaire {
            id: QuestionnaireId::new(row.id),
            company_id: CompanyId::new(row.company_id),
            title: row.title,
            version: row.version,
            status: parse_column("questionnaires.status", &row.status)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    questionnaire_id: i64,
    question_id: i64,
    position: i32,
}

impl From<LinkRow> for QuestionnaireQuestion {
    fn from(row: LinkRow) -> Self {
        QuestionnaireQuestion {
            questionnaire_id: QuestionnaireId::new(row.questionnaire_id),
            question_id: QuestionId::new(row.question_id),
            position: row.position,
        }
    }
}

#[async_trait]
impl QuestionnaireRepository for PostgresQuestionnaireRepository {
    async fn find_by_id(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, DomainError> {
        let row: Option<QuestionnaireRow> = sqlx::query_as(
            "SELECT id, company_id, title, version, status FROM questionnaires WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Questionnaire::try_from).transpose()
    }

    async fn latest_published(&self, company_id: CompanyId) -> Result<Option<Questionnaire>, DomainError> {
        let row: Option<QuestionnaireRow> = sqlx::query_as(
            r#"
            SELECT id, company_id, title, version, status
            FROM questionnaires
            WHERE company_id = $1 AND status = 'PUBLISHED'
            ORDER BY version DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(company_id.get())
        .fetch_optional(&self.pool)
        .await?;
        row.map(Questionnaire::try_from).transpose()
    }

    async fn list(&self, company_id: Option<CompanyId>) -> Result<Vec<Questionnaire>, DomainError> {
        let rows: Vec<QuestionnaireRow> = sqlx::query_as(
            r#"
            SELECT id, company_id, title, version, status
            FROM questionnaires
            WHERE $1::bigint IS NULL OR company_id = $1
            ORDER BY id
            "#,
        )
        .bind(company_id.map(|id| id.get()))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Questionnaire::try_from).collect()
    }

    async fn create(&self, questionnaire: &NewQuestionnaire) -> Result<Questionnaire, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO questionnaires (company_id, title, version, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(questionnaire.company_id.get())
        .bind(&questionnaire.title)
        .bind(questionnaire.version)
        .bind(questionnaire.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(Questionnaire {
            id: QuestionnaireId::new(id),
            company_id: questionnaire.company_id,
            title: questionnaire.title.clone(),
            version: questionnaire.version,
            status: questionnaire.status,
        })
    }

    async fn question_links(&self, id: QuestionnaireId) -> Result<Vec<QuestionnaireQuestion>, DomainError> {
        let rows: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT questionnaire_id, question_id, position
            FROM questionnaire_questions
            WHERE questionnaire_id = $1
            ORDER BY position, question_id
            "#,
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(QuestionnaireQuestion::from).collect())
    }

    async fn apply_question_changes(
        &self,
        id: QuestionnaireId,
        changes: &QuestionSetChanges,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await?;

        if !changes.removed.is_empty() {
            let removed: Vec<i64> = changes.removed.iter().map(|q| q.get()).collect();
            sqlx::query(
                "DELETE FROM questionnaire_questions WHERE questionnaire_id = $1 AND question_id = ANY($2)",
            )
            .bind(id.get())
            .bind(&removed)
            .execute(&mut *tx)
            .await?;
        }

        for link in &changes.added {
            sqlx::query(
                "INSERT INTO questionnaire_questions (questionnaire_id, question_id, position) VALUES ($1, $2, $3)",
            )
            .bind(id.get())
            .bind(link.question_id.get())
            .bind(link.position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn contains_question(
        &self,
        id: QuestionnaireId,
        question_id: QuestionId,
    ) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM questionnaire_questions
                WHERE questionnaire_id = $1 AND question_id = $2
            )
            "#,
        )
        .bind(id.get())
        .bind(question_id.get())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
