//! PostgreSQL implementation of CatalogReader.

use async_trait::async_trait;
use sqlx::PgPool;

use super::parse_column;
use crate::domain::catalog::{Company, Department, Employee, Pillar, Question};
use crate::domain::foundation::{
    CompanyId, DepartmentId, DomainError, EmployeeId, PillarId, QuestionId, QuestionnaireId,
};
use crate::ports::CatalogReader;

const QUESTION_COLUMNS: &str =
    "q.id, q.pillar_id, q.statement, q.question_type, q.required, q.weight, q.expected_answer";

#[derive(Clone)]
pub struct PostgresCatalogReader {
    pool: PgPool,
}

impl PostgresCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: i64,
    name: String,
    tax_id: Option<String>,
    industry: Option<String>,
    active: bool,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: CompanyId::new(row.id),
            name: row.name,
            tax_id: row.tax_id,
            industry: row.industry,
            active: row.active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    company_id: i64,
    department_id: Option<i64>,
    first_name: String,
    last_name: Option<String>,
    external_id: Option<String>,
    email: Option<String>,
    title: Option<String>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: EmployeeId::new(row.id),
            company_id: CompanyId::new(row.company_id),
            department_id: row.department_id.map(DepartmentId::new),
            first_name: row.first_name,
            last_name: row.last_name,
            external_id: row.external_id,
            email: row.email,
            title: row.title,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PillarRow {
    id: i64,
    company_id: Option<i64>,
    name: String,
    description: Option<String>,
    weight: i32,
}

impl From<PillarRow> for Pillar {
    fn from(row: PillarRow) -> Self {
        Pillar {
            id: PillarId::new(row.id),
            company_id: row.company_id.map(CompanyId::new),
            name: row.name,
            description: row.description,
            weight: row.weight,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: i64,
    pillar_id: i64,
    statement: String,
    question_type: String,
    required: bool,
    weight: i32,
    expected_answer: Option<String>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = DomainError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: QuestionId::new(row.id),
            pillar_id: PillarId::new(row.pillar_id),
            statement: row.statement,
            question_type: parse_column("questions.question_type", &row.question_type)?,
            required: row.required,
            weight: row.weight,
            expected_answer: row.expected_answer,
        })
    }
}

fn questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, DomainError> {
    rows.into_iter().map(Question::try_from).collect()
}

#[async_trait]
impl CatalogReader for PostgresCatalogReader {
    async fn find_company(&self, id: CompanyId) -> Result<Option<Company>, DomainError> {
        let row: Option<CompanyRow> =
            sqlx::query_as("SELECT id, name, tax_id, industry, active FROM companies WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Company::from))
    }

    async fn find_department(&self, id: DepartmentId) -> Result<Option<Department>, DomainError> {
        let row: Option<(i64, i64, String)> =
            sqlx::query_as("SELECT id, company_id, name FROM departments WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, company_id, name)| Department {
            id: DepartmentId::new(id),
            company_id: CompanyId::new(company_id),
            name,
        }))
    }

    async fn find_employee(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        let row: Option<EmployeeRow> = sqlx::query_as(
            r#"
            SELECT id, company_id, department_id, first_name, last_name, external_id, email, title
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Employee::from))
    }

    async fn find_pillar(&self, id: PillarId) -> Result<Option<Pillar>, DomainError> {
        let row: Option<PillarRow> =
            sqlx::query_as("SELECT id, company_id, name, description, weight FROM pillars WHERE id = $1")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Pillar::from))
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, DomainError> {
        let row: Option<QuestionRow> =
            sqlx::query_as(&format!("SELECT {} FROM questions q WHERE q.id = $1", QUESTION_COLUMNS))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Question::try_from).transpose()
    }

    async fn questions_visible_to(&self, company_id: CompanyId) -> Result<Vec<Question>, DomainError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM questions q
            JOIN pillars p ON p.id = q.pillar_id
            WHERE p.company_id IS NULL OR p.company_id = $1
            ORDER BY q.pillar_id, q.id
            "#,
            QUESTION_COLUMNS
        ))
        .bind(company_id.get())
        .fetch_all(&self.pool)
        .await?;
        questions(rows)
    }

    async fn questionnaire_pillars(
        &self,
        questionnaire_id: QuestionnaireId,
        company_id: CompanyId,
    ) -> Result<Vec<Pillar>, DomainError> {
        let rows: Vec<PillarRow> = sqlx::query_as(
            r#"
            SELECT DISTINCT p.id, p.company_id, p.name, p.description, p.weight
            FROM questionnaire_questions qq
            JOIN questions q ON q.id = qq.question_id
            JOIN pillars p ON p.id = q.pillar_id
            WHERE qq.questionnaire_id = $1
              AND (p.company_id IS NULL OR p.company_id = $2)
            ORDER BY p.id
            "#,
        )
        .bind(questionnaire_id.get())
        .bind(company_id.get())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Pillar::from).collect())
    }

    async fn questionnaire_questions_of_pillar(
        &self,
        questionnaire_id: QuestionnaireId,
        pillar_id: PillarId,
    ) -> Result<Vec<Question>, DomainError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM questionnaire_questions qq
            JOIN questions q ON q.id = qq.question_id
            WHERE qq.questionnaire_id = $1 AND q.pillar_id = $2
            ORDER BY q.id
            "#,
            QUESTION_COLUMNS
        ))
        .bind(questionnaire_id.get())
        .bind(pillar_id.get())
        .fetch_all(&self.pool)
        .await?;
        questions(rows)
    }
}
