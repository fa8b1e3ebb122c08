//! Read-only access to catalog records (CQRS query side).

use async_trait::async_trait;

use crate::domain::catalog::{Company, Department, Employee, Pillar, Question};
use crate::domain::foundation::{
    CompanyId, DepartmentId, DomainError, EmployeeId, PillarId, QuestionId, QuestionnaireId,
};

#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn find_company(&self, id: CompanyId) -> Result<Option<Company>, DomainError>;

    async fn find_department(&self, id: DepartmentId) -> Result<Option<Department>, DomainError>;

    async fn find_employee(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError>;

    async fn find_pillar(&self, id: PillarId) -> Result<Option<Pillar>, DomainError>;

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, DomainError>;

    /// Questions under the company's own pillars and every global pillar,
    /// ordered by pillar id then question id.
    async fn questions_visible_to(&self, company_id: CompanyId) -> Result<Vec<Question>, DomainError>;

    /// Pillars with at least one question attached to the questionnaire,
    /// restricted to the company's and global pillars, ordered by id.
    async fn questionnaire_pillars(
        &self,
        questionnaire_id: QuestionnaireId,
        company_id: CompanyId,
    ) -> Result<Vec<Pillar>, DomainError>;

    /// Questions of one pillar attached to the questionnaire, ordered by id.
    async fn questionnaire_questions_of_pillar(
        &self,
        questionnaire_id: QuestionnaireId,
        pillar_id: PillarId,
    ) -> Result<Vec<Question>, DomainError>;
}
