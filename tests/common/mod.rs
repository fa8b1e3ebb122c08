//! Seeded in-memory world shared by the integration tests.
//!
//! Acme (1) has departments 10 and 11, employees 100 and 101, and owns
//! pillar 2. Globex (2) has employee 200. Pillar 1 is global.

#![allow(dead_code)]

use std::sync::Arc;

use tacticsphere::adapters::InMemorySurveyStore;
use tacticsphere::domain::catalog::{Company, Department, Employee, Pillar, Question, QuestionType};
use tacticsphere::domain::foundation::{
    CallerIdentity, CompanyId, DepartmentId, EmployeeId, PillarId, QuestionId, Role, UserId,
};

pub const ACME: CompanyId = CompanyId::new(1);
pub const GLOBEX: CompanyId = CompanyId::new(2);
pub const ENGINEERING: DepartmentId = DepartmentId::new(10);
pub const SALES: DepartmentId = DepartmentId::new(11);
pub const ANA: EmployeeId = EmployeeId::new(100);
pub const LUIS: EmployeeId = EmployeeId::new(101);
pub const OMAR: EmployeeId = EmployeeId::new(200);
pub const INFRA: PillarId = PillarId::new(1);
pub const PROCESSES: PillarId = PillarId::new(2);

pub fn system_admin() -> CallerIdentity {
    CallerIdentity::new(UserId::new(1), Role::SystemAdmin, None)
}

pub fn analyst() -> CallerIdentity {
    CallerIdentity::new(UserId::new(2), Role::Analyst, None)
}

pub fn member_of(company: CompanyId) -> CallerIdentity {
    CallerIdentity::new(UserId::new(3), Role::User, Some(company))
}

fn employee(id: EmployeeId, company: CompanyId, department: Option<DepartmentId>, name: &str) -> Employee {
    Employee {
        id,
        company_id: company,
        department_id: department,
        first_name: name.to_string(),
        last_name: None,
        external_id: None,
        email: None,
        title: None,
    }
}

fn question(id: i64, pillar: PillarId, question_type: QuestionType) -> Question {
    Question {
        id: QuestionId::new(id),
        pillar_id: pillar,
        statement: format!("Statement {}", id),
        question_type,
        required: true,
        weight: 1,
        expected_answer: Some(format!("Expected {}", id)),
    }
}

pub async fn seeded_store() -> Arc<InMemorySurveyStore> {
    let store = Arc::new(InMemorySurveyStore::new());
    for (id, name) in [(ACME, "Acme"), (GLOBEX, "Globex")] {
        store
            .add_company(Company {
                id,
                name: name.to_string(),
                tax_id: None,
                industry: None,
                active: true,
            })
            .await;
    }
    for (id, name) in [(ENGINEERING, "Engineering"), (SALES, "Sales")] {
        store
            .add_department(Department {
                id,
                company_id: ACME,
                name: name.to_string(),
            })
            .await;
    }
    store.add_employee(employee(ANA, ACME, Some(ENGINEERING), "Ana")).await;
    store.add_employee(employee(LUIS, ACME, Some(SALES), "Luis")).await;
    store.add_employee(employee(OMAR, GLOBEX, None, "Omar")).await;

    for (id, company, name) in [(INFRA, None, "Infrastructure"), (PROCESSES, Some(ACME), "Processes")] {
        store
            .add_pillar(Pillar {
                id,
                company_id: company,
                name: name.to_string(),
                description: None,
                weight: 1,
            })
            .await;
    }
    store.add_question(question(11, INFRA, QuestionType::Likert)).await;
    store.add_question(question(12, INFRA, QuestionType::Likert)).await;
    store.add_question(question(21, PROCESSES, QuestionType::YesNo)).await;
    store.add_question(question(22, PROCESSES, QuestionType::OpenText)).await;

    store
}
