//! Seeded in-memory world shared by handler tests.
//!
//! Company 1 (Acme) owns departments 10 and 11, employees 100-102 and
//! pillar 2. Company 2 (Globex) owns department 20, employee 200 and
//! pillar 3. Pillar 1 is global.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::adapters::memory::InMemorySurveyStore;
use crate::domain::assignment::{Assignment, AssignmentScope, NewAssignment, ValidityWindow};
use crate::domain::catalog::{
    plan_question_set, Company, Department, Employee, Pillar, Question, QuestionType,
    Questionnaire, QuestionnaireStatus,
};
use crate::domain::foundation::{
    CallerIdentity, CompanyId, DepartmentId, EmployeeId, PillarId, QuestionId, Role, UserId,
};
use crate::ports::{AssignmentRepository, NewQuestionnaire, QuestionnaireRepository};

pub const ACME: CompanyId = CompanyId::new(1);
pub const GLOBEX: CompanyId = CompanyId::new(2);
pub const ENGINEERING: DepartmentId = DepartmentId::new(10);
pub const SALES: DepartmentId = DepartmentId::new(11);
pub const OPS: DepartmentId = DepartmentId::new(20);
pub const ANA: EmployeeId = EmployeeId::new(100);
pub const LUIS: EmployeeId = EmployeeId::new(101);
pub const MARTA: EmployeeId = EmployeeId::new(102);
pub const OMAR: EmployeeId = EmployeeId::new(200);
pub const INFRA: PillarId = PillarId::new(1);
pub const PROCESSES: PillarId = PillarId::new(2);
pub const SECURITY: PillarId = PillarId::new(3);

pub fn admin() -> CallerIdentity {
    CallerIdentity::new(UserId::new(1), Role::Admin, None)
}

pub fn system_admin() -> CallerIdentity {
    CallerIdentity::new(UserId::new(2), Role::SystemAdmin, None)
}

pub fn member_of(company: CompanyId) -> CallerIdentity {
    CallerIdentity::new(UserId::new(3), Role::User, Some(company))
}

fn question(
    id: i64,
    pillar: PillarId,
    question_type: QuestionType,
    expected: Option<&str>,
) -> Question {
    Question {
        id: QuestionId::new(id),
        pillar_id: pillar,
        statement: format!("Statement {}", id),
        question_type,
        required: true,
        weight: 1,
        expected_answer: expected.map(str::to_string),
    }
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

/// Store seeded with both companies and their catalog.
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
    for (id, company, name) in [
        (ENGINEERING, ACME, "Engineering"),
        (SALES, ACME, "Sales"),
        (OPS, GLOBEX, "Ops"),
    ] {
        store
            .add_department(Department {
                id,
                company_id: company,
                name: name.to_string(),
            })
            .await;
    }
    store.add_employee(employee(ANA, ACME, Some(ENGINEERING), "Ana")).await;
    store.add_employee(employee(LUIS, ACME, Some(SALES), "Luis")).await;
    store.add_employee(employee(MARTA, ACME, None, "Marta")).await;
    store.add_employee(employee(OMAR, GLOBEX, Some(OPS), "Omar")).await;

    for (id, company, name, weight) in [
        (INFRA, None, "Infrastructure", 1),
        (PROCESSES, Some(ACME), "Processes", 2),
        (SECURITY, Some(GLOBEX), "Security", 1),
    ] {
        store
            .add_pillar(Pillar {
                id,
                company_id: company,
                name: name.to_string(),
                description: None,
                weight,
            })
            .await;
    }

    store
        .add_question(question(11, INFRA, QuestionType::Likert, Some("Runbooks exist")))
        .await;
    store.add_question(question(12, INFRA, QuestionType::Likert, None)).await;
    store.add_question(question(21, PROCESSES, QuestionType::YesNo, None)).await;
    store.add_question(question(22, PROCESSES, QuestionType::OpenText, None)).await;
    store.add_question(question(31, SECURITY, QuestionType::Likert, None)).await;

    store
}

/// Creates a published questionnaire for `company` holding `questions`.
pub async fn publish_questionnaire(
    store: &InMemorySurveyStore,
    company: CompanyId,
    questions: &[i64],
) -> Questionnaire {
    let questionnaire = store
        .create(&NewQuestionnaire {
            company_id: company,
            title: "Baseline".to_string(),
            version: 1,
            status: QuestionnaireStatus::Published,
        })
        .await
        .unwrap();
    let desired: Vec<QuestionId> = questions.iter().copied().map(QuestionId::new).collect();
    let changes = plan_question_set(questionnaire.id, &[], &desired, false);
    store
        .apply_question_changes(questionnaire.id, &changes)
        .await
        .unwrap();
    questionnaire
}

/// Company-wide assignment open from yesterday to tomorrow.
pub async fn open_assignment(
    store: &InMemorySurveyStore,
    questionnaire: &Questionnaire,
    anonymous: bool,
) -> Assignment {
    let now = Utc::now();
    window_assignment(store, questionnaire, anonymous, now - Duration::days(1), now + Duration::days(1)).await
}

pub async fn window_assignment(
    store: &InMemorySurveyStore,
    questionnaire: &Questionnaire,
    anonymous: bool,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Assignment {
    AssignmentRepository::insert(
        store,
        &NewAssignment {
            company_id: questionnaire.company_id,
            questionnaire_id: questionnaire.id,
            scope: AssignmentScope::Company,
            window: ValidityWindow::new(starts_at, ends_at).unwrap(),
            anonymous,
        },
    )
    .await
    .unwrap()
}
