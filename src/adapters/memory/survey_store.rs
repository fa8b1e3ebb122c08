//! In-memory survey store.
//!
//! One `tokio::sync::RwLock` guards every table, so each port call sees a
//! consistent snapshot. The unique response key is enforced on insert the
//! same way the PostgreSQL constraint does.
//!
//! Used by tests and local development. Nothing is persisted.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::analytics::{
    AnalyticsFilters, AnalyticsQuery, AnalyticsRow, AnalyticsSnapshot, RespondentRef,
    UniverseEmployee,
};
use crate::domain::assignment::{
    Assignment, NewAssignment, NewResponse, RespondentFilter, ResponseKey,
    SurveyResponse,
};
use crate::domain::audit::{AuditEntry, AuditRecord};
use crate::domain::catalog::{
    Company, Department, Employee, Pillar, Question, QuestionSetChanges, QuestionType,
    Questionnaire, QuestionnaireQuestion,
};
use crate::domain::export::ResponseExportRow;
use crate::domain::foundation::{
    AnalyticsScope, AssignmentId, CompanyId, DepartmentId, DomainError, EmployeeId, ErrorCode,
    PillarId, QuestionId, QuestionnaireId, ResponseId,
};
use crate::domain::progress::{AnswerRow, PillarQuestionCount};
use crate::ports::{
    AnalyticsReader, AssignmentRepository, AuditLogger, AuditReader, CatalogReader,
    NewQuestionnaire, ProgressReader, QuestionnaireRepository, ResponseRepository,
};

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<CompanyId, Company>,
    departments: BTreeMap<DepartmentId, Department>,
    employees: BTreeMap<EmployeeId, Employee>,
    pillars: BTreeMap<PillarId, Pillar>,
    questions: BTreeMap<QuestionId, Question>,
    questionnaires: BTreeMap<QuestionnaireId, Questionnaire>,
    links: Vec<QuestionnaireQuestion>,
    assignments: BTreeMap<AssignmentId, Assignment>,
    responses: BTreeMap<ResponseId, SurveyResponse>,
    audit: Vec<AuditRecord>,
    next_questionnaire: i64,
    next_assignment: i64,
    next_response: i64,
    next_audit: i64,
}

fn bump(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl Tables {
    /// Question ids attached to a questionnaire, restricted to pillars the
    /// company may see.
    fn visible_questionnaire_questions(
        &self,
        questionnaire_id: QuestionnaireId,
        company_id: CompanyId,
    ) -> Vec<&Question> {
        let attached: BTreeSet<QuestionId> = self
            .links
            .iter()
            .filter(|l| l.questionnaire_id == questionnaire_id)
            .map(|l| l.question_id)
            .collect();
        attached
            .iter()
            .filter_map(|id| self.questions.get(id))
            .filter(|q| {
                self.pillars
                    .get(&q.pillar_id)
                    .map_or(false, |p| p.is_visible_to(company_id))
            })
            .collect()
    }

    fn in_scope(&self, scope: AnalyticsScope, company_id: CompanyId) -> bool {
        scope.company_id().map_or(true, |id| id == company_id)
    }

    fn employee_ref(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.get(&id)
    }

    /// Response joined to question, pillar and assignment, when it passes
    /// the company restriction and every filter.
    fn joined<'a>(
        &'a self,
        response: &'a SurveyResponse,
        scope: AnalyticsScope,
        filters: &AnalyticsFilters,
    ) -> Option<(&'a Question, &'a Pillar, &'a Assignment)> {
        let assignment = self.assignments.get(&response.key.assignment_id)?;
        if !self.in_scope(scope, assignment.company_id) {
            return None;
        }
        let question = self.questions.get(&response.key.question_id)?;
        let pillar = self.pillars.get(&question.pillar_id)?;
        if !filters.matches_submitted(response.submitted_at) || !filters.matches_pillar(pillar.id) {
            return None;
        }
        let employee = response
            .key
            .employee_id
            .and_then(|id| self.employee_ref(id))
            .map(|e| (e.id, e.department_id));
        if !filters.matches_respondent(employee, &assignment.scope) {
            return None;
        }
        Some((question, pillar, assignment))
    }
}

/// In-memory implementation of every storage port.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Seeding ===

    pub async fn add_company(&self, company: Company) {
        self.tables.write().await.companies.insert(company.id, company);
    }

    pub async fn add_department(&self, department: Department) {
        self.tables
            .write()
            .await
            .departments
            .insert(department.id, department);
    }

    pub async fn add_employee(&self, employee: Employee) {
        self.tables.write().await.employees.insert(employee.id, employee);
    }

    pub async fn add_pillar(&self, pillar: Pillar) {
        self.tables.write().await.pillars.insert(pillar.id, pillar);
    }

    pub async fn add_question(&self, question: Question) {
        self.tables.write().await.questions.insert(question.id, question);
    }

    // === Inspection ===

    pub async fn response_count(&self) -> usize {
        self.tables.read().await.responses.len()
    }

    pub async fn responses(&self) -> Vec<SurveyResponse> {
        self.tables.read().await.responses.values().cloned().collect()
    }

    pub async fn assignment_count(&self) -> usize {
        self.tables.read().await.assignments.len()
    }

    pub async fn audit_entries(&self) -> Vec<AuditRecord> {
        self.tables.read().await.audit.clone()
    }
}

#[async_trait]
impl AssignmentRepository for InMemorySurveyStore {
    async fn find_by_id(&self, id: AssignmentId) -> Result<Option<Assignment>, DomainError> {
        Ok(self.tables.read().await.assignments.get(&id).cloned())
    }

    async fn find_active_company_wide(
        &self,
        company_id: CompanyId,
        at: DateTime<Utc>,
    ) -> Result<Option<Assignment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .values()
            .filter(|a| a.company_id == company_id && a.is_company_wide() && a.is_active(at))
            .max_by_key(|a| (a.window.starts_at(), a.id))
            .cloned())
    }

    async fn insert(&self, assignment: &NewAssignment) -> Result<Assignment, DomainError> {
        let mut tables = self.tables.write().await;
        let id = AssignmentId::new(bump(&mut tables.next_assignment));
        let stored = assignment.clone().with_id(id);
        tables.assignments.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        match tables.assignments.get_mut(&assignment.id) {
            Some(existing) => {
                *existing = assignment.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::AssignmentNotFound,
                format!("Assignment not found: {}", assignment.id),
            )),
        }
    }
}

#[async_trait]
impl QuestionnaireRepository for InMemorySurveyStore {
    async fn find_by_id(&self, id: QuestionnaireId) -> Result<Option<Questionnaire>, DomainError> {
        Ok(self.tables.read().await.questionnaires.get(&id).cloned())
    }

    async fn latest_published(&self, company_id: CompanyId) -> Result<Option<Questionnaire>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questionnaires
            .values()
            .filter(|q| q.company_id == company_id && q.is_published())
            .max_by_key(|q| q.recency_key())
            .cloned())
    }

    async fn list(&self, company_id: Option<CompanyId>) -> Result<Vec<Questionnaire>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .questionnaires
            .values()
            .filter(|q| company_id.map_or(true, |id| q.company_id == id))
            .cloned()
            .collect())
    }

    async fn create(&self, questionnaire: &NewQuestionnaire) -> Result<Questionnaire, DomainError> {
        let mut tables = self.tables.write().await;
        let id = QuestionnaireId::new(bump(&mut tables.next_questionnaire));
        let stored = Questionnaire {
            id,
            company_id: questionnaire.company_id,
            title: questionnaire.title.clone(),
            version: questionnaire.version,
            status: questionnaire.status,
        };
        tables.questionnaires.insert(id, stored.clone());
        Ok(stored)
    }

    async fn question_links(&self, id: QuestionnaireId) -> Result<Vec<QuestionnaireQuestion>, DomainError> {
        let tables = self.tables.read().await;
        let mut links: Vec<QuestionnaireQuestion> = tables
            .links
            .iter()
            .filter(|l| l.questionnaire_id == id)
            .copied()
            .collect();
        links.sort_by_key(|l| (l.position, l.question_id));
        Ok(links)
    }

    async fn apply_question_changes(
        &self,
        id: QuestionnaireId,
        changes: &QuestionSetChanges,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables
            .links
            .retain(|l| l.questionnaire_id != id || !changes.removed.contains(&l.question_id));
        for link in &changes.added {
            let duplicate = tables
                .links
                .iter()
                .any(|l| l.questionnaire_id == id && l.question_id == link.question_id);
            if duplicate {
                return Err(DomainError::unique_violation(format!(
                    "Question {} already attached to questionnaire {}",
                    link.question_id, id
                )));
            }
            tables.links.push(QuestionnaireQuestion {
                questionnaire_id: id,
                ..*link
            });
        }
        Ok(())
    }

    async fn contains_question(
        &self,
        id: QuestionnaireId,
        question_id: QuestionId,
    ) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .links
            .iter()
            .any(|l| l.questionnaire_id == id && l.question_id == question_id))
    }
}

#[async_trait]
impl CatalogReader for InMemorySurveyStore {
    async fn find_company(&self, id: CompanyId) -> Result<Option<Company>, DomainError> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn find_department(&self, id: DepartmentId) -> Result<Option<Department>, DomainError> {
        Ok(self.tables.read().await.departments.get(&id).cloned())
    }

    async fn find_employee(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        Ok(self.tables.read().await.employees.get(&id).cloned())
    }

    async fn find_pillar(&self, id: PillarId) -> Result<Option<Pillar>, DomainError> {
        Ok(self.tables.read().await.pillars.get(&id).cloned())
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, DomainError> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn questions_visible_to(&self, company_id: CompanyId) -> Result<Vec<Question>, DomainError> {
        let tables = self.tables.read().await;
        let mut questions: Vec<Question> = tables
            .questions
            .values()
            .filter(|q| {
                tables
                    .pillars
                    .get(&q.pillar_id)
                    .map_or(false, |p| p.is_visible_to(company_id))
            })
            .cloned()
            .collect();
        questions.sort_by_key(|q| (q.pillar_id, q.id));
        Ok(questions)
    }

    async fn questionnaire_pillars(
        &self,
        questionnaire_id: QuestionnaireId,
        company_id: CompanyId,
    ) -> Result<Vec<Pillar>, DomainError> {
        let tables = self.tables.read().await;
        let pillar_ids: BTreeSet<PillarId> = tables
            .visible_questionnaire_questions(questionnaire_id, company_id)
            .iter()
            .map(|q| q.pillar_id)
            .collect();
        Ok(pillar_ids
            .iter()
            .filter_map(|id| tables.pillars.get(id).cloned())
            .collect())
    }

    async fn questionnaire_questions_of_pillar(
        &self,
        questionnaire_id: QuestionnaireId,
        pillar_id: PillarId,
    ) -> Result<Vec<Question>, DomainError> {
        let tables = self.tables.read().await;
        let attached: BTreeSet<QuestionId> = tables
            .links
            .iter()
            .filter(|l| l.questionnaire_id == questionnaire_id)
            .map(|l| l.question_id)
            .collect();
        Ok(attached
            .iter()
            .filter_map(|id| tables.questions.get(id))
            .filter(|q| q.pillar_id == pillar_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ResponseRepository for InMemorySurveyStore {
    async fn find_by_key(&self, key: &ResponseKey) -> Result<Option<SurveyResponse>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.responses.values().find(|r| r.key == *key).cloned())
    }

    async fn insert(&self, response: &NewResponse) -> Result<SurveyResponse, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.responses.values().any(|r| r.key == response.key) {
            return Err(DomainError::unique_violation(format!(
                "Response already exists for assignment {} question {}",
                response.key.assignment_id, response.key.question_id
            )));
        }
        let id = ResponseId::new(bump(&mut tables.next_response));
        let stored = SurveyResponse {
            id,
            key: response.key,
            value: response.value.clone(),
            submitted_at: response.submitted_at,
        };
        tables.responses.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_value(
        &self,
        id: ResponseId,
        value: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let response = tables
            .responses
            .get_mut(&id)
            .ok_or_else(|| DomainError::new(ErrorCode::NotFound, format!("Response not found: {}", id)))?;
        response.value = value.to_string();
        response.submitted_at = submitted_at;
        Ok(())
    }

    async fn list_for_questions(
        &self,
        assignment_id: AssignmentId,
        question_ids: &[QuestionId],
        filter: RespondentFilter,
    ) -> Result<Vec<SurveyResponse>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .responses
            .values()
            .filter(|r| {
                r.key.assignment_id == assignment_id
                    && question_ids.contains(&r.key.question_id)
                    && filter.matches(r.key.employee_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProgressReader for InMemorySurveyStore {
    async fn pillar_question_counts(
        &self,
        assignment: &Assignment,
    ) -> Result<Vec<PillarQuestionCount>, DomainError> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<PillarId, u32> = BTreeMap::new();
        for question in
            tables.visible_questionnaire_questions(assignment.questionnaire_id, assignment.company_id)
        {
            *counts.entry(question.pillar_id).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .filter_map(|(pillar_id, total)| {
                tables.pillars.get(&pillar_id).map(|p| PillarQuestionCount {
                    pillar_id,
                    pillar_name: p.name.clone(),
                    total,
                })
            })
            .collect())
    }

    async fn answer_rows(
        &self,
        assignment: &Assignment,
        filter: RespondentFilter,
    ) -> Result<Vec<AnswerRow>, DomainError> {
        let tables = self.tables.read().await;
        let questions: HashMap<QuestionId, &Question> = tables
            .visible_questionnaire_questions(assignment.questionnaire_id, assignment.company_id)
            .into_iter()
            .map(|q| (q.id, q))
            .collect();
        Ok(tables
            .responses
            .values()
            .filter(|r| r.key.assignment_id == assignment.id && filter.matches(r.key.employee_id))
            .filter_map(|r| {
                questions.get(&r.key.question_id).map(|q| AnswerRow {
                    pillar_id: q.pillar_id,
                    question_type: q.question_type,
                    value: Some(r.value.clone()),
                })
            })
            .collect())
    }
}

#[async_trait]
impl AnalyticsReader for InMemorySurveyStore {
    async fn load_snapshot(&self, query: &AnalyticsQuery) -> Result<AnalyticsSnapshot, DomainError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&SurveyResponse> = tables
            .responses
            .values()
            .filter(|r| {
                tables
                    .joined(r, query.scope, &query.filters)
                    .map_or(false, |(q, _, _)| q.question_type == QuestionType::Likert)
            })
            .collect();
        matching.sort_by_key(|r| (r.submitted_at, r.id));

        let rows = matching
            .into_iter()
            .filter_map(|r| {
                let (question, pillar, assignment) = tables.joined(r, query.scope, &query.filters)?;
                let respondent = r.key.employee_id.and_then(|id| tables.employee_ref(id)).map(|e| {
                    RespondentRef {
                        id: e.id,
                        name: e.full_name(),
                        department_id: e.department_id,
                    }
                });
                Some(AnalyticsRow {
                    response_id: r.id,
                    submitted_at: r.submitted_at,
                    value: r.value.clone(),
                    question_weight: question.weight,
                    pillar_id: pillar.id,
                    pillar_name: pillar.name.clone(),
                    pillar_weight: pillar.weight,
                    assignment_scope: assignment.scope,
                    respondent,
                })
            })
            .collect();

        let department_names = tables
            .departments
            .values()
            .filter(|d| tables.in_scope(query.scope, d.company_id))
            .map(|d| (d.id, d.name.clone()))
            .collect();

        let employees = tables
            .employees
            .values()
            .filter(|e| tables.in_scope(query.scope, e.company_id))
            .map(|e| UniverseEmployee {
                id: e.id,
                department_id: e.department_id,
            })
            .collect();

        Ok(AnalyticsSnapshot {
            rows,
            department_names,
            employees,
        })
    }

    async fn export_rows(
        &self,
        company_id: CompanyId,
        filters: &AnalyticsFilters,
    ) -> Result<Vec<ResponseExportRow>, DomainError> {
        let tables = self.tables.read().await;
        let scope = AnalyticsScope::SingleCompany(company_id);

        let mut rows: Vec<ResponseExportRow> = tables
            .responses
            .values()
            .filter_map(|r| {
                let (question, pillar, assignment) = tables.joined(r, scope, filters)?;
                let employee = r.key.employee_id.and_then(|id| tables.employee_ref(id));
                let department_name = employee
                    .and_then(|e| e.department_id)
                    .and_then(|id| tables.departments.get(&id))
                    .map(|d| d.name.clone());
                Some(ResponseExportRow {
                    response_id: r.id,
                    submitted_at: r.submitted_at,
                    assignment_id: assignment.id,
                    scope_type: assignment.scope.scope_type(),
                    scope_id: assignment.scope.scope_id(),
                    question_id: question.id,
                    question_statement: question.statement.clone(),
                    expected_answer: question.expected_answer.clone(),
                    pillar_id: pillar.id,
                    pillar_name: pillar.name.clone(),
                    employee_id: r.key.employee_id,
                    employee_name: employee.map(Employee::full_name),
                    department_name,
                    value: r.value.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then(b.response_id.cmp(&a.response_id))
        });
        Ok(rows)
    }
}

#[async_trait]
impl AuditLogger for InMemorySurveyStore {
    async fn record(&self, entry: AuditEntry) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let id = bump(&mut tables.next_audit);
        tables.audit.push(AuditRecord { id, entry });
        Ok(())
    }
}

#[async_trait]
impl AuditReader for InMemorySurveyStore {
    async fn list_recent(
        &self,
        company_id: Option<CompanyId>,
        limit: u32,
    ) -> Result<Vec<AuditRecord>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .audit
            .iter()
            .rev()
            .filter(|r| company_id.map_or(true, |id| r.entry.company_id == Some(id)))
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
