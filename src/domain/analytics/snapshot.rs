//! Input rows of one aggregation call.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::assignment::AssignmentScope;
use crate::domain::foundation::{DepartmentId, EmployeeId, PillarId, ResponseId};

/// Department bucket of a response or employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepartmentKey {
    Department(DepartmentId),
    /// Employee without a department.
    NoDepartment,
}

impl DepartmentKey {
    pub fn from_employee(department_id: Option<DepartmentId>) -> Self {
        department_id.map_or(DepartmentKey::NoDepartment, DepartmentKey::Department)
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        match self {
            DepartmentKey::Department(id) => Some(*id),
            DepartmentKey::NoDepartment => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondentRef {
    pub id: EmployeeId,
    pub name: String,
    pub department_id: Option<DepartmentId>,
}

/// One Likert response joined to its question, pillar and assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsRow {
    pub response_id: ResponseId,
    pub submitted_at: DateTime<Utc>,
    pub value: String,
    pub question_weight: i32,
    pub pillar_id: PillarId,
    pub pillar_name: String,
    pub pillar_weight: i32,
    pub assignment_scope: AssignmentScope,
    /// `None` for anonymous responses.
    pub respondent: Option<RespondentRef>,
}

impl AnalyticsRow {
    /// Department the response is attributed to, if any.
    ///
    /// Identified respondents use their own department. Anonymous rows
    /// fall back to the department of a department-scoped assignment.
    pub fn department_key(&self) -> Option<DepartmentKey> {
        match &self.respondent {
            Some(r) => Some(DepartmentKey::from_employee(r.department_id)),
            None => self.assignment_scope.department_id().map(DepartmentKey::Department),
        }
    }
}

/// An employee in the eligible universe of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseEmployee {
    pub id: EmployeeId,
    pub department_id: Option<DepartmentId>,
}

/// Everything the aggregator needs, fetched up front.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsSnapshot {
    /// Filtered Likert responses.
    pub rows: Vec<AnalyticsRow>,
    pub department_names: HashMap<DepartmentId, String>,
    /// Employees of the scope, ordered by id, before the department filter.
    pub employees: Vec<UniverseEmployee>,
}
