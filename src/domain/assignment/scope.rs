//! Assignment scope and who may answer against it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::AssignmentError;
use crate::domain::foundation::{DepartmentId, EmployeeId, ValidationError};

/// Wire form of an assignment scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    Company,
    Department,
    Employee,
}

impl ScopeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::Company => "COMPANY",
            ScopeType::Department => "DEPARTMENT",
            ScopeType::Employee => "EMPLOYEE",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPANY" => Ok(ScopeType::Company),
            "DEPARTMENT" => Ok(ScopeType::Department),
            "EMPLOYEE" => Ok(ScopeType::Employee),
            other => Err(ValidationError::invalid_format(
                "scope_type",
                format!("unknown scope type '{}'", other),
            )),
        }
    }
}

/// Breadth of an assignment. The scope id lives inside the variant, so a
/// company-wide assignment cannot carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentScope {
    Company,
    Department(DepartmentId),
    Employee(EmployeeId),
}

impl AssignmentScope {
    /// Builds a scope from its stored columns.
    pub fn from_parts(scope_type: ScopeType, scope_id: Option<i64>) -> Result<Self, AssignmentError> {
        match (scope_type, scope_id) {
            (ScopeType::Company, None) => Ok(AssignmentScope::Company),
            (ScopeType::Company, Some(_)) => Err(AssignmentError::validation(
                "COMPANY scope must not carry a scope_id",
            )),
            (ScopeType::Department, Some(id)) => Ok(AssignmentScope::Department(DepartmentId::new(id))),
            (ScopeType::Employee, Some(id)) => Ok(AssignmentScope::Employee(EmployeeId::new(id))),
            (other, None) => Err(AssignmentError::validation(format!(
                "{} scope requires a scope_id",
                other
            ))),
        }
    }

    pub fn scope_type(&self) -> ScopeType {
        match self {
            AssignmentScope::Company => ScopeType::Company,
            AssignmentScope::Department(_) => ScopeType::Department,
            AssignmentScope::Employee(_) => ScopeType::Employee,
        }
    }

    pub fn scope_id(&self) -> Option<i64> {
        match self {
            AssignmentScope::Company => None,
            AssignmentScope::Department(id) => Some(id.get()),
            AssignmentScope::Employee(id) => Some(id.get()),
        }
    }

    /// Department targeted by a department-scoped assignment.
    pub fn department_id(&self) -> Option<DepartmentId> {
        match self {
            AssignmentScope::Department(id) => Some(*id),
            _ => None,
        }
    }
}

impl Serialize for AssignmentScope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("AssignmentScope", 2)?;
        state.serialize_field("scope_type", &self.scope_type())?;
        state.serialize_field("scope_id", &self.scope_id())?;
        state.end()
    }
}

/// Which responses of an assignment belong to the current respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondentFilter {
    /// Anonymous assignment: only rows without an employee.
    AnonymousOnly,
    Employee(EmployeeId),
    /// Non-anonymous assignment queried without an employee: matches nothing.
    Nobody,
}

impl RespondentFilter {
    /// Resolves the filter for an assignment's anonymity and an optional employee.
    ///
    /// The employee is ignored for anonymous assignments.
    pub fn resolve(anonymous: bool, employee_id: Option<EmployeeId>) -> Self {
        match (anonymous, employee_id) {
            (true, _) => RespondentFilter::AnonymousOnly,
            (false, Some(id)) => RespondentFilter::Employee(id),
            (false, None) => RespondentFilter::Nobody,
        }
    }

    pub fn matches(&self, employee_id: Option<EmployeeId>) -> bool {
        match self {
            RespondentFilter::AnonymousOnly => employee_id.is_none(),
            RespondentFilter::Employee(id) => employee_id == Some(*id),
            RespondentFilter::Nobody => false,
        }
    }

    /// Employee key stored on responses written under this filter.
    pub fn employee_id(&self) -> Option<EmployeeId> {
        match self {
            RespondentFilter::Employee(id) => Some(*id),
            _ => None,
        }
    }
}
