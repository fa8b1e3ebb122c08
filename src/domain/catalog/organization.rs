//! Tenant organization records: companies, departments, employees.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CompanyId, DepartmentId, EmployeeId};

/// A tenant company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub tax_id: Option<String>,
    pub industry: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub company_id: CompanyId,
    pub name: String,
}

/// A survey respondent.
///
/// Employees are referenced by responses, never owned by them. Removing a
/// department clears `department_id` rather than deleting the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub company_id: CompanyId,
    pub department_id: Option<DepartmentId>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub external_id: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
}

impl Employee {
    /// First and last name joined, skipping a missing or blank surname.
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

/// Joins a first name and an optional surname.
pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(last) => format!("{} {}", first_name.trim(), last),
        None => first_name.trim().to_string(),
    }
}
