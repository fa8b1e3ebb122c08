//! Analytics query and filter semantics.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::assignment::AssignmentScope;
use crate::domain::foundation::{
    AccessError, AnalyticsScope, DepartmentId, DomainError, EmployeeId, ErrorCode, PillarId,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AnalyticsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalyticsError::InvalidFilter(_) => ErrorCode::ValidationFailed,
            AnalyticsError::Forbidden(_) => ErrorCode::Forbidden,
            AnalyticsError::Database(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for AnalyticsError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => AnalyticsError::InvalidFilter(err.message),
            ErrorCode::Forbidden => AnalyticsError::Forbidden(err.message),
            _ => AnalyticsError::Database(err.to_string()),
        }
    }
}

impl From<AccessError> for AnalyticsError {
    fn from(err: AccessError) -> Self {
        AnalyticsError::Forbidden(err.to_string())
    }
}

/// Optional restrictions on which responses are aggregated or exported.
///
/// Empty id lists mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsFilters {
    pub date_from: Option<NaiveDate>,
    /// Inclusive day.
    pub date_to: Option<NaiveDate>,
    pub department_ids: Vec<DepartmentId>,
    pub employee_ids: Vec<EmployeeId>,
    pub pillar_ids: Vec<PillarId>,
}

impl AnalyticsFilters {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(AnalyticsError::InvalidFilter(format!(
                    "date_from {} is after date_to {}",
                    from, to
                )));
            }
        }
        Ok(())
    }

    /// Inclusive lower bound on submission time.
    pub fn submitted_from(&self) -> Option<DateTime<Utc>> {
        self.date_from.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound: midnight after `date_to`.
    pub fn submitted_before(&self) -> Option<DateTime<Utc>> {
        self.date_to
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn matches_submitted(&self, at: DateTime<Utc>) -> bool {
        self.submitted_from().map_or(true, |from| at >= from)
            && self.submitted_before().map_or(true, |before| at < before)
    }

    pub fn matches_pillar(&self, pillar_id: PillarId) -> bool {
        self.pillar_ids.is_empty() || self.pillar_ids.contains(&pillar_id)
    }

    /// Respondent restriction of a response.
    ///
    /// The employee filter wins over the department filter. The
    /// department filter also admits responses of department-scoped
    /// assignments, which may carry no employee.
    pub fn matches_respondent(
        &self,
        employee: Option<(EmployeeId, Option<DepartmentId>)>,
        assignment_scope: &AssignmentScope,
    ) -> bool {
        if !self.employee_ids.is_empty() {
            return employee.map_or(false, |(id, _)| self.employee_ids.contains(&id));
        }
        if !self.department_ids.is_empty() {
            let by_employee = employee
                .and_then(|(_, dept)| dept)
                .map_or(false, |dept| self.department_ids.contains(&dept));
            let by_scope = assignment_scope
                .department_id()
                .map_or(false, |dept| self.department_ids.contains(&dept));
            return by_employee || by_scope;
        }
        true
    }

    /// Whether an employee belongs to the coverage universe.
    pub fn matches_universe(&self, department_id: Option<DepartmentId>) -> bool {
        self.department_ids.is_empty()
            || department_id.map_or(false, |dept| self.department_ids.contains(&dept))
    }

    /// Distinct employee ids of the employee filter, in input order.
    pub fn distinct_employee_ids(&self) -> Vec<EmployeeId> {
        let mut seen = Vec::with_capacity(self.employee_ids.len());
        for id in &self.employee_ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }
}

/// A fully resolved dashboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub scope: AnalyticsScope,
    pub filters: AnalyticsFilters,
    pub include_timeline: bool,
}
