//! Query parameters for analytics endpoints.
//!
//! Id lists arrive comma separated (`pillar_ids=1,2,3`).

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::analytics::AnalyticsFilters;
use crate::domain::foundation::{parse_id_list, CompanyId, ValidationError};

fn default_true() -> bool {
    true
}

/// Filters shared by the dashboard and the response export.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub department_ids: Option<String>,
    pub employee_ids: Option<String>,
    pub pillar_ids: Option<String>,
}

impl FilterParams {
    pub fn to_filters(&self) -> Result<AnalyticsFilters, ValidationError> {
        Ok(AnalyticsFilters {
            date_from: self.date_from,
            date_to: self.date_to,
            department_ids: ids(self.department_ids.as_deref())?,
            employee_ids: ids(self.employee_ids.as_deref())?,
            pillar_ids: ids(self.pillar_ids.as_deref())?,
        })
    }
}

fn ids<T>(raw: Option<&str>) -> Result<Vec<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    raw.map_or_else(|| Ok(Vec::new()), parse_id_list::<T>)
}

/// Query of `GET /api/analytics/dashboard`.
///
/// Do not flatten `FilterParams` here: flattened url-encoded values reach
/// serde as strings and numeric fields stop parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardParams {
    /// Omitted for the all-companies view.
    pub company_id: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub department_ids: Option<String>,
    pub employee_ids: Option<String>,
    pub pillar_ids: Option<String>,
    #[serde(default = "default_true")]
    pub include_timeline: bool,
}

impl DashboardParams {
    pub fn company_id(&self) -> Option<CompanyId> {
        self.company_id.map(CompanyId::new)
    }

    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from,
            date_to: self.date_to,
            department_ids: self.department_ids.clone(),
            employee_ids: self.employee_ids.clone(),
            pillar_ids: self.pillar_ids.clone(),
        }
    }
}

/// Query of `GET /api/analytics/responses/export`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportParams {
    pub company_id: i64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub department_ids: Option<String>,
    pub employee_ids: Option<String>,
    pub pillar_ids: Option<String>,
}

impl ExportParams {
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from,
            date_to: self.date_to,
            department_ids: self.department_ids.clone(),
            employee_ids: self.employee_ids.clone(),
            pillar_ids: self.pillar_ids.clone(),
        }
    }
}

/// Query of `GET /api/audit/export`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditExportParams {
    pub company_id: Option<i64>,
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DepartmentId, PillarId};

    #[test]
    fn comma_lists_become_typed_ids() {
        let params = FilterParams {
            pillar_ids: Some("1, 2,,3".to_string()),
            department_ids: Some(String::new()),
            ..Default::default()
        };

        let filters = params.to_filters().unwrap();

        assert_eq!(
            filters.pillar_ids,
            vec![PillarId::new(1), PillarId::new(2), PillarId::new(3)]
        );
        assert_eq!(filters.department_ids, Vec::<DepartmentId>::new());
        assert!(filters.employee_ids.is_empty());
    }

    #[test]
    fn malformed_id_is_rejected() {
        let params = FilterParams {
            employee_ids: Some("4,x".to_string()),
            ..Default::default()
        };
        assert!(params.to_filters().is_err());
    }
}
