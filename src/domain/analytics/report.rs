//! Dashboard report shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::AnalyticsFilters;
use crate::domain::foundation::{
    AnalyticsScope, CompanyId, DepartmentId, EmployeeId, PillarId,
};
use crate::domain::likert::{LikertLevel, LIKERT_LEVELS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub filters: FiltersSummary,
    pub likert_levels: &'static [LikertLevel],
    pub kpis: Kpis,
    pub pillars: Vec<PillarDistribution>,
    pub heatmap: Vec<HeatmapRow>,
    pub distribution: Distribution,
    pub coverage_by_department: Vec<CoverageEntry>,
    pub timeline: Vec<TimelinePoint>,
    pub ranking: Ranking,
    pub employees: Vec<EmployeePoint>,
}

impl AnalyticsReport {
    /// Report with every list empty and only the coverage KPIs set.
    pub fn empty(
        generated_at: DateTime<Utc>,
        filters: FiltersSummary,
        coverage_total: u32,
    ) -> Self {
        Self {
            generated_at,
            filters,
            likert_levels: &LIKERT_LEVELS,
            kpis: Kpis {
                coverage_total,
                coverage_percent: (coverage_total > 0).then_some(0.0),
                ..Kpis::default()
            },
            pillars: Vec::new(),
            heatmap: Vec::new(),
            distribution: Distribution::default(),
            coverage_by_department: Vec::new(),
            timeline: Vec::new(),
            ranking: Ranking::default(),
            employees: Vec::new(),
        }
    }
}

/// Echo of the filters the report was computed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FiltersSummary {
    /// `None` for the all-companies view.
    pub company_id: Option<CompanyId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub department_ids: Vec<DepartmentId>,
    pub employee_ids: Vec<EmployeeId>,
    pub pillar_ids: Vec<PillarId>,
}

impl FiltersSummary {
    pub fn new(scope: AnalyticsScope, filters: &AnalyticsFilters) -> Self {
        Self {
            company_id: scope.company_id(),
            date_from: filters.date_from,
            date_to: filters.date_to,
            department_ids: filters.department_ids.clone(),
            employee_ids: filters.employee_ids.clone(),
            pillar_ids: filters.pillar_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarHighlight {
    pub id: PillarId,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub global_average: f64,
    pub strongest_pillar: Option<PillarHighlight>,
    pub weakest_pillar: Option<PillarHighlight>,
    pub pillar_gap: f64,
    pub coverage_percent: Option<f64>,
    pub coverage_total: u32,
    pub coverage_respondents: u32,
    pub trend_30d: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarDistribution {
    pub pillar_id: PillarId,
    pub pillar_name: String,
    pub percent: f64,
    /// Share of levels 4 and 5.
    pub pct_ge4: f64,
    /// Percent per level, 1 to 5.
    pub levels: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub pillar_id: PillarId,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub department_id: Option<DepartmentId>,
    pub department_name: String,
    pub average: f64,
    pub values: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentDistribution {
    pub department_id: Option<DepartmentId>,
    pub department_name: String,
    pub pillars: Vec<PillarDistribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub global: Vec<PillarDistribution>,
    pub by_department: Vec<DepartmentDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageEntry {
    pub department_id: Option<DepartmentId>,
    pub department_name: String,
    pub respondents: u32,
    pub total: u32,
    pub coverage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub global_percent: f64,
    pub pillars: BTreeMap<PillarId, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub id: Option<DepartmentId>,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub top: Vec<RankingEntry>,
    pub bottom: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeePoint {
    pub id: EmployeeId,
    pub name: String,
    pub percent: f64,
    /// Rounded weighted mean Likert value, 1 to 5.
    pub level: u8,
}
