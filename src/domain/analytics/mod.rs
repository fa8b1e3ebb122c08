//! Analytics aggregator for the maturity dashboard.
//!
//! The reader port fetches an [`AnalyticsSnapshot`] with a fixed number
//! of set-based queries; [`build_report`] then folds it in memory. The
//! aggregator performs no authorization: the scope it receives has
//! already been resolved against the caller.

mod aggregator;
mod filters;
mod report;
mod snapshot;

pub use aggregator::{build_report, Aggregation, NO_DEPARTMENT_LABEL};
pub use filters::{AnalyticsError, AnalyticsFilters, AnalyticsQuery};
pub use report::{
    AnalyticsReport, CoverageEntry, DepartmentDistribution, Distribution, EmployeePoint,
    FiltersSummary, HeatmapCell, HeatmapRow, Kpis, PillarDistribution, PillarHighlight, Ranking,
    RankingEntry, TimelinePoint,
};
pub use snapshot::{
    AnalyticsRow, AnalyticsSnapshot, DepartmentKey, RespondentRef, UniverseEmployee,
};
