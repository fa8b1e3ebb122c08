//! GetDashboardAnalyticsHandler - Query handler for the maturity dashboard.
//!
//! Authorization resolves the query scope before any data is read. The
//! aggregation itself runs over a snapshot fetched in one reader call.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::analytics::{
    build_report, AnalyticsError, AnalyticsFilters, AnalyticsQuery, AnalyticsReport,
};
use crate::domain::foundation::{AccessPolicy, CallerIdentity, CompanyId};
use crate::ports::AnalyticsReader;

#[derive(Debug, Clone)]
pub struct GetDashboardAnalyticsQuery {
    pub caller: CallerIdentity,
    /// `None` requests the all-companies view.
    pub company_id: Option<CompanyId>,
    pub filters: AnalyticsFilters,
    pub include_timeline: bool,
}

pub struct GetDashboardAnalyticsHandler {
    reader: Arc<dyn AnalyticsReader>,
    policy: AccessPolicy,
}

impl GetDashboardAnalyticsHandler {
    pub fn new(reader: Arc<dyn AnalyticsReader>) -> Self {
        Self {
            reader,
            policy: AccessPolicy::default(),
        }
    }

    pub async fn handle(&self, query: GetDashboardAnalyticsQuery) -> Result<AnalyticsReport, AnalyticsError> {
        let scope = self
            .policy
            .resolve_analytics_scope(&query.caller, query.company_id)
            .map_err(|err| {
                warn!(user_id = %query.caller.user_id, error = %err, "analytics access denied");
                err
            })?;
        query.filters.validate()?;

        let analytics_query = AnalyticsQuery {
            scope,
            filters: query.filters,
            include_timeline: query.include_timeline,
        };
        let snapshot = self.reader.load_snapshot(&analytics_query).await?;

        let report = build_report(&snapshot, &analytics_query, Utc::now());
        debug!(
            rows = snapshot.rows.len(),
            employees = snapshot.employees.len(),
            pillars = report.pillars.len(),
            "analytics snapshot aggregated"
        );

        Ok(report)
    }
}
