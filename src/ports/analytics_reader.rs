//! Read-only port for dashboard analytics and raw exports.
//!
//! Implementations apply the filter semantics of `AnalyticsFilters` and
//! the company restriction of the query scope. They never aggregate.

use async_trait::async_trait;

use crate::domain::analytics::{AnalyticsFilters, AnalyticsQuery, AnalyticsSnapshot};
use crate::domain::export::ResponseExportRow;
use crate::domain::foundation::{CompanyId, DomainError};

#[async_trait]
pub trait AnalyticsReader: Send + Sync {
    /// Likert responses, department names and the employee universe for a query.
    async fn load_snapshot(&self, query: &AnalyticsQuery) -> Result<AnalyticsSnapshot, DomainError>;

    /// Raw responses of every question type, newest first.
    async fn export_rows(
        &self,
        company_id: CompanyId,
        filters: &AnalyticsFilters,
    ) -> Result<Vec<ResponseExportRow>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn AnalyticsReader) {}
    }
}
