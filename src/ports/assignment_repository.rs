//! Assignment repository port.
//!
//! Reads and writes survey assignments. The auto-provisioning flow
//! updates rows in place, so `update` must keep the id stable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::assignment::{Assignment, NewAssignment};
use crate::domain::foundation::{AssignmentId, CompanyId, DomainError};

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Find an assignment by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: AssignmentId) -> Result<Option<Assignment>, DomainError>;

    /// The company-wide assignment active at `at`.
    ///
    /// When several overlap, the one with the latest start wins.
    async fn find_active_company_wide(
        &self,
        company_id: CompanyId,
        at: DateTime<Utc>,
    ) -> Result<Option<Assignment>, DomainError>;

    /// Persist a new assignment and return it with its id.
    async fn insert(&self, assignment: &NewAssignment) -> Result<Assignment, DomainError>;

    /// Overwrite questionnaire, window and anonymity of an existing assignment.
    ///
    /// # Errors
    ///
    /// - `AssignmentNotFound` if the assignment doesn't exist
    async fn update(&self, assignment: &Assignment) -> Result<(), DomainError>;
}
