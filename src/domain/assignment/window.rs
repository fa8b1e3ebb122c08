//! Validity window of an assignment.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::AssignmentError;

/// Closed interval `[starts_at, ends_at]` with `starts_at < ends_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidityWindow {
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl ValidityWindow {
    pub fn new(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<Self, AssignmentError> {
        if starts_at >= ends_at {
            return Err(AssignmentError::validation("starts_at must be before ends_at"));
        }
        Ok(Self { starts_at, ends_at })
    }

    /// Window used by auto-provisioned assignments: opens `lead` before
    /// `now` and closes `horizon` after it.
    pub fn around(now: DateTime<Utc>, lead: Duration, horizon: Duration) -> Result<Self, AssignmentError> {
        Self::new(now - lead, now + horizon)
    }

    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }
}
