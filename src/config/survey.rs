//! Survey provisioning configuration

use chrono::Duration;
use serde::Deserialize;

use super::error::ValidationError;
use crate::application::handlers::survey::AutoAssignmentWindow;

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    /// Auto-provisioned assignments start this many hours in the past
    #[serde(default = "default_lead_hours")]
    pub auto_assignment_lead_hours: u32,

    /// ... and stay open this many days
    #[serde(default = "default_horizon_days")]
    pub auto_assignment_horizon_days: u32,
}

impl SurveyConfig {
    pub fn auto_assignment_window(&self) -> AutoAssignmentWindow {
        AutoAssignmentWindow {
            lead: Duration::hours(i64::from(self.auto_assignment_lead_hours)),
            horizon: Duration::days(i64::from(self.auto_assignment_horizon_days)),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let window = self.auto_assignment_window();
        if self.auto_assignment_horizon_days == 0 || window.horizon <= window.lead {
            return Err(ValidationError::InvalidAssignmentWindow);
        }
        Ok(())
    }
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            auto_assignment_lead_hours: default_lead_hours(),
            auto_assignment_horizon_days: default_horizon_days(),
        }
    }
}

fn default_lead_hours() -> u32 {
    1
}

fn default_horizon_days() -> u32 {
    3650
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_handler_window() {
        let config = SurveyConfig::default();
        assert_eq!(config.auto_assignment_window(), AutoAssignmentWindow::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let config = SurveyConfig {
            auto_assignment_horizon_days: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidAssignmentWindow)));
    }

    #[test]
    fn lead_longer_than_horizon_is_rejected() {
        let config = SurveyConfig {
            auto_assignment_lead_hours: 48,
            auto_assignment_horizon_days: 1,
        };
        assert!(config.validate().is_err());
    }
}
