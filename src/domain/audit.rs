//! Audit trail entries written by mutating and exporting operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{CallerIdentity, CompanyId, Role, UserId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    SurveyAnswerBulk,
    ReportExport,
    AssignmentCreate,
    AssignmentProvision,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::SurveyAnswerBulk => "SURVEY_ANSWER_BULK",
            AuditAction::ReportExport => "REPORT_EXPORT",
            AuditAction::AssignmentCreate => "ASSIGNMENT_CREATE",
            AuditAction::AssignmentProvision => "ASSIGNMENT_PROVISION",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SURVEY_ANSWER_BULK" => Ok(AuditAction::SurveyAnswerBulk),
            "REPORT_EXPORT" => Ok(AuditAction::ReportExport),
            "ASSIGNMENT_CREATE" => Ok(AuditAction::AssignmentCreate),
            "ASSIGNMENT_PROVISION" => Ok(AuditAction::AssignmentProvision),
            other => Err(ValidationError::invalid_format(
                "action",
                format!("unknown audit action '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub occurred_at: DateTime<Utc>,
    pub action: AuditAction,
    pub user_id: Option<UserId>,
    pub user_role: Option<Role>,
    pub company_id: Option<CompanyId>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub notes: Option<String>,
    pub extra: Value,
}

impl AuditEntry {
    /// Entry attributed to `caller`. The company defaults to the caller's own.
    pub fn by(caller: &CallerIdentity, action: AuditAction, occurred_at: DateTime<Utc>) -> Self {
        Self {
            occurred_at,
            action,
            user_id: Some(caller.user_id),
            user_role: Some(caller.role),
            company_id: caller.company_id,
            entity_type: None,
            entity_id: None,
            notes: None,
            extra: Value::Null,
        }
    }

    pub fn company(mut self, company_id: Option<CompanyId>) -> Self {
        if company_id.is_some() {
            self.company_id = company_id;
        }
        self
    }

    pub fn entity(mut self, entity_type: impl Into<String>, entity_id: i64) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn extra(mut self, extra: Value) -> Self {
        self.extra = extra;
        self
    }
}

/// A stored audit entry with its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub id: i64,
    #[serde(flatten)]
    pub entry: AuditEntry,
}
