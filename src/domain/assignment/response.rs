//! Stored survey responses and bulk submission values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssignmentId, EmployeeId, QuestionId, ResponseId};

/// Idempotency key of a response. `employee_id` is `None` for anonymous rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseKey {
    pub assignment_id: AssignmentId,
    pub question_id: QuestionId,
    pub employee_id: Option<EmployeeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub key: ResponseKey,
    pub value: String,
    pub submitted_at: DateTime<Utc>,
}

/// A response about to be inserted or overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    pub key: ResponseKey,
    pub value: String,
    pub submitted_at: DateTime<Utc>,
}

/// One answer in a bulk submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerItem {
    pub question_id: QuestionId,
    /// `None` is stored as an empty string.
    #[serde(default)]
    pub value: Option<String>,
}

impl AnswerItem {
    pub fn stored_value(&self) -> String {
        self.value.clone().unwrap_or_default()
    }
}

/// Counts of rows written by a bulk submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmitOutcome {
    pub created: u32,
    pub updated: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_is_stored_as_empty_string() {
        let item: AnswerItem = serde_json::from_str(r#"{"question_id": 4}"#).unwrap();
        assert_eq!(item.stored_value(), "");

        let item: AnswerItem = serde_json::from_str(r#"{"question_id": 4, "value": "5"}"#).unwrap();
        assert_eq!(item.stored_value(), "5");
    }
}
