//! Questionnaires and their ordered question sets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{CompanyId, QuestionId, QuestionnaireId, ValidationError};

/// Title given to questionnaires provisioned by the simplified survey flow.
pub const AUTO_QUESTIONNAIRE_TITLE: &str = "Auto (all questions)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionnaireStatus {
    Draft,
    Published,
}

impl QuestionnaireStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionnaireStatus::Draft => "DRAFT",
            QuestionnaireStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for QuestionnaireStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionnaireStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(QuestionnaireStatus::Draft),
            "PUBLISHED" => Ok(QuestionnaireStatus::Published),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown questionnaire status '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub id: QuestionnaireId,
    pub company_id: CompanyId,
    pub title: String,
    pub version: i32,
    pub status: QuestionnaireStatus,
}

impl Questionnaire {
    pub fn is_published(&self) -> bool {
        self.status == QuestionnaireStatus::Published
    }

    /// Ordering key for "latest published": highest version, then highest id.
    pub fn recency_key(&self) -> (i32, QuestionnaireId) {
        (self.version, self.id)
    }
}

/// Attachment of a question to a questionnaire at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireQuestion {
    pub questionnaire_id: QuestionnaireId,
    pub question_id: QuestionId,
    pub position: i32,
}

/// Changes needed to bring a questionnaire's question set in line with a target set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSetChanges {
    pub added: Vec<QuestionnaireQuestion>,
    pub removed: Vec<QuestionId>,
}

impl QuestionSetChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Plans how to attach `desired` questions to a questionnaire.
///
/// Missing questions are appended after the current highest position in
/// the order given. With `purge_missing`, attachments absent from
/// `desired` are scheduled for removal.
pub fn plan_question_set(
    questionnaire_id: QuestionnaireId,
    existing: &[QuestionnaireQuestion],
    desired: &[QuestionId],
    purge_missing: bool,
) -> QuestionSetChanges {
    let wanted: HashSet<QuestionId> = desired.iter().copied().collect();
    let removed: Vec<QuestionId> = if purge_missing {
        existing
            .iter()
            .map(|link| link.question_id)
            .filter(|id| !wanted.contains(id))
            .collect()
    } else {
        Vec::new()
    };

    let mut attached: HashSet<QuestionId> = existing.iter().map(|link| link.question_id).collect();
    let mut position = existing.iter().map(|link| link.position).max().unwrap_or(0);
    let mut added = Vec::new();
    for &question_id in desired {
        if !attached.insert(question_id) {
            continue;
        }
        position += 1;
        added.push(QuestionnaireQuestion {
            questionnaire_id,
            question_id,
            position,
        });
    }

    QuestionSetChanges { added, removed }
}
