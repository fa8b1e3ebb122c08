//! Pillars and the questions grouped under them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{CompanyId, PillarId, QuestionId, ValidationError};

/// A maturity dimension with its own weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: PillarId,
    /// `None` marks a global pillar shared by every company.
    pub company_id: Option<CompanyId>,
    pub name: String,
    pub description: Option<String>,
    pub weight: i32,
}

impl Pillar {
    pub fn is_global(&self) -> bool {
        self.company_id.is_none()
    }

    /// Global pillars are visible to everyone, owned pillars only to their company.
    pub fn is_visible_to(&self, company_id: CompanyId) -> bool {
        self.company_id.map_or(true, |owner| owner == company_id)
    }
}

/// How a question is answered and whether it is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Likert,
    OpenText,
    YesNo,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Likert => "LIKERT",
            QuestionType::OpenText => "OPEN_TEXT",
            QuestionType::YesNo => "YES_NO",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKERT" => Ok(QuestionType::Likert),
            "OPEN_TEXT" => Ok(QuestionType::OpenText),
            "YES_NO" => Ok(QuestionType::YesNo),
            other => Err(ValidationError::invalid_format(
                "question_type",
                format!("unknown question type '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub pillar_id: PillarId,
    pub statement: String,
    pub question_type: QuestionType,
    pub required: bool,
    pub weight: i32,
    /// Reference answer, only shown to elevated roles.
    pub expected_answer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillar(company: Option<i64>) -> Pillar {
        Pillar {
            id: PillarId::new(1),
            company_id: company.map(CompanyId::new),
            name: "Cloud".to_string(),
            description: None,
            weight: 1,
        }
    }

    #[test]
    fn global_pillar_is_visible_everywhere() {
        let p = pillar(None);
        assert!(p.is_global());
        assert!(p.is_visible_to(CompanyId::new(8)));
    }

    #[test]
    fn owned_pillar_is_visible_only_to_owner() {
        let p = pillar(Some(2));
        assert!(p.is_visible_to(CompanyId::new(2)));
        assert!(!p.is_visible_to(CompanyId::new(3)));
    }

    #[test]
    fn question_type_parses_wire_names() {
        assert_eq!("YES_NO".parse::<QuestionType>().unwrap(), QuestionType::YesNo);
        assert_eq!(QuestionType::OpenText.to_string(), "OPEN_TEXT");
        assert!("likert".parse::<QuestionType>().is_err());
    }
}
