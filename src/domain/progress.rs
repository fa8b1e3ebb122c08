//! Progress calculator for one assignment.
//!
//! Two figures are tracked per pillar and overall:
//!
//! - `completion`: answered questions over attached questions, capped at 1;
//! - `score`: mean normalized score (0..1) of the scored answers.
//!
//! The overall score is a mean over every scored answer, not a mean of
//! pillar means.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::catalog::QuestionType;
use crate::domain::foundation::PillarId;
use crate::domain::scoring::{is_answered, normalize_answer};

/// Number of questions of a pillar attached to the assignment's questionnaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarQuestionCount {
    pub pillar_id: PillarId,
    pub pillar_name: String,
    pub total: u32,
}

/// A stored answer visible to the respondent filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRow {
    pub pillar_id: PillarId,
    pub question_type: QuestionType,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarProgress {
    #[serde(rename = "pilar_id")]
    pub pillar_id: PillarId,
    #[serde(rename = "pilar_nombre")]
    pub pillar_name: String,
    pub total: u32,
    #[serde(rename = "respondidas")]
    pub answered: u32,
    #[serde(rename = "progreso")]
    pub score: f64,
    pub completion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentProgress {
    pub total: u32,
    #[serde(rename = "respondidas")]
    pub answered: u32,
    #[serde(rename = "progreso")]
    pub score: f64,
    pub completion: f64,
    #[serde(rename = "por_pilar")]
    pub pillars: Vec<PillarProgress>,
}

impl AssignmentProgress {
    /// Shape returned for an assignment that does not resolve.
    pub fn empty() -> Self {
        Self {
            total: 0,
            answered: 0,
            score: 0.0,
            completion: 0.0,
            pillars: Vec::new(),
        }
    }
}

#[derive(Default)]
struct PillarTally {
    answered: u32,
    score_sum: f64,
    scored: u32,
}

fn completion(answered: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(answered) / f64::from(total)).min(1.0)
}

/// Computes progress from the pillar totals and the filtered answers.
///
/// `totals` drives the output order. Answers for pillars absent from
/// `totals` are ignored.
pub fn compute_progress(totals: &[PillarQuestionCount], rows: &[AnswerRow]) -> AssignmentProgress {
    let mut tallies: HashMap<PillarId, PillarTally> = totals
        .iter()
        .map(|t| (t.pillar_id, PillarTally::default()))
        .collect();

    let mut score_sum = 0.0;
    let mut scored = 0u32;
    for row in rows {
        let Some(tally) = tallies.get_mut(&row.pillar_id) else {
            continue;
        };
        if !is_answered(row.value.as_deref()) {
            continue;
        }
        tally.answered += 1;
        if let Some(v) = normalize_answer(row.question_type, row.value.as_deref()).value() {
            tally.score_sum += v;
            tally.scored += 1;
            score_sum += v;
            scored += 1;
        }
    }

    let mut total = 0u32;
    let mut answered = 0u32;
    let pillars = totals
        .iter()
        .map(|t| {
            let tally = tallies.remove(&t.pillar_id).unwrap_or_default();
            total += t.total;
            answered += tally.answered;
            PillarProgress {
                pillar_id: t.pillar_id,
                pillar_name: t.pillar_name.clone(),
                total: t.total,
                answered: tally.answered,
                score: if tally.scored > 0 {
                    tally.score_sum / f64::from(tally.scored)
                } else {
                    0.0
                },
                completion: completion(tally.answered, t.total),
            }
        })
        .collect();

    AssignmentProgress {
        total,
        answered,
        score: if scored > 0 { score_sum / f64::from(scored) } else { 0.0 },
        completion: completion(answered, total),
        pillars,
    }
}
