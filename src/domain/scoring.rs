//! Scoring model: raw answers to normalized scores and weighted percents.
//!
//! Two scales coexist:
//!
//! - progress uses a 0..1 normalization (`normalize_answer`), where a
//!   Likert 1 is 0.0 and a Likert 5 is 1.0;
//! - analytics keeps the raw 1..5 Likert value and weighs it by
//!   `question.weight * pillar.weight`, reporting `value / (5 * weight)`
//!   as a percent.
//!
//! Unparseable answers are never errors. They come back as
//! `ScoreOutcome::Unscored` and are left out of every sum.

use serde::Serialize;

use crate::domain::catalog::QuestionType;

pub const LIKERT_MIN: f64 = 1.0;
pub const LIKERT_MAX: f64 = 5.0;

const YES_TOKENS: [&str; 7] = ["1", "si", "sí", "true", "t", "yes", "y"];
const NO_TOKENS: [&str; 6] = ["0", "no", "false", "f", "not", "n"];

/// Result of scoring one raw answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    Scored(f64),
    /// Answer present but excluded from scoring.
    Unscored,
}

impl ScoreOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            ScoreOutcome::Scored(v) => Some(*v),
            ScoreOutcome::Unscored => None,
        }
    }
}

/// True if the raw value is non-empty after trimming.
pub fn is_answered(raw: Option<&str>) -> bool {
    raw.map_or(false, |s| !s.trim().is_empty())
}

/// Parses a decimal accepting either `,` or `.` as separator.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Raw Likert value in `[1, 5]`, as consumed by analytics.
pub fn likert_value(raw: &str) -> ScoreOutcome {
    match parse_decimal(raw) {
        Some(v) if (LIKERT_MIN..=LIKERT_MAX).contains(&v) => ScoreOutcome::Scored(v),
        _ => ScoreOutcome::Unscored,
    }
}

/// Normalizes an answer to `[0, 1]` for progress scoring.
///
/// Likert values in `[1, 5]` map linearly; values outside that range
/// that fall in `[0, 1]` pass through and values in `[0, 100]` are read
/// as percentages. Open questions never score.
pub fn normalize_answer(question_type: QuestionType, raw: Option<&str>) -> ScoreOutcome {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return ScoreOutcome::Unscored,
    };

    match question_type {
        QuestionType::Likert => match parse_decimal(raw) {
            Some(v) if (LIKERT_MIN..=LIKERT_MAX).contains(&v) => {
                ScoreOutcome::Scored((v - LIKERT_MIN) / (LIKERT_MAX - LIKERT_MIN))
            }
            Some(v) if (0.0..=1.0).contains(&v) => ScoreOutcome::Scored(v),
            Some(v) if (0.0..=100.0).contains(&v) => ScoreOutcome::Scored(v / 100.0),
            _ => ScoreOutcome::Unscored,
        },
        QuestionType::YesNo => {
            let lowered = raw.to_lowercase();
            if YES_TOKENS.contains(&lowered.as_str()) {
                ScoreOutcome::Scored(1.0)
            } else if NO_TOKENS.contains(&lowered.as_str()) {
                ScoreOutcome::Scored(0.0)
            } else {
                ScoreOutcome::Unscored
            }
        }
        QuestionType::OpenText => ScoreOutcome::Unscored,
    }
}

/// Weight of one response: question weight times pillar weight.
pub fn contribution_weight(question_weight: i32, pillar_weight: i32) -> f64 {
    f64::from(question_weight) * f64::from(pillar_weight)
}

/// Rounds to one decimal, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `value_sum / (5 * weight_sum)` as a percent in `[0, 100]`, one decimal.
pub fn percent(value_sum: f64, weight_sum: f64) -> f64 {
    if weight_sum <= 0.0 {
        return 0.0;
    }
    round1(value_sum / (LIKERT_MAX * weight_sum) * 100.0).clamp(0.0, 100.0)
}

/// Share of `part` in `whole` as a percent with one decimal.
pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }
    round1(part / whole * 100.0)
}

/// Maturity level of a Likert value: rounded and clamped to `1..=5`.
pub fn level_of(value: f64) -> u8 {
    value.round().clamp(LIKERT_MIN, LIKERT_MAX) as u8
}

/// Running weighted sums for one aggregation bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedScore {
    pub value_sum: f64,
    pub weight_sum: f64,
}

impl WeightedScore {
    pub fn add(&mut self, value: f64, weight: f64) {
        self.value_sum += value * weight;
        self.weight_sum += weight;
    }

    pub fn merge(&mut self, other: &WeightedScore) {
        self.value_sum += other.value_sum;
        self.weight_sum += other.weight_sum;
    }

    pub fn percent(&self) -> f64 {
        percent(self.value_sum, self.weight_sum)
    }

    /// Weighted mean of the raw values, `None` when nothing was added.
    pub fn mean(&self) -> Option<f64> {
        (self.weight_sum > 0.0).then(|| self.value_sum / self.weight_sum)
    }

    pub fn is_empty(&self) -> bool {
        self.weight_sum <= 0.0
    }
}

/// Weighted mass per maturity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LevelHistogram([f64; 5]);

impl LevelHistogram {
    pub fn add(&mut self, value: f64, weight: f64) {
        let idx = usize::from(level_of(value)) - 1;
        self.0[idx] += weight;
    }

    /// Percent of `weight_sum` held by each level, levels 1 to 5.
    pub fn breakdown(&self, weight_sum: f64) -> Vec<f64> {
        self.0.iter().map(|mass| ratio_percent(*mass, weight_sum)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn likert_accepts_comma_and_dot() {
        assert_eq!(likert_value("3,5"), ScoreOutcome::Scored(3.5));
        assert_eq!(likert_value(" 4.0 "), ScoreOutcome::Scored(4.0));
    }

    #[test]
    fn likert_rejects_out_of_range_and_garbage() {
        assert_eq!(likert_value("0.5"), ScoreOutcome::Unscored);
        assert_eq!(likert_value("6"), ScoreOutcome::Unscored);
        assert_eq!(likert_value("muy bien"), ScoreOutcome::Unscored);
        assert_eq!(likert_value("NaN"), ScoreOutcome::Unscored);
    }

    #[test]
    fn normalize_maps_likert_linearly() {
        assert_eq!(normalize_answer(QuestionType::Likert, Some("1")), ScoreOutcome::Scored(0.0));
        assert_eq!(normalize_answer(QuestionType::Likert, Some("3")), ScoreOutcome::Scored(0.5));
        assert_eq!(normalize_answer(QuestionType::Likert, Some("5")), ScoreOutcome::Scored(1.0));
    }

    #[test]
    fn normalize_falls_back_for_legacy_scales() {
        assert_eq!(normalize_answer(QuestionType::Likert, Some("0.4")), ScoreOutcome::Scored(0.4));
        assert_eq!(normalize_answer(QuestionType::Likert, Some("80")), ScoreOutcome::Scored(0.8));
        assert_eq!(normalize_answer(QuestionType::Likert, Some("101")), ScoreOutcome::Unscored);
        assert_eq!(normalize_answer(QuestionType::Likert, Some("-1")), ScoreOutcome::Unscored);
    }

    #[test]
    fn normalize_yes_no_tokens() {
        for token in ["Sí", " yes ", "T", "1", "si"] {
            assert_eq!(normalize_answer(QuestionType::YesNo, Some(token)), ScoreOutcome::Scored(1.0));
        }
        for token in ["NO", "false", "n", "0", "not"] {
            assert_eq!(normalize_answer(QuestionType::YesNo, Some(token)), ScoreOutcome::Scored(0.0));
        }
        assert_eq!(normalize_answer(QuestionType::YesNo, Some("maybe")), ScoreOutcome::Unscored);
    }

    #[test]
    fn open_text_and_blank_never_score() {
        assert_eq!(normalize_answer(QuestionType::OpenText, Some("5")), ScoreOutcome::Unscored);
        assert_eq!(normalize_answer(QuestionType::Likert, Some("   ")), ScoreOutcome::Unscored);
        assert_eq!(normalize_answer(QuestionType::Likert, None), ScoreOutcome::Unscored);
    }

    #[test]
    fn unscored_outcome_has_no_value() {
        assert_eq!(likert_value("4").value(), Some(4.0));
        assert_eq!(likert_value("n/a").value(), None);
        assert_eq!(ScoreOutcome::Unscored.value(), None);
    }

    #[test]
    fn is_answered_ignores_whitespace() {
        assert!(is_answered(Some("x")));
        assert!(!is_answered(Some(" \t")));
        assert!(!is_answered(None));
    }

    #[test]
    fn percent_matches_worked_example() {
        // Two unit-weight answers of 5 and 3.
        assert_eq!(percent(8.0, 2.0), 80.0);
        assert_eq!(percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn weighted_values_are_not_averaged_as_percents() {
        let mut score = WeightedScore::default();
        score.add(5.0, 3.0);
        score.add(1.0, 1.0);
        assert_eq!(score.percent(), percent(16.0, 4.0));
        assert_eq!(score.percent(), 80.0);
        assert_eq!(score.mean(), Some(4.0));
    }

    #[test]
    fn histogram_breakdown_sums_levels() {
        let mut hist = LevelHistogram::default();
        hist.add(4.4, 1.0);
        hist.add(4.6, 1.0);
        hist.add(1.0, 2.0);
        assert_eq!(hist.breakdown(4.0), vec![50.0, 0.0, 0.0, 25.0, 25.0]);
    }

    #[test]
    fn level_of_rounds_and_clamps() {
        assert_eq!(level_of(2.5), 3);
        assert_eq!(level_of(2.49), 2);
        assert_eq!(level_of(0.2), 1);
        assert_eq!(level_of(9.0), 5);
    }

    #[test]
    fn round1_is_half_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(12.34), 12.3);
    }

    proptest! {
        #[test]
        fn normalized_likert_is_linear(v in 1.0f64..=5.0) {
            let expected = round1((v - 1.0) / 4.0 * 100.0);
            let normalized = normalize_answer(QuestionType::Likert, Some(&v.to_string()))
                .value()
                .unwrap();
            prop_assert!((round1(normalized * 100.0) - expected).abs() < 1e-9);
        }

        #[test]
        fn normalized_score_stays_in_unit_interval(v in -200.0f64..200.0) {
            if let ScoreOutcome::Scored(n) = normalize_answer(QuestionType::Likert, Some(&v.to_string())) {
                prop_assert!((0.0..=1.0).contains(&n));
            }
        }

        #[test]
        fn percent_is_bounded(value in 0.0f64..1e6, weight in 0.0f64..1e6) {
            let p = percent(value, weight);
            prop_assert!((0.0..=100.0).contains(&p));
        }

        #[test]
        fn equal_weight_pairs_combine_linearly(v1 in 1.0f64..=5.0, v2 in 1.0f64..=5.0, w in 1i32..10) {
            let w = f64::from(w);
            let mut combined = WeightedScore::default();
            combined.add(v1, w);
            combined.add(v2, w);
            let expected = percent(w * (v1 + v2), 2.0 * w);
            prop_assert!((combined.percent() - expected).abs() <= 0.1 + 1e-9);
            prop_assert_eq!(combined.weight_sum, 2.0 * w);
        }
    }
}
