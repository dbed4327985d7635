//! Symptom overlap scoring.
//!
//! score = |observed ∩ expected| / |expected|
//!
//! The best score wins; ties keep the earliest condition in catalog order.

use std::collections::HashSet;

use crate::models::Condition;

/// Thresholds are compared in whole thousandths.
const THRESHOLD_SCALE: u64 = 1000;

/// Match score of one condition against an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionScore<'a> {
    pub condition: &'a Condition,
    /// Expected symptoms that were observed, in the condition's order
    pub matched: Vec<String>,
    /// Fraction of expected symptoms observed (0.0 - 1.0)
    pub score: f64,
}

impl ConditionScore<'_> {
    /// Whether the score clears the threshold (inclusive).
    ///
    /// Compared in integers: `matched * 1000 >= total * round(threshold * 1000)`,
    /// so 3 of 10 clears 0.3 and 2 of 7 does not.
    pub fn passes(&self, threshold: f64) -> bool {
        let total = self.condition.symptoms.len() as u64;
        if total == 0 {
            return false;
        }
        let required = (threshold.clamp(0.0, 1.0) * THRESHOLD_SCALE as f64).round() as u64;
        self.matched.len() as u64 * THRESHOLD_SCALE >= total * required
    }

    /// Score as an exact fraction. Symptom-less conditions are 0/1.
    fn fraction(&self) -> (usize, usize) {
        (self.matched.len(), self.condition.symptoms.len().max(1))
    }

    /// Score as a 0 - 100 percentage, rounded to nearest.
    pub fn confidence(&self) -> u8 {
        confidence_percent(self.score)
    }
}

/// Collapse an observation into a set of trimmed, non-empty symptoms.
pub fn observation_set<S: AsRef<str>>(observed: &[S]) -> HashSet<&str> {
    observed
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Score a single condition. Conditions without symptoms always score 0.
pub fn score_condition<'a>(condition: &'a Condition, observed: &HashSet<&str>) -> ConditionScore<'a> {
    let matched: Vec<String> = condition
        .symptoms
        .iter()
        .filter(|s| observed.contains(s.as_str()))
        .cloned()
        .collect();

    let score = if condition.symptoms.is_empty() {
        0.0
    } else {
        matched.len() as f64 / condition.symptoms.len() as f64
    };

    ConditionScore {
        condition,
        matched,
        score,
    }
}

/// Highest-scoring condition, first in catalog order on ties.
pub fn best_match<'a>(conditions: &'a [Condition], observed: &HashSet<&str>) -> Option<ConditionScore<'a>> {
    conditions
        .iter()
        .map(|c| score_condition(c, observed))
        .fold(None, |best: Option<ConditionScore<'a>>, current| match best {
            Some(b) if at_least(b.fraction(), current.fraction()) => Some(b),
            _ => Some(current),
        })
}

/// a/b >= c/d without floating point.
fn at_least((a, b): (usize, usize), (c, d): (usize, usize)) -> bool {
    a * d >= c * b
}

/// Convert a 0.0 - 1.0 score to a rounded percentage.
pub fn confidence_percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}
