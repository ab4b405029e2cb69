use serde::{Deserialize, Serialize};

/// Tolerance used when checking that rubric weights add up to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.05;

/// One weighted criterion of the scoring rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricItem {
    pub criterion: String,
    /// 0.0 – 1.0
    pub weight: f64,
    pub description: String,
}

/// A job description together with the rubric derived from it.
/// Frozen for the rest of the session once confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub text: String,
    pub rubric: Vec<RubricItem>,
}

impl JobDescription {
    pub fn total_weight(&self) -> f64 {
        self.rubric.iter().map(|item| item.weight).sum()
    }

    pub fn weights_are_normalized(&self) -> bool {
        (self.total_weight() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Criteria whose weight falls outside 0.0 – 1.0.
    pub fn out_of_range_criteria(&self) -> Vec<&str> {
        self.rubric
            .iter()
            .filter(|item| !(0.0..=1.0).contains(&item.weight))
            .map(|item| item.criterion.as_str())
            .collect()
    }
}
