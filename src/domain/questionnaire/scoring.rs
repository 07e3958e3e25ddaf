//! Category score accumulation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Category to cumulative score, in first-encountered order.
pub type ScoreMap = IndexMap<String, i64>;

/// Accumulates deep-dive scores per category.
///
/// `add` is the only mutator. Corrections are applied as negative amounts,
/// so a category keeps its original insertion position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringAccumulator {
    scores: ScoreMap,
}

impl ScoringAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `category`, registering the category on first use.
    pub fn add(&mut self, category: &str, amount: i64) {
        match self.scores.get_mut(category) {
            Some(score) => *score += amount,
            None => {
                self.scores.insert(category.to_string(), amount);
            }
        }
    }

    /// Current scores.
    pub fn snapshot(&self) -> ScoreMap {
        self.scores.clone()
    }

    pub fn score(&self, category: &str) -> i64 {
        self.scores.get(category).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accumulates_per_category() {
        let mut acc = ScoringAccumulator::new();
        acc.add("Checking OCD", 2);
        acc.add("Symmetry OCD", 3);
        acc.add("Checking OCD", 1);
        assert_eq!(acc.score("Checking OCD"), 3);
        assert_eq!(acc.score("Symmetry OCD"), 3);
        assert_eq!(acc.score("Contamination OCD"), 0);
    }

    #[test]
    fn snapshot_keeps_first_encountered_order() {
        let mut acc = ScoringAccumulator::new();
        acc.add("Symmetry OCD", 0);
        acc.add("Checking OCD", 4);
        acc.add("Symmetry OCD", 2);
        let keys: Vec<_> = acc.snapshot().keys().cloned().collect();
        assert_eq!(keys, vec!["Symmetry OCD", "Checking OCD"]);
    }

    #[test]
    fn negative_amounts_compensate_without_reordering() {
        let mut acc = ScoringAccumulator::new();
        acc.add("Acute Stress", 3);
        acc.add("Chronic Stress", 2);
        acc.add("Acute Stress", -3);
        let snapshot = acc.snapshot();
        assert_eq!(snapshot.get_index(0), Some((&"Acute Stress".to_string(), &0)));
        assert_eq!(snapshot["Chronic Stress"], 2);
    }
}
