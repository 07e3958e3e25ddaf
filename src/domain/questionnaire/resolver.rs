//! Classification vote and subtype resolution.
//!
//! Both are pure functions over collected answers; neither touches session
//! state.

use super::condition::Condition;
use super::scoring::ScoreMap;

/// Stateless resolver for classification votes and final subtype scores.
pub struct DiagnosisResolver;

impl DiagnosisResolver {
    /// Category with the highest cumulative score.
    ///
    /// Ties go to the category inserted first. Returns `None` for an empty map.
    pub fn resolve(scores: &ScoreMap) -> Option<String> {
        let mut best: Option<(&String, i64)> = None;
        for (category, &score) in scores {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((category, score)),
            }
        }
        best.map(|(category, _)| category.clone())
    }

    /// Plurality vote across classification answers.
    ///
    /// Each vote counts once; ties go to the condition earliest in the
    /// canonical order. Returns `None` when no votes were cast.
    pub fn classify<I>(votes: I) -> Option<Condition>
    where
        I: IntoIterator<Item = Condition>,
    {
        let mut tally = vec![0usize; Condition::ORDER.len()];
        let mut cast = false;
        for vote in votes {
            tally[vote.priority()] += 1;
            cast = true;
        }
        if !cast {
            return None;
        }

        let mut winner = Condition::ORDER[0];
        for condition in Condition::ORDER.iter().skip(1) {
            if tally[condition.priority()] > tally[winner.priority()] {
                winner = *condition;
            }
        }
        Some(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scores(entries: &[(&str, i64)]) -> ScoreMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn resolve_picks_highest_score() {
        let map = scores(&[("Checking OCD", 3), ("Symmetry OCD", 7), ("Contamination OCD", 2)]);
        assert_eq!(DiagnosisResolver::resolve(&map), Some("Symmetry OCD".to_string()));
    }

    #[test]
    fn resolve_ties_go_to_first_inserted() {
        let map = scores(&[("Panic Disorder", 5), ("Generalized Anxiety Disorder", 5)]);
        assert_eq!(DiagnosisResolver::resolve(&map), Some("Panic Disorder".to_string()));
    }

    #[test]
    fn resolve_empty_map_is_none() {
        assert_eq!(DiagnosisResolver::resolve(&ScoreMap::new()), None);
    }

    #[test]
    fn classify_takes_plurality() {
        use Condition::*;
        assert_eq!(
            DiagnosisResolver::classify([Stress, Stress, Anxiety, Depression]),
            Some(Stress)
        );
        assert_eq!(DiagnosisResolver::classify([Ocd, Trauma, Ocd, Ocd]), Some(Ocd));
    }

    #[test]
    fn classify_ties_follow_canonical_order() {
        use Condition::*;
        assert_eq!(
            DiagnosisResolver::classify([Stress, Anxiety, Stress, Anxiety]),
            Some(Stress)
        );
        assert_eq!(
            DiagnosisResolver::classify([Ocd, Trauma, Depression, Anxiety]),
            Some(Anxiety)
        );
    }

    #[test]
    fn classify_without_votes_is_none() {
        assert_eq!(DiagnosisResolver::classify(Vec::new()), None);
    }

    fn condition_strategy() -> impl Strategy<Value = Condition> {
        prop::sample::select(Condition::ORDER.to_vec())
    }

    proptest! {
        #[test]
        fn winner_has_maximal_votes_and_earliest_priority(
            votes in prop::collection::vec(condition_strategy(), 1..8)
        ) {
            let winner = DiagnosisResolver::classify(votes.clone()).unwrap();
            let count = |c: Condition| votes.iter().filter(|v| **v == c).count();
            for other in Condition::all() {
                prop_assert!(count(winner) >= count(*other));
                if count(winner) == count(*other) {
                    prop_assert!(winner.priority() <= other.priority());
                }
            }
        }

        #[test]
        fn resolved_category_is_first_with_maximum(
            values in prop::collection::vec(-5i64..20, 1..10)
        ) {
            let map: ScoreMap = values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("category-{}", i), *v))
                .collect();
            let max = *values.iter().max().unwrap();
            let first = values.iter().position(|v| *v == max).unwrap();
            prop_assert_eq!(
                DiagnosisResolver::resolve(&map),
                Some(format!("category-{}", first))
            );
        }
    }
}
