//! Edge cases at the boundaries of the example sets and the acceptance rule.

use std::collections::BTreeSet;

use regexsmith::core::fitness::{MultiCriteriaScorer, ScoringMode};
use regexsmith::core::pattern::{Bound, Pattern};

#[test]
fn empty_example_sets_score_perfect_correctness() {
    let scorer = MultiCriteriaScorer::new(ScoringMode::Balanced);
    let result = scorer.score(&Pattern::literal("anything"), &[], &[]);
    assert_eq!(result.correctness_score, 1.0);
}

#[test]
fn zero_positive_matches_is_penalized_below_threshold() {
    let scorer = MultiCriteriaScorer::new(ScoringMode::Balanced);
    let non_matching = Pattern::literal("zzz");
    let result = scorer.score(&non_matching, &["abc".to_string()], &["def".to_string()]);
    assert!(result.correctness_score <= 0.02);
}

#[test]
fn quantifier_min_max_one_is_bare_child_not_wrapped() {
    let digit_class = Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false);
    let p = Pattern::quantifier(digit_class.clone(), 1, Bound::Finite(1), false);
    assert_eq!(p.serialize(), digit_class.serialize());
}

#[test]
fn char_class_to_range_preserves_accepted_characters() {
    use regexsmith::core::mutator::Mutator;

    let original = Pattern::literal("a");
    let mut mutator = Mutator::with_default_rate(3);

    // Run enough mutations that a CharClassToRange-style rewrite is likely
    // to fire at least once; each intermediate pattern must still compile
    // and, when it is a char class derived from a single literal, must
    // still accept that literal's character.
    let mut current = original;
    for _ in 0..30 {
        current = mutator.mutate(&current);
        let re = regex::Regex::new(&format!("^(?:{})$", current.serialize())).unwrap();
        if let Pattern::CharClass(cc) = &current {
            if cc.chars.contains(&'a') || cc.ranges.iter().any(|(lo, hi)| *lo <= 'a' && 'a' <= *hi) {
                assert!(re.is_match("a"));
            }
        }
    }
}
