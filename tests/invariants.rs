//! Invariants that must hold for every pattern the mutator or analyzer can
//! produce, independent of any specific example set.

use std::collections::BTreeSet;

use regexsmith::core::mutator::Mutator;
use regexsmith::core::pattern::{Bound, Pattern};
use regexsmith::core::validator::quick_validate;

fn sample_patterns() -> Vec<Pattern> {
    let digit_class = Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false);
    vec![
        Pattern::literal("hello"),
        digit_class.clone(),
        Pattern::quantifier(digit_class.clone(), 1, Bound::Infinite, false),
        Pattern::group(Pattern::literal("ab"), true, None),
        Pattern::alternation(vec![Pattern::literal("cat"), Pattern::literal("dog")]),
        Pattern::sequence(vec![Pattern::literal("foo"), digit_class]),
    ]
}

#[test]
fn every_sample_pattern_compiles() {
    for pattern in sample_patterns() {
        assert!(quick_validate(&pattern), "{:?} did not compile", pattern.serialize());
    }
}

#[test]
fn every_sample_pattern_has_nonnegative_complexity() {
    for pattern in sample_patterns() {
        // complexity() returns u64, so this is really checking it doesn't
        // panic or overflow on these shapes.
        let _ = pattern.complexity();
    }
}

#[test]
fn clone_round_trips_serialize_and_complexity() {
    for pattern in sample_patterns() {
        let cloned = pattern.clone();
        assert_eq!(pattern.serialize(), cloned.serialize());
        assert_eq!(pattern.complexity(), cloned.complexity());
    }
}

#[test]
fn mutator_output_always_compiles() {
    let mut mutator = Mutator::new(42, 0.3);
    let mut current = Pattern::literal("seed");
    for _ in 0..50 {
        current = mutator.mutate(&current);
        assert!(quick_validate(&current), "mutation produced invalid regex: {}", current.serialize());
    }
}

#[test]
fn quantifier_min_max_one_serializes_as_bare_child() {
    let p = Pattern::quantifier(Pattern::literal("x"), 1, Bound::Finite(1), false);
    assert_eq!(p.serialize(), "x");
}
