//! Structural mutation operators and the random-pattern generator that
//! seeds the search when no example-driven seed applies.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core::analyzer::{self, AnalysisRecord};
use crate::core::pattern::{Bound, Pattern};

const DEFAULT_MUTATION_RATE: f64 = 0.1;

/// Applies structural mutations and generates random patterns with a
/// private, seeded RNG, deterministic given the same seed and call
/// order.
pub struct Mutator {
    rng: StdRng,
    mutation_rate: f64,
}

impl Mutator {
    pub fn new(seed: u64, mutation_rate: f64) -> Mutator {
        Mutator {
            rng: StdRng::seed_from_u64(seed),
            mutation_rate,
        }
    }

    pub fn with_default_rate(seed: u64) -> Mutator {
        Mutator::new(seed, DEFAULT_MUTATION_RATE)
    }

    /// Mutate a pattern bottom-up: children are mutated first, then the
    /// (possibly already-mutated) node itself is rolled against
    /// `mutation_rate` for one of the operators applicable to it.
    pub fn mutate(&mut self, pattern: &Pattern) -> Pattern {
        let with_mutated_children = match pattern {
            Pattern::Quantifier(q) => Pattern::quantifier(self.mutate(&q.child), q.min, q.max, q.lazy),
            Pattern::Group(g) => Pattern::group(self.mutate(&g.child), g.capturing, g.name.clone()),
            Pattern::Alternation { alts } => {
                Pattern::alternation(alts.iter().map(|a| self.mutate(a)).collect())
            }
            Pattern::Sequence { parts } => {
                Pattern::sequence(parts.iter().map(|p| self.mutate(p)).collect())
            }
            leaf => leaf.clone(),
        };

        if !self.rng.gen_bool(self.mutation_rate) {
            return with_mutated_children;
        }

        let applicable = applicable_operators(&with_mutated_children);
        match applicable.choose(&mut self.rng) {
            Some(op) => self.apply(*op, &with_mutated_children),
            None => with_mutated_children,
        }
    }

    fn apply(&mut self, op: Operator, node: &Pattern) -> Pattern {
        match op {
            Operator::LiteralToCharClass => self.literal_to_char_class(node),
            Operator::CharClassToRange => char_class_to_range(node),
            Operator::AddQuantifier => self.add_quantifier(node),
            Operator::ModifyQuantifier => self.modify_quantifier(node),
            Operator::Grouping => self.grouping(node),
            Operator::Alternation => self.alternation(node),
            Operator::Wildcard => self.wildcard(node),
        }
    }

    fn literal_to_char_class(&mut self, node: &Pattern) -> Pattern {
        let Pattern::Literal { text } = node else { return node.clone() };
        let ch = text.chars().next().unwrap();
        if ch.is_ascii_lowercase() {
            Pattern::char_class(BTreeSet::new(), vec![('a', 'z')], false)
        } else if ch.is_ascii_uppercase() {
            Pattern::char_class(BTreeSet::new(), vec![('A', 'Z')], false)
        } else if ch.is_ascii_digit() {
            Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false)
        } else {
            node.clone()
        }
    }

    fn add_quantifier(&mut self, node: &Pattern) -> Pattern {
        const CHOICES: [(u32, Bound); 5] = [
            (0, Bound::Finite(1)),
            (0, Bound::Infinite),
            (1, Bound::Infinite),
            (2, Bound::Finite(4)),
            (1, Bound::Finite(3)),
        ];
        let (min, max) = *CHOICES.choose(&mut self.rng).unwrap();
        Pattern::quantifier(node.clone(), min, max, false)
    }

    fn modify_quantifier(&mut self, node: &Pattern) -> Pattern {
        let Pattern::Quantifier(q) = node else { return node.clone() };

        if self.rng.gen_bool(0.5) {
            let delta: i64 = *[-1i64, 0, 1].choose(&mut self.rng).unwrap();
            let new_min = (q.min as i64 + delta).max(0) as u32;

            let new_max = match q.max {
                Bound::Infinite => {
                    if self.rng.gen_bool(0.7) {
                        Bound::Infinite
                    } else {
                        Bound::Finite(self.rng.gen_range(new_min + 1..=new_min + 5))
                    }
                }
                Bound::Finite(max) => {
                    let delta: i64 = *[-1i64, 0, 1].choose(&mut self.rng).unwrap();
                    let candidate = ((max as i64 + delta).max(new_min as i64)) as u32;
                    if candidate == new_min && self.rng.gen_bool(0.3) {
                        Bound::Infinite
                    } else {
                        Bound::Finite(candidate)
                    }
                }
            };

            Pattern::quantifier(q.child.clone(), new_min, new_max, q.lazy)
        } else {
            Pattern::quantifier(q.child.clone(), q.min, q.max, !q.lazy)
        }
    }

    fn grouping(&mut self, node: &Pattern) -> Pattern {
        if let Pattern::Group(g) = node {
            g.child.clone()
        } else {
            let capturing = self.rng.gen_bool(0.5);
            Pattern::group(node.clone(), capturing, None)
        }
    }

    fn alternation(&mut self, node: &Pattern) -> Pattern {
        if let Pattern::Alternation { alts } = node {
            if alts.len() > 1 && self.rng.gen_bool(0.3) {
                let mut remaining = alts.clone();
                let drop_idx = self.rng.gen_range(0..remaining.len());
                remaining.remove(drop_idx);
                Pattern::alternation(remaining)
            } else {
                let new_alt = self.generate_similar_pattern(&alts[0]);
                let mut extended = alts.clone();
                extended.push(new_alt);
                Pattern::alternation(extended)
            }
        } else {
            let similar = self.generate_similar_pattern(node);
            Pattern::alternation(vec![node.clone(), similar])
        }
    }

    fn wildcard(&mut self, node: &Pattern) -> Pattern {
        match node {
            Pattern::Wildcard => {
                const SETS: [(char, char); 4] = [('a', 'z'), ('A', 'Z'), ('0', '9'), ('!', '~')];
                let range = *SETS.choose(&mut self.rng).unwrap();
                Pattern::char_class(BTreeSet::new(), vec![range], false)
            }
            Pattern::CharClass(_) => {
                if self.rng.gen_bool(0.2) {
                    Pattern::wildcard()
                } else {
                    node.clone()
                }
            }
            Pattern::Literal { .. } => Pattern::wildcard(),
            _ => node.clone(),
        }
    }

    fn generate_similar_pattern(&mut self, node: &Pattern) -> Pattern {
        match node {
            Pattern::Literal { text } => {
                let ch = text.chars().next().unwrap_or('a');
                if ch.is_alphabetic() {
                    Pattern::literal(self.random_letter().to_string())
                } else if ch.is_ascii_digit() {
                    Pattern::literal(self.rng.gen_range(0..10).to_string())
                } else {
                    Pattern::literal(self.random_letter().to_string())
                }
            }
            Pattern::CharClass(cc) => {
                let mut chars: BTreeSet<char> = cc.chars.iter().copied().take(3).collect();
                chars.insert(self.random_letter());
                Pattern::char_class(chars, Vec::new(), false)
            }
            _ => Pattern::literal(self.random_letter().to_string()),
        }
    }

    fn random_letter(&mut self) -> char {
        (b'a' + self.rng.gen_range(0..26)) as char
    }

    /// Generate a pattern from scratch within a complexity budget. When
    /// `examples` is `Some`, the seed is biased toward the analyzer's
    /// structural/domain guess for those examples (spec's "examples-aware
    /// branch", preferred over pure randomness whenever examples exist).
    pub fn random_pattern(&mut self, budget: u64, examples: Option<&[String]>) -> Pattern {
        if let Some(examples) = examples {
            if !examples.is_empty() && self.rng.gen_bool(0.5) {
                let examples_vec: Vec<String> = examples.to_vec();
                let analysis: AnalysisRecord = analyzer::analyze(&examples_vec);
                return analyzer::seed(&analysis);
            }
        }
        self.random_node(budget)
    }

    fn random_node(&mut self, budget: u64) -> Pattern {
        if budget <= 1 {
            return match self.rng.gen_range(0..3) {
                0 => {
                    let alphanum: &[char] = &[
                        'a', 'b', 'c', 'd', 'e', 'f', 'g', '0', '1', '2', '3', '4', '5',
                    ];
                    Pattern::literal(alphanum.choose(&mut self.rng).unwrap().to_string())
                }
                1 => {
                    let n = self.rng.gen_range(2..=5);
                    let chars: BTreeSet<char> = (0..n).map(|_| self.random_letter()).collect();
                    Pattern::char_class(chars, Vec::new(), false)
                }
                _ => Pattern::wildcard(),
            };
        }

        match self.rng.gen_range(0..4) {
            0 => {
                let child = self.random_node(budget.saturating_sub(2));
                let min = self.rng.gen_range(0..=3);
                let max = if self.rng.gen_bool(0.3) {
                    Bound::Infinite
                } else {
                    Bound::Finite(self.rng.gen_range(min..=min + 5))
                };
                Pattern::quantifier(child, min, max, false)
            }
            1 => {
                let child = self.random_node(budget.saturating_sub(2));
                Pattern::group(child, self.rng.gen_bool(0.5), None)
            }
            2 => {
                let max_alts = (budget / 2).clamp(2, 4);
                let num_alts = if max_alts > 2 { self.rng.gen_range(2..=max_alts) } else { 2 };
                let alt_budget = ((budget.saturating_sub(1)) / num_alts).max(1);
                let alts: Vec<Pattern> = (0..num_alts).map(|_| self.random_node(alt_budget)).collect();
                Pattern::alternation(alts)
            }
            _ => self.random_node(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    LiteralToCharClass,
    CharClassToRange,
    AddQuantifier,
    ModifyQuantifier,
    Grouping,
    Alternation,
    Wildcard,
}

fn applicable_operators(node: &Pattern) -> Vec<Operator> {
    let mut ops = Vec::new();

    if let Pattern::Literal { text } = node {
        if text.chars().count() == 1 && text.chars().next().unwrap().is_alphabetic() {
            ops.push(Operator::LiteralToCharClass);
        }
    }

    if let Pattern::CharClass(cc) = node {
        if cc.chars.len() > 3 {
            ops.push(Operator::CharClassToRange);
        }
    }

    if !matches!(node, Pattern::Quantifier(_) | Pattern::Anchor { .. }) {
        ops.push(Operator::AddQuantifier);
    }

    if matches!(node, Pattern::Quantifier(_)) {
        ops.push(Operator::ModifyQuantifier);
    }

    ops.push(Operator::Grouping);
    ops.push(Operator::Alternation);

    if matches!(node, Pattern::Wildcard | Pattern::CharClass(_) | Pattern::Literal { .. }) {
        ops.push(Operator::Wildcard);
    }

    ops
}

/// Collapse runs of 3+ consecutive characters in a char class into
/// ranges, leaving shorter runs as loose characters.
fn char_class_to_range(node: &Pattern) -> Pattern {
    let Pattern::CharClass(cc) = node else { return node.clone() };

    let chars: Vec<char> = cc.chars.iter().copied().collect();
    let mut ranges = cc.ranges.clone();
    let mut remaining: BTreeSet<char> = cc.chars.clone();

    let mut i = 0;
    while i < chars.len() {
        let mut j = i + 1;
        while j < chars.len() && chars[j] as u32 == chars[j - 1] as u32 + 1 {
            j += 1;
        }

        if j - i >= 3 {
            ranges.push((chars[i], chars[j - 1]));
            for ch in &chars[i..j] {
                remaining.remove(ch);
            }
        }

        i = if j > i + 1 { j } else { i + 1 };
    }

    Pattern::char_class(remaining, ranges, cc.negated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutate_is_deterministic_given_seed() {
        let pattern = Pattern::literal("a");
        let mut m1 = Mutator::new(42, 1.0);
        let mut m2 = Mutator::new(42, 1.0);
        assert_eq!(m1.mutate(&pattern), m2.mutate(&pattern));
    }

    #[test]
    fn zero_mutation_rate_is_identity() {
        let pattern = Pattern::quantifier(Pattern::literal("ab"), 0, Bound::Infinite, false);
        let mut m = Mutator::new(1, 0.0);
        assert_eq!(m.mutate(&pattern), pattern);
    }

    #[test]
    fn char_class_to_range_collapses_consecutive_runs() {
        let cc = Pattern::char_class(['a', 'b', 'c', 'd', 'x'].into_iter().collect(), vec![], false);
        let mutated = char_class_to_range(&cc);
        if let Pattern::CharClass(result) = mutated {
            assert!(result.ranges.contains(&('a', 'd')));
            assert!(result.chars.contains(&'x'));
            assert!(!result.chars.contains(&'a'));
        } else {
            panic!("expected CharClass");
        }
    }

    #[test]
    fn random_pattern_is_well_formed() {
        let mut m = Mutator::with_default_rate(7);
        for _ in 0..20 {
            let pattern = m.random_pattern(10, None);
            assert!(pattern.is_well_formed());
        }
    }

    #[test]
    fn random_pattern_with_examples_can_use_domain_seed() {
        let mut m = Mutator::new(3, DEFAULT_MUTATION_RATE);
        let examples = vec!["123".to_string(), "456".to_string()];
        let pattern = m.random_pattern(10, Some(&examples));
        assert!(pattern.is_well_formed());
    }
}
