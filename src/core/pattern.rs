//! Pattern IR - the tree of regex constructs the rest of the crate
//! searches over.
//!
//! Nodes are owned by their parent; cloning is deep (`Clone` derives do
//! this for free since every child is `Box`ed or owned outright). Every
//! node answers `serialize()` and `complexity()`; `collect_nodes` walks
//! the tree in deterministic pre-order for the mutator and the validator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::emitters::pcre2;

/// A node in the regex pattern IR.
///
/// This is a closed sum of eight variants: the seven named in the
/// synthesis specification plus `Sequence`, which concatenates sibling
/// parts (needed to express multi-part patterns like an email seed,
/// see `DESIGN.md` for why the eighth variant exists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Pattern {
    Literal { text: String },
    CharClass(CharClass),
    Wildcard,
    Anchor { at: AnchorKind },
    Quantifier(Box<Quantifier>),
    Group(Box<Group>),
    Alternation { alts: Vec<Pattern> },
    Sequence { parts: Vec<Pattern> },
}

/// A character class: `[abc]`, `[^0-9]`, `[a-zA-Z_]`, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharClass {
    pub chars: BTreeSet<char>,
    pub ranges: Vec<(char, char)>,
    pub negated: bool,
}

/// Anchor kinds the IR supports: start/end of string and word boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorKind {
    Start,
    End,
    WordBoundary,
    NotWordBoundary,
}

/// Repetition bound. `Infinite` serializes as an unbounded `{m,}`/`*`/`+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Finite(u32),
    Infinite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantifier {
    pub child: Pattern,
    pub min: u32,
    pub max: Bound,
    pub lazy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub child: Pattern,
    pub capturing: bool,
    pub name: Option<String>,
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Pattern {
        Pattern::Literal { text: text.into() }
    }

    pub fn wildcard() -> Pattern {
        Pattern::Wildcard
    }

    pub fn anchor(at: AnchorKind) -> Pattern {
        Pattern::Anchor { at }
    }

    pub fn char_class(chars: BTreeSet<char>, ranges: Vec<(char, char)>, negated: bool) -> Pattern {
        Pattern::CharClass(CharClass { chars, ranges, negated })
    }

    pub fn quantifier(child: Pattern, min: u32, max: Bound, lazy: bool) -> Pattern {
        Pattern::Quantifier(Box::new(Quantifier { child, min, max, lazy }))
    }

    pub fn group(child: Pattern, capturing: bool, name: Option<String>) -> Pattern {
        Pattern::Group(Box::new(Group { child, capturing, name }))
    }

    pub fn alternation(alts: Vec<Pattern>) -> Pattern {
        Pattern::Alternation { alts }
    }

    pub fn sequence(parts: Vec<Pattern>) -> Pattern {
        if parts.len() == 1 {
            parts.into_iter().next().unwrap()
        } else {
            Pattern::Sequence { parts }
        }
    }

    /// Serialize to standard (PCRE-subset) regex syntax.
    pub fn serialize(&self) -> String {
        pcre2::emit(self)
    }

    /// Non-negative size-like measure, summed bottom-up over children.
    pub fn complexity(&self) -> u64 {
        match self {
            Pattern::Literal { text } => text.chars().count() as u64,
            Pattern::CharClass(cc) => 2 + cc.chars.len() as u64 + cc.ranges.len() as u64,
            Pattern::Wildcard => 1,
            Pattern::Anchor { .. } => 1,
            Pattern::Quantifier(q) => {
                let mut c = q.child.complexity() + 2;
                if matches!(q.max, Bound::Infinite) {
                    c += 2;
                }
                c
            }
            Pattern::Group(g) => g.child.complexity() + 2,
            Pattern::Alternation { alts } => {
                let sum: u64 = alts.iter().map(Pattern::complexity).sum();
                sum + alts.len().saturating_sub(1) as u64
            }
            Pattern::Sequence { parts } => parts.iter().map(Pattern::complexity).sum(),
        }
    }

    /// Pre-order traversal: this node, then children left to right
    /// (alternation/sequence parts in list order).
    pub fn collect_nodes(&self) -> Vec<&Pattern> {
        let mut out = vec![self];
        match self {
            Pattern::Quantifier(q) => out.extend(q.child.collect_nodes()),
            Pattern::Group(g) => out.extend(g.child.collect_nodes()),
            Pattern::Alternation { alts } => {
                for alt in alts {
                    out.extend(alt.collect_nodes());
                }
            }
            Pattern::Sequence { parts } => {
                for part in parts {
                    out.extend(part.collect_nodes());
                }
            }
            Pattern::Literal { .. } | Pattern::CharClass(_) | Pattern::Wildcard | Pattern::Anchor { .. } => {}
        }
        out
    }

    /// Check the §3 invariants that the mutator and driver must not violate.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Pattern::CharClass(cc) => !(cc.chars.is_empty() && cc.ranges.is_empty()),
            Pattern::Quantifier(q) => {
                let bounds_ok = match q.max {
                    Bound::Finite(max) => max >= q.min,
                    Bound::Infinite => true,
                };
                let child_not_anchor = !matches!(q.child, Pattern::Anchor { .. });
                bounds_ok && child_not_anchor && q.child.is_well_formed()
            }
            Pattern::Group(g) => g.child.is_well_formed(),
            Pattern::Alternation { alts } => !alts.is_empty() && alts.iter().all(Pattern::is_well_formed),
            Pattern::Sequence { parts } => !parts.is_empty() && parts.iter().all(Pattern::is_well_formed),
            Pattern::Literal { .. } | Pattern::Wildcard | Pattern::Anchor { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit_class() -> Pattern {
        Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false)
    }

    #[test]
    fn literal_complexity_is_char_count() {
        assert_eq!(Pattern::literal("abc").complexity(), 3);
    }

    #[test]
    fn char_class_complexity_counts_chars_and_ranges() {
        let cc = Pattern::char_class(['a', 'b'].into_iter().collect(), vec![('0', '9')], false);
        assert_eq!(cc.complexity(), 2 + 2 + 1);
    }

    #[test]
    fn quantifier_infinite_adds_extra_complexity() {
        let bounded = Pattern::quantifier(digit_class(), 1, Bound::Finite(3), false);
        let unbounded = Pattern::quantifier(digit_class(), 1, Bound::Infinite, false);
        assert_eq!(bounded.complexity(), digit_class().complexity() + 2);
        assert_eq!(unbounded.complexity(), digit_class().complexity() + 4);
    }

    #[test]
    fn clone_round_trips_serialize_and_complexity() {
        let p = Pattern::quantifier(
            Pattern::group(Pattern::literal("ab"), false, None),
            0,
            Bound::Infinite,
            false,
        );
        let cloned = p.clone();
        assert_eq!(p.serialize(), cloned.serialize());
        assert_eq!(p.complexity(), cloned.complexity());
    }

    #[test]
    fn empty_char_class_is_not_well_formed() {
        let cc = Pattern::char_class(BTreeSet::new(), vec![], false);
        assert!(!cc.is_well_formed());
    }

    #[test]
    fn quantified_anchor_is_not_well_formed() {
        let p = Pattern::quantifier(Pattern::anchor(AnchorKind::Start), 0, Bound::Infinite, false);
        assert!(!p.is_well_formed());
    }

    #[test]
    fn quantifier_max_below_min_is_not_well_formed() {
        let p = Pattern::quantifier(Pattern::literal("a"), 3, Bound::Finite(1), false);
        assert!(!p.is_well_formed());
    }

    #[test]
    fn collect_nodes_is_pre_order() {
        let p = Pattern::sequence(vec![Pattern::literal("a"), Pattern::literal("b")]);
        let nodes = p.collect_nodes();
        assert_eq!(nodes.len(), 3);
        assert!(matches!(nodes[0], Pattern::Sequence { .. }));
    }

    #[test]
    fn min_max_one_quantifier_serializes_as_bare_child() {
        let p = Pattern::quantifier(Pattern::literal("a"), 1, Bound::Finite(1), false);
        assert_eq!(p.serialize(), "a");
    }
}
