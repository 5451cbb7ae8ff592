//! PCRE2-subset emitter, turns a `Pattern` IR tree into standard regex
//! syntax (literals, character classes, anchors, quantifiers, groups,
//! alternation; no lookaround, no backreferences).

use crate::core::pattern::{AnchorKind, Bound, CharClass, Pattern};

/// Emit a `Pattern` tree as a regex string.
pub fn emit(node: &Pattern) -> String {
    match node {
        Pattern::Literal { text } => regex::escape(text),
        Pattern::Wildcard => ".".to_string(),
        Pattern::Anchor { at } => emit_anchor(*at).to_string(),
        Pattern::CharClass(cc) => emit_char_class(cc),
        Pattern::Sequence { parts } => parts.iter().map(emit).collect::<Vec<_>>().join(""),
        Pattern::Alternation { alts } => alts.iter().map(emit).collect::<Vec<_>>().join("|"),
        Pattern::Quantifier(q) => {
            let child = emit_wrapped_for_quantifier(&q.child);

            // Boundary behavior: min == max == 1 is the bare child, no
            // quantifier suffix at all.
            if q.min == 1 && matches!(q.max, Bound::Finite(1)) {
                return child;
            }

            let suffix = match (q.min, q.max) {
                (0, Bound::Finite(1)) => "?".to_string(),
                (0, Bound::Infinite) => "*".to_string(),
                (1, Bound::Infinite) => "+".to_string(),
                (min, Bound::Infinite) => format!("{{{},}}", min),
                (min, Bound::Finite(max)) if min == max => format!("{{{}}}", min),
                (min, Bound::Finite(max)) => format!("{{{},{}}}", min, max),
            };

            let lazy_suffix = if q.lazy { "?" } else { "" };
            format!("{}{}{}", child, suffix, lazy_suffix)
        }
        Pattern::Group(g) => {
            let body = emit(&g.child);
            if let Some(name) = &g.name {
                format!("(?P<{}>{})", name, body)
            } else if g.capturing {
                format!("({})", body)
            } else {
                format!("(?:{})", body)
            }
        }
    }
}

/// Wrap a quantifier's child in a non-capturing group when serializing it
/// bare would be ambiguous: alternation, multi-part sequence, another
/// quantifier, or a multi-character literal.
fn emit_wrapped_for_quantifier(child: &Pattern) -> String {
    let needs_wrap = match child {
        Pattern::Alternation { .. } => true,
        Pattern::Sequence { parts } => parts.len() > 1,
        Pattern::Quantifier(_) => true,
        Pattern::Literal { text } => text.chars().count() > 1,
        _ => false,
    };

    let body = emit(child);
    if needs_wrap {
        format!("(?:{})", body)
    } else {
        body
    }
}

fn emit_anchor(kind: AnchorKind) -> &'static str {
    match kind {
        AnchorKind::Start => "^",
        AnchorKind::End => "$",
        AnchorKind::WordBoundary => "\\b",
        AnchorKind::NotWordBoundary => "\\B",
    }
}

fn emit_char_class(cc: &CharClass) -> String {
    let mut body = String::new();
    if cc.negated {
        body.push('^');
    }

    for ch in &cc.chars {
        body.push_str(&escape_class_char(*ch));
    }

    for (start, end) in &cc.ranges {
        body.push_str(&escape_class_char(*start));
        body.push('-');
        body.push_str(&escape_class_char(*end));
    }

    format!("[{}]", body)
}

/// Escape a single character for use inside `[...]`. Escaping `\`, `]`,
/// `^`, and `-` unconditionally is always correct inside a class, so we
/// don't need to track position to decide whether escaping is required.
fn escape_class_char(ch: char) -> String {
    match ch {
        '\\' | ']' | '^' | '-' => format!("\\{}", ch),
        _ => ch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn emit_literal_escapes_metacharacters() {
        let p = Pattern::literal("a.b*c");
        assert_eq!(emit(&p), "a\\.b\\*c");
    }

    #[test]
    fn emit_char_class_sorts_and_escapes() {
        let chars: BTreeSet<char> = ['c', 'a', ']', 'b'].into_iter().collect();
        let p = Pattern::char_class(chars, vec![], false);
        assert_eq!(emit(&p), "[ab\\]c]");
    }

    #[test]
    fn emit_negated_char_class() {
        let chars: BTreeSet<char> = ['a'].into_iter().collect();
        let p = Pattern::char_class(chars, vec![], true);
        assert_eq!(emit(&p), "[^a]");
    }

    #[test]
    fn emit_range() {
        let p = Pattern::char_class(BTreeSet::new(), vec![('a', 'z')], false);
        assert_eq!(emit(&p), "[a-z]");
    }

    #[test]
    fn quantifier_wraps_alternation_child() {
        let alt = Pattern::alternation(vec![Pattern::literal("a"), Pattern::literal("b")]);
        let q = Pattern::quantifier(alt, 0, Bound::Infinite, false);
        assert_eq!(emit(&q), "(?:a|b)*");
    }

    #[test]
    fn quantifier_wraps_nested_quantifier() {
        let inner = Pattern::quantifier(Pattern::literal("a"), 0, Bound::Infinite, false);
        let outer = Pattern::quantifier(inner, 1, Bound::Infinite, false);
        assert_eq!(emit(&outer), "(?:a*)+");
    }

    #[test]
    fn quantifier_wraps_multichar_literal() {
        let q = Pattern::quantifier(Pattern::literal("ab"), 1, Bound::Infinite, false);
        assert_eq!(emit(&q), "(?:ab)+");
    }

    #[test]
    fn lazy_quantifier_appends_extra_question_mark() {
        let q = Pattern::quantifier(Pattern::literal("a"), 0, Bound::Infinite, true);
        assert_eq!(emit(&q), "a*?");
    }

    #[test]
    fn min_max_one_quantifier_has_no_suffix() {
        let q = Pattern::quantifier(Pattern::literal("a"), 1, Bound::Finite(1), false);
        assert_eq!(emit(&q), "a");
    }

    #[test]
    fn named_group_uses_pcre_syntax() {
        let g = Pattern::group(Pattern::literal("a"), true, Some("word".to_string()));
        assert_eq!(emit(&g), "(?P<word>a)");
    }

    #[test]
    fn non_capturing_group() {
        let g = Pattern::group(Pattern::literal("a"), false, None);
        assert_eq!(emit(&g), "(?:a)");
    }

    #[test]
    fn sequence_concatenates_parts() {
        let s = Pattern::sequence(vec![Pattern::literal("a"), Pattern::literal("b")]);
        assert_eq!(emit(&s), "ab");
    }
}
