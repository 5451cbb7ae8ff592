//! Structural and domain analysis of a positive-example set, used to seed
//! the search with something better than a blind random pattern.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;

use crate::core::pattern::{Bound, Pattern};

/// What a position in the examples "looks like" (used to build the
/// per-position structure profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharKind {
    Digit,
    Lower,
    Upper,
    Alpha,
    Punct,
    Space,
    Other,
}

impl CharKind {
    fn of(ch: char) -> CharKind {
        if ch.is_ascii_digit() {
            CharKind::Digit
        } else if ch.is_ascii_lowercase() {
            CharKind::Lower
        } else if ch.is_ascii_uppercase() {
            CharKind::Upper
        } else if ch.is_alphabetic() {
            CharKind::Alpha
        } else if ch.is_ascii_punctuation() {
            CharKind::Punct
        } else if ch.is_whitespace() {
            CharKind::Space
        } else {
            CharKind::Other
        }
    }
}

/// A recognized domain shape, checked against every example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    Email,
    Url,
    Phone,
    DateIso,
    DateUs,
    Time,
    Ipv4,
    HexColor,
    Uuid,
    Digits,
    Letters,
    Alphanumeric,
    Identifier,
    Mixed,
    Unknown,
}

struct DomainEntry {
    kind: DomainKind,
    matcher: Regex,
}

fn domain_registry() -> Vec<DomainEntry> {
    let anchored = |pat: &str| Regex::new(&format!("^(?:{})$", pat)).expect("valid domain regex");
    vec![
        DomainEntry { kind: DomainKind::Email, matcher: anchored(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}") },
        DomainEntry { kind: DomainKind::Url, matcher: anchored(r"https?://[a-zA-Z0-9.-]+(?:\.[a-zA-Z]{2,})?(?:/.*)?") },
        DomainEntry { kind: DomainKind::Phone, matcher: anchored(r"\+?[\d\s\-\(\)]{7,}") },
        DomainEntry { kind: DomainKind::DateIso, matcher: anchored(r"\d{4}-\d{2}-\d{2}") },
        DomainEntry { kind: DomainKind::DateUs, matcher: anchored(r"\d{1,2}/\d{1,2}/\d{4}") },
        DomainEntry { kind: DomainKind::Time, matcher: anchored(r"\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp][Mm])?") },
        DomainEntry { kind: DomainKind::Ipv4, matcher: anchored(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}") },
        DomainEntry { kind: DomainKind::HexColor, matcher: anchored(r"#[0-9a-fA-F]{6}") },
        DomainEntry {
            kind: DomainKind::Uuid,
            matcher: anchored(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"),
        },
    ]
}

/// Structural report over a positive-example set.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub common_length: Option<usize>,
    pub length_range: (usize, usize),
    pub per_position_charset: BTreeMap<usize, BTreeSet<char>>,
    pub common_prefixes: Vec<String>,
    pub common_suffixes: Vec<String>,
    pub pattern_type: DomainKind,
    pub detected_structure: Vec<CharKind>,
}

pub fn analyze(examples: &[String]) -> AnalysisRecord {
    if examples.is_empty() {
        return AnalysisRecord {
            common_length: None,
            length_range: (0, 0),
            per_position_charset: BTreeMap::new(),
            common_prefixes: Vec::new(),
            common_suffixes: Vec::new(),
            pattern_type: DomainKind::Unknown,
            detected_structure: Vec::new(),
        };
    }

    let lengths: Vec<usize> = examples.iter().map(|e| e.chars().count()).collect();
    let length_range = (
        *lengths.iter().min().unwrap(),
        *lengths.iter().max().unwrap(),
    );
    let common_length = lengths.first().copied().filter(|first| lengths.iter().all(|l| l == first));

    AnalysisRecord {
        common_length,
        length_range,
        per_position_charset: build_per_position_charset(examples),
        common_prefixes: find_common_prefixes(examples),
        common_suffixes: find_common_suffixes(examples),
        pattern_type: detect_pattern_type(examples),
        detected_structure: analyze_structure(examples),
    }
}

/// Every character seen at each position, up to the longest example.
fn build_per_position_charset(examples: &[String]) -> BTreeMap<usize, BTreeSet<char>> {
    let mut charset: BTreeMap<usize, BTreeSet<char>> = BTreeMap::new();
    for example in examples {
        for (i, ch) in example.chars().enumerate() {
            charset.entry(i).or_default().insert(ch);
        }
    }
    charset
}

fn detect_pattern_type(examples: &[String]) -> DomainKind {
    for entry in domain_registry() {
        if examples.iter().all(|e| entry.matcher.is_match(e)) {
            return entry.kind;
        }
    }

    let all_chars: String = examples.concat();
    if all_chars.chars().all(|c| c.is_ascii_digit()) {
        DomainKind::Digits
    } else if all_chars.chars().all(|c| c.is_alphabetic()) {
        DomainKind::Letters
    } else if all_chars.chars().all(|c| c.is_alphanumeric()) {
        DomainKind::Alphanumeric
    } else if all_chars.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        DomainKind::Identifier
    } else {
        DomainKind::Mixed
    }
}

fn analyze_structure(examples: &[String]) -> Vec<CharKind> {
    if examples.is_empty() {
        return Vec::new();
    }

    let lengths: Vec<usize> = examples.iter().map(|e| e.chars().count()).collect();
    let target_length = mode(&lengths);

    let chars_per_example: Vec<Vec<char>> = examples.iter().map(|e| e.chars().collect()).collect();

    (0..target_length)
        .map(|pos| {
            let mut counts: HashMap<CharKind, usize> = HashMap::new();
            for chars in &chars_per_example {
                if let Some(&ch) = chars.get(pos) {
                    *counts.entry(CharKind::of(ch)).or_insert(0) += 1;
                }
            }
            counts
                .into_iter()
                .max_by_key(|(_, count)| *count)
                .map(|(kind, _)| kind)
                .unwrap_or(CharKind::Other)
        })
        .collect()
}

fn mode(values: &[usize]) -> usize {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(v, _)| v)
        .unwrap_or(0)
}

fn find_common_prefixes(examples: &[String]) -> Vec<String> {
    let mut prefixes = Vec::new();
    let min_len = examples.iter().map(|e| e.chars().count()).min().unwrap_or(0);
    let first: Vec<char> = examples[0].chars().collect();

    for i in 1..=min_len {
        let prefix: String = first[..i].iter().collect();
        if examples.iter().all(|e| e.starts_with(&prefix)) {
            prefixes.push(prefix);
        } else {
            break;
        }
    }
    prefixes
}

fn find_common_suffixes(examples: &[String]) -> Vec<String> {
    let mut suffixes = Vec::new();
    let min_len = examples.iter().map(|e| e.chars().count()).min().unwrap_or(0);
    let first: Vec<char> = examples[0].chars().collect();
    let first_len = first.len();

    for i in 1..=min_len {
        let suffix: String = first[first_len - i..].iter().collect();
        if examples.iter().all(|e| e.ends_with(&suffix)) {
            suffixes.push(suffix);
        } else {
            break;
        }
    }
    suffixes
}

fn digit_class() -> Pattern {
    Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false)
}

fn lower_class() -> Pattern {
    Pattern::char_class(BTreeSet::new(), vec![('a', 'z')], false)
}

fn upper_class() -> Pattern {
    Pattern::char_class(BTreeSet::new(), vec![('A', 'Z')], false)
}

fn alpha_class() -> Pattern {
    Pattern::char_class(BTreeSet::new(), vec![('a', 'z'), ('A', 'Z')], false)
}

fn alnum_class() -> Pattern {
    Pattern::char_class(BTreeSet::new(), vec![('a', 'z'), ('A', 'Z'), ('0', '9')], false)
}

fn bounded(child: Pattern, min: u32, max: u32) -> Pattern {
    Pattern::quantifier(child, min, Bound::Finite(max), false)
}

fn one_or_more(child: Pattern) -> Pattern {
    Pattern::quantifier(child, 1, Bound::Infinite, false)
}

fn maybe(child: Pattern) -> Pattern {
    Pattern::quantifier(child, 0, Bound::Finite(1), false)
}

/// Hand-built seed pattern for a recognized domain. These are written
/// directly as `Pattern` trees rather than parsed from a template string,
/// since a template-string round trip would have to re-derive exactly
/// what's being built here anyway.
fn domain_seed(kind: DomainKind) -> Option<Pattern> {
    let local_part = one_or_more(Pattern::char_class(
        ['.', '_', '%', '+', '-'].into_iter().collect(),
        vec![('a', 'z'), ('A', 'Z'), ('0', '9')],
        false,
    ));
    let domain_part = one_or_more(Pattern::char_class(
        ['.', '-'].into_iter().collect(),
        vec![('a', 'z'), ('A', 'Z'), ('0', '9')],
        false,
    ));

    Some(match kind {
        DomainKind::Email => Pattern::sequence(vec![
            local_part,
            Pattern::literal("@"),
            domain_part,
            Pattern::literal("."),
            bounded(alpha_class(), 2, 10),
        ]),
        DomainKind::Url => Pattern::sequence(vec![
            Pattern::literal("http"),
            maybe(Pattern::literal("s")),
            Pattern::literal("://"),
            one_or_more(Pattern::char_class(
                ['.', '-'].into_iter().collect(),
                vec![('a', 'z'), ('A', 'Z'), ('0', '9')],
                false,
            )),
        ]),
        DomainKind::Phone => Pattern::sequence(vec![
            maybe(Pattern::literal("+")),
            bounded(
                Pattern::char_class(
                    [' ', '-', '(', ')'].into_iter().collect(),
                    vec![('0', '9')],
                    false,
                ),
                7,
                20,
            ),
        ]),
        DomainKind::DateIso => Pattern::sequence(vec![
            bounded(digit_class(), 4, 4),
            Pattern::literal("-"),
            bounded(digit_class(), 2, 2),
            Pattern::literal("-"),
            bounded(digit_class(), 2, 2),
        ]),
        DomainKind::DateUs => Pattern::sequence(vec![
            bounded(digit_class(), 1, 2),
            Pattern::literal("/"),
            bounded(digit_class(), 1, 2),
            Pattern::literal("/"),
            bounded(digit_class(), 4, 4),
        ]),
        DomainKind::Time => Pattern::sequence(vec![
            bounded(digit_class(), 1, 2),
            Pattern::literal(":"),
            bounded(digit_class(), 2, 2),
            maybe(Pattern::sequence(vec![Pattern::literal(":"), bounded(digit_class(), 2, 2)])),
            maybe(Pattern::sequence(vec![
                maybe(Pattern::literal(" ")),
                Pattern::char_class(['a', 'A', 'p', 'P'].into_iter().collect(), vec![], false),
                Pattern::char_class(['m', 'M'].into_iter().collect(), vec![], false),
            ])),
        ]),
        DomainKind::Ipv4 => {
            let octet = bounded(digit_class(), 1, 3);
            Pattern::sequence(vec![
                octet.clone(),
                Pattern::literal("."),
                octet.clone(),
                Pattern::literal("."),
                octet.clone(),
                Pattern::literal("."),
                octet,
            ])
        }
        DomainKind::HexColor => Pattern::sequence(vec![
            Pattern::literal("#"),
            bounded(Pattern::char_class(BTreeSet::new(), vec![('0', '9'), ('a', 'f'), ('A', 'F')], false), 6, 6),
        ]),
        DomainKind::Uuid => {
            let hex = |n: u32| bounded(Pattern::char_class(BTreeSet::new(), vec![('0', '9'), ('a', 'f'), ('A', 'F')], false), n, n);
            Pattern::sequence(vec![
                hex(8),
                Pattern::literal("-"),
                hex(4),
                Pattern::literal("-"),
                hex(4),
                Pattern::literal("-"),
                hex(4),
                Pattern::literal("-"),
                hex(12),
            ])
        }
        DomainKind::Digits => one_or_more(digit_class()),
        DomainKind::Letters => one_or_more(alpha_class()),
        DomainKind::Alphanumeric => one_or_more(alnum_class()),
        DomainKind::Identifier | DomainKind::Mixed | DomainKind::Unknown => return None,
    })
}

fn class_for_kind(kind: CharKind) -> Pattern {
    match kind {
        CharKind::Digit => digit_class(),
        CharKind::Lower => lower_class(),
        CharKind::Upper => upper_class(),
        CharKind::Alpha => alpha_class(),
        _ => Pattern::wildcard(),
    }
}

/// Structure-based fallback: a single character-class/quantifier built
/// from the dominant per-position character kind, used when no domain
/// template matches.
fn structure_based_seed(analysis: &AnalysisRecord) -> Pattern {
    if analysis.detected_structure.is_empty() {
        return Pattern::literal("");
    }

    let structure = &analysis.detected_structure;
    let all_same = structure.windows(2).all(|w| w[0] == w[1]);

    let dominant_kind = if all_same {
        structure[0]
    } else {
        let mut counts: HashMap<CharKind, usize> = HashMap::new();
        for &k in structure {
            *counts.entry(k).or_insert(0) += 1;
        }
        counts.into_iter().max_by_key(|(_, c)| *c).map(|(k, _)| k).unwrap()
    };

    let base_class = class_for_kind(dominant_kind);

    match analysis.common_length {
        Some(1) => base_class,
        Some(len) => bounded(base_class, len as u32, len as u32),
        None if all_same => Pattern::quantifier(
            base_class,
            analysis.length_range.0 as u32,
            Bound::Finite(analysis.length_range.1 as u32),
            false,
        ),
        None => one_or_more(base_class),
    }
}

/// Build an initial candidate pattern from an `AnalysisRecord`: a
/// domain-specific template if one matched, otherwise a structural guess.
pub fn seed(analysis: &AnalysisRecord) -> Pattern {
    domain_seed(analysis.pattern_type).unwrap_or_else(|| structure_based_seed(analysis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_all_digit_examples() {
        let examples = vec!["123".to_string(), "456".to_string()];
        let analysis = analyze(&examples);
        assert_eq!(analysis.pattern_type, DomainKind::Digits);
    }

    #[test]
    fn detects_email_domain() {
        let examples = vec!["a@b.com".to_string(), "c.d@e.org".to_string()];
        let analysis = analyze(&examples);
        assert_eq!(analysis.pattern_type, DomainKind::Email);
    }

    #[test]
    fn detects_ipv4_domain() {
        let examples = vec!["1.2.3.4".to_string(), "255.255.0.1".to_string()];
        let analysis = analyze(&examples);
        assert_eq!(analysis.pattern_type, DomainKind::Ipv4);
    }

    #[test]
    fn common_length_is_none_for_varying_lengths() {
        let examples = vec!["a".to_string(), "ab".to_string()];
        let analysis = analyze(&examples);
        assert_eq!(analysis.common_length, None);
        assert_eq!(analysis.length_range, (1, 2));
    }

    #[test]
    fn common_prefix_and_suffix_detected() {
        let examples = vec!["test_a_end".to_string(), "test_b_end".to_string()];
        let analysis = analyze(&examples);
        assert!(analysis.common_prefixes.contains(&"test_".to_string()));
        assert!(analysis.common_suffixes.contains(&"_end".to_string()));
    }

    #[test]
    fn seed_for_digits_matches_all_examples() {
        let examples = vec!["123".to_string(), "4".to_string(), "56789".to_string()];
        let analysis = analyze(&examples);
        let pattern = seed(&analysis);
        let compiled = Regex::new(&format!("^(?:{})$", pattern.serialize())).unwrap();
        for ex in &examples {
            assert!(compiled.is_match(ex), "seed should match {ex}");
        }
    }

    #[test]
    fn seed_for_ipv4_matches_examples() {
        let examples = vec!["1.2.3.4".to_string(), "192.168.0.1".to_string()];
        let analysis = analyze(&examples);
        let pattern = seed(&analysis);
        let compiled = Regex::new(&format!("^(?:{})$", pattern.serialize())).unwrap();
        for ex in &examples {
            assert!(compiled.is_match(ex), "seed should match {ex}");
        }
    }
}
