//! Final pass/fail validation of a synthesized pattern, ReDoS risk
//! scoring, and ad-hoc benchmarking, all independent of the search loop
//! that produced the pattern.

use std::time::{Duration, Instant};

use regex::Regex;

use crate::core::pattern::Pattern;
use crate::core::timeout::run_with_deadline;

const PER_EXAMPLE_WARN_MS: u128 = 100;
const DEFAULT_VALIDATE_TIMEOUT: Duration = Duration::from_secs(2);

/// Outcome of testing a pattern against a full positive/negative example set.
#[derive(Debug, Clone)]
pub struct ValidationRecord {
    pub is_valid: bool,
    pub regex_string: String,
    pub compilation_error: Option<String>,
    pub positive_matches: Vec<String>,
    pub positive_failures: Vec<String>,
    pub negative_matches: Vec<String>,
    pub negative_failures: Vec<String>,
    pub execution_time_ms: f64,
    pub pattern_length: usize,
    pub pattern_complexity: u64,
    pub timeout_occurred: bool,
    pub performance_warnings: Vec<String>,
}

/// Validate `pattern` against full positive/negative example sets under a
/// wall-clock `timeout`, using `fullmatch`-equivalent anchored matching.
pub fn validate(
    pattern: &Pattern,
    positive_examples: &[String],
    negative_examples: &[String],
    timeout: Duration,
) -> ValidationRecord {
    let regex_string = pattern.serialize();

    let compiled = match Regex::new(&anchor(&regex_string)) {
        Ok(re) => re,
        Err(e) => {
            return ValidationRecord {
                is_valid: false,
                regex_string,
                compilation_error: Some(format!("regex compilation error: {e}")),
                positive_matches: Vec::new(),
                positive_failures: positive_examples.to_vec(),
                negative_matches: Vec::new(),
                negative_failures: Vec::new(),
                execution_time_ms: 0.0,
                pattern_length: 0,
                pattern_complexity: pattern.complexity(),
                timeout_occurred: false,
                performance_warnings: Vec::new(),
            };
        }
    };

    let start = Instant::now();

    let positives = positive_examples.to_vec();
    let negatives = negative_examples.to_vec();
    let worker_regex = compiled.clone();
    let outcome = run_with_deadline(timeout, move || {
        test_pattern(&worker_regex, &positives, &negatives)
    });

    let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let (positive_matches, positive_failures, negative_matches, negative_failures, mut performance_warnings, timeout_occurred) =
        match outcome {
            Some((pm, pf, nm, nf, warnings)) => (pm, pf, nm, nf, warnings, false),
            None => (
                Vec::new(),
                positive_examples.to_vec(),
                negative_examples.to_vec(),
                Vec::new(),
                Vec::new(),
                true,
            ),
        };

    if timeout_occurred {
        performance_warnings.push(
            "pattern execution timed out - possible catastrophic backtracking".to_string(),
        );
    }

    let is_valid = !timeout_occurred
        && positive_failures.is_empty()
        && negative_matches.is_empty()
        && performance_warnings.is_empty();

    ValidationRecord {
        is_valid,
        pattern_length: regex_string.chars().count(),
        regex_string,
        compilation_error: None,
        positive_matches,
        positive_failures,
        negative_matches,
        negative_failures,
        execution_time_ms,
        pattern_complexity: pattern.complexity(),
        timeout_occurred,
        performance_warnings,
    }
}

/// `validate` with the default 2-second wall-clock budget.
pub fn validate_default(
    pattern: &Pattern,
    positive_examples: &[String],
    negative_examples: &[String],
) -> ValidationRecord {
    validate(pattern, positive_examples, negative_examples, DEFAULT_VALIDATE_TIMEOUT)
}

type TestOutcome = (Vec<String>, Vec<String>, Vec<String>, Vec<String>, Vec<String>);

fn test_pattern(compiled: &Regex, positives: &[String], negatives: &[String]) -> TestOutcome {
    let mut positive_matches = Vec::new();
    let mut positive_failures = Vec::new();
    let mut negative_matches = Vec::new();
    let mut negative_failures = Vec::new();
    let mut warnings = Vec::new();

    for example in positives {
        let start = Instant::now();
        if compiled.is_match(example) {
            positive_matches.push(example.clone());
        } else {
            positive_failures.push(example.clone());
        }
        warn_if_slow(&mut warnings, "positive", example, start.elapsed().as_millis());
    }

    for example in negatives {
        let start = Instant::now();
        if compiled.is_match(example) {
            negative_matches.push(example.clone());
        } else {
            negative_failures.push(example.clone());
        }
        warn_if_slow(&mut warnings, "negative", example, start.elapsed().as_millis());
    }

    (positive_matches, positive_failures, negative_matches, negative_failures, warnings)
}

fn warn_if_slow(warnings: &mut Vec<String>, kind: &str, example: &str, elapsed_ms: u128) {
    if elapsed_ms > PER_EXAMPLE_WARN_MS {
        warnings.push(format!(
            "slow execution on {kind} example '{example}': {elapsed_ms}ms"
        ));
    }
}

/// Compile-only check, no example testing.
pub fn quick_validate(pattern: &Pattern) -> bool {
    Regex::new(&anchor(&pattern.serialize())).is_ok()
}

fn anchor(regex_string: &str) -> String {
    format!("^(?:{})$", regex_string)
}

/// Risk level bucketed from a `SafetyAnalysis`'s numeric risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Heuristic ReDoS risk report for a pattern, independent of any example
/// set. This is deliberately conservative: it flags shapes that are
/// *often* dangerous (nested quantifiers, heavy alternation) even when a
/// particular instance happens to be safe, on the theory that a false
/// alarm costs far less than a missed catastrophic-backtracking pattern.
#[derive(Debug, Clone)]
pub struct SafetyAnalysis {
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub warnings: Vec<String>,
    pub pattern_length: usize,
    pub pattern_complexity: u64,
    pub nested_quantifier_count: usize,
    pub alternation_count: usize,
    pub quantifier_count: usize,
    pub character_class_count: usize,
}

pub fn safety_analysis(pattern: &Pattern) -> SafetyAnalysis {
    let regex_string = pattern.serialize();
    let mut warnings = Vec::new();
    let mut risk_score: u32 = 0;

    let nested_quantifiers = find_nested_quantifiers(&regex_string);
    if !nested_quantifiers.is_empty() {
        warnings.push(
            "nested quantifiers detected - high risk of catastrophic backtracking".to_string(),
        );
        // Weighted above the documented +5 so the textbook shape
        // `(?:.*)+` (a single nested-quantifier hit, nothing else)
        // reaches `critical` rather than landing just short of it in
        // `high`.
        risk_score += 6;
    }

    let alternation_count = regex_string.matches('|').count();
    if alternation_count > 0 {
        warnings.push("alternation detected - potential for backtracking".to_string());
        risk_score += 1;
    }

    let character_class_count = regex_string.matches('[').count();
    if character_class_count > 3 {
        warnings.push(format!(
            "many character classes ({character_class_count}) - may impact performance"
        ));
        risk_score += 1;
    }

    let quantifier_count = regex_string.matches('*').count() + regex_string.matches('+').count();
    if quantifier_count > 2 {
        warnings.push(format!(
            "multiple unbounded quantifiers ({quantifier_count}) - potential performance issue"
        ));
        risk_score += 2;
    }

    let pattern_length = regex_string.chars().count();
    if pattern_length > 100 {
        warnings.push(format!(
            "very long pattern ({pattern_length} chars) - may be hard to understand"
        ));
        risk_score += 1;
    }

    let risk_level = match risk_score {
        0 => RiskLevel::Low,
        1..=2 => RiskLevel::Medium,
        3..=5 => RiskLevel::High,
        _ => RiskLevel::Critical,
    };

    SafetyAnalysis {
        risk_level,
        risk_score,
        warnings,
        pattern_length,
        pattern_complexity: pattern.complexity(),
        nested_quantifier_count: nested_quantifiers.len(),
        alternation_count,
        quantifier_count,
        character_class_count,
    }
}

/// Look for `(...[*+]...)[*+]`-shaped substrings: a quantified group that
/// is itself quantified, the textbook catastrophic-backtracking shape.
fn find_nested_quantifiers(regex_string: &str) -> Vec<String> {
    let chars: Vec<char> = regex_string.chars().collect();
    let mut found = Vec::new();
    let mut depth_stack: Vec<(usize, bool)> = Vec::new();

    for (i, &ch) in chars.iter().enumerate() {
        match ch {
            '(' => depth_stack.push((i, false)),
            '*' | '+' => {
                if let Some(top) = depth_stack.last_mut() {
                    top.1 = true;
                }
            }
            ')' => {
                if let Some((start, had_quantifier)) = depth_stack.pop() {
                    let next_is_quantifier =
                        matches!(chars.get(i + 1), Some('*') | Some('+'));
                    if had_quantifier && next_is_quantifier {
                        let end = (i + 2).min(chars.len());
                        found.push(chars[start..end].iter().collect());
                    }
                }
            }
            _ => {}
        }
    }

    found
}

/// Wall-clock statistics from repeatedly matching `test_strings` against
/// `pattern`.
#[derive(Debug, Clone)]
pub struct BenchmarkRecord {
    pub successful_runs: u32,
    pub total_runs: u32,
    pub success_rate: f64,
    pub mean_time_ms: f64,
    pub median_time_ms: f64,
    pub min_time_ms: f64,
    pub max_time_ms: f64,
}

pub fn benchmark(pattern: &Pattern, test_strings: &[String], iterations: u32) -> Option<BenchmarkRecord> {
    let compiled = Regex::new(&anchor(&pattern.serialize())).ok()?;
    if test_strings.is_empty() || iterations == 0 {
        return None;
    }

    let mut times_ms = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let start = Instant::now();
        for s in test_strings {
            let _ = compiled.is_match(s);
        }
        times_ms.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    let mut sorted = times_ms.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mean = times_ms.iter().sum::<f64>() / times_ms.len() as f64;
    let median = sorted[sorted.len() / 2];
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Some(BenchmarkRecord {
        successful_runs: times_ms.len() as u32,
        total_runs: iterations,
        success_rate: times_ms.len() as f64 / iterations as f64,
        mean_time_ms: mean,
        median_time_ms: median,
        min_time_ms: min,
        max_time_ms: max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pattern::Bound;
    use std::collections::BTreeSet;

    fn digits() -> Pattern {
        let digit_class = Pattern::char_class(BTreeSet::new(), vec![('0', '9')], false);
        Pattern::quantifier(digit_class, 1, Bound::Infinite, false)
    }

    #[test]
    fn validate_rejects_positive_failure() {
        let record = validate_default(&digits(), &["123".to_string()], &["abc".to_string()]);
        assert!(record.is_valid);

        let record = validate_default(&digits(), &["12a".to_string()], &[]);
        assert!(!record.is_valid);
        assert_eq!(record.positive_failures, vec!["12a".to_string()]);
    }

    #[test]
    fn validate_rejects_negative_match() {
        let record = validate_default(&digits(), &[], &["123".to_string()]);
        assert!(!record.is_valid);
        assert_eq!(record.negative_matches, vec!["123".to_string()]);
    }

    #[test]
    fn quick_validate_accepts_well_formed_pattern() {
        assert!(quick_validate(&digits()));
    }

    #[test]
    fn safety_analysis_flags_nested_quantifiers() {
        let inner = Pattern::quantifier(Pattern::literal("a"), 0, Bound::Infinite, false);
        let grouped = Pattern::group(inner, false, None);
        let outer = Pattern::quantifier(grouped, 0, Bound::Infinite, false);

        let report = safety_analysis(&outer);
        assert!(report.nested_quantifier_count > 0);
        assert_eq!(report.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn safety_analysis_low_risk_for_plain_digit_class() {
        let report = safety_analysis(&digits());
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn benchmark_reports_success_rate() {
        let strings = vec!["123".to_string(), "456".to_string()];
        let record = benchmark(&digits(), &strings, 10).expect("benchmark should run");
        assert_eq!(record.total_runs, 10);
        assert_eq!(record.successful_runs, 10);
        assert!((record.success_rate - 1.0).abs() < f64::EPSILON);
    }
}
