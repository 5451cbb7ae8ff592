//! Multi-criteria fitness evaluation: how well does a candidate pattern
//! match the examples, and how cheap is it to read and to run.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::pattern::Pattern;
use crate::core::timeout::run_with_deadline;
use std::time::{Duration, Instant};

const MAX_REASONABLE_COMPLEXITY: f64 = 100.0;
const PERF_SAMPLE_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMode {
    Minimal,
    Readable,
    Balanced,
}

/// Outcome of scoring one candidate against the example sets.
#[derive(Debug, Clone)]
pub struct FitnessResult {
    pub total_score: f64,
    pub correctness_score: f64,
    pub complexity_score: f64,
    pub readability_score: f64,
    pub performance_score: f64,
    pub positive_matches: usize,
    pub negative_matches: usize,
    pub positive_total: usize,
    pub negative_total: usize,
    pub evaluation_time_ms: f64,
    pub timeout_occurred: bool,
    pub compilation_error: Option<String>,
}

impl FitnessResult {
    fn compilation_failure(positive_total: usize, negative_total: usize, error: String) -> FitnessResult {
        FitnessResult {
            total_score: 0.0,
            correctness_score: 0.0,
            complexity_score: 0.0,
            readability_score: 0.0,
            performance_score: 0.0,
            positive_matches: 0,
            negative_matches: 0,
            positive_total,
            negative_total,
            evaluation_time_ms: 0.0,
            timeout_occurred: false,
            compilation_error: Some(error),
        }
    }
}

/// Weighted combination of correctness/complexity/readability/performance.
pub struct MultiCriteriaScorer {
    pub correctness_weight: f64,
    pub complexity_weight: f64,
    pub readability_weight: f64,
    pub performance_weight: f64,
    pub perf_timeout: Duration,
}

impl MultiCriteriaScorer {
    pub fn new(mode: ScoringMode) -> MultiCriteriaScorer {
        let (correctness, complexity, readability, performance) = match mode {
            ScoringMode::Minimal => (0.6, 0.3, 0.05, 0.05),
            ScoringMode::Readable => (0.5, 0.1, 0.3, 0.1),
            ScoringMode::Balanced => (0.5, 0.2, 0.2, 0.1),
        };
        MultiCriteriaScorer::with_weights(correctness, complexity, readability, performance)
    }

    pub fn with_weights(
        correctness_weight: f64,
        complexity_weight: f64,
        readability_weight: f64,
        performance_weight: f64,
    ) -> MultiCriteriaScorer {
        let total = correctness_weight + complexity_weight + readability_weight + performance_weight;
        MultiCriteriaScorer {
            correctness_weight: correctness_weight / total,
            complexity_weight: complexity_weight / total,
            readability_weight: readability_weight / total,
            performance_weight: performance_weight / total,
            perf_timeout: Duration::from_secs(1),
        }
    }

    pub fn score(
        &self,
        pattern: &Pattern,
        positive_examples: &[String],
        negative_examples: &[String],
    ) -> FitnessResult {
        let start = Instant::now();
        let regex_str = pattern.serialize();

        let compiled = match Regex::new(&format!("^(?:{})$", regex_str)) {
            Ok(re) => re,
            Err(e) => {
                return FitnessResult::compilation_failure(
                    positive_examples.len(),
                    negative_examples.len(),
                    e.to_string(),
                )
            }
        };

        let (correctness_score, positive_matches, negative_matches) =
            self.evaluate_correctness(&compiled, positive_examples, negative_examples);

        let complexity_score = self.evaluate_complexity(pattern);
        let readability_score = self.evaluate_readability(pattern, &regex_str);
        let (performance_score, timeout_occurred) =
            self.evaluate_performance(&compiled, positive_examples, negative_examples);

        let total_score = self.correctness_weight * correctness_score
            + self.complexity_weight * complexity_score
            + self.readability_weight * readability_score
            + self.performance_weight * performance_score;

        FitnessResult {
            total_score,
            correctness_score,
            complexity_score,
            readability_score,
            performance_score,
            positive_matches,
            negative_matches,
            positive_total: positive_examples.len(),
            negative_total: negative_examples.len(),
            evaluation_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            timeout_occurred,
            compilation_error: None,
        }
    }

    fn evaluate_correctness(
        &self,
        compiled: &Regex,
        positive_examples: &[String],
        negative_examples: &[String],
    ) -> (f64, usize, usize) {
        let positive_matches = positive_examples.iter().filter(|e| compiled.is_match(e)).count();
        let negative_matches = negative_examples.iter().filter(|e| !compiled.is_match(e)).count();

        let total_positive = positive_examples.len();
        let total_negative = negative_examples.len();

        let score = if total_positive == 0 && total_negative == 0 {
            1.0
        } else if total_positive == 0 {
            negative_matches as f64 / total_negative as f64
        } else if total_negative == 0 {
            positive_matches as f64 / total_positive as f64
        } else {
            let positive_ratio = positive_matches as f64 / total_positive as f64;
            let negative_ratio = negative_matches as f64 / total_negative as f64;
            let mut score = 0.8 * positive_ratio + 0.2 * negative_ratio;
            if positive_matches == 0 {
                score *= 0.1;
            }
            score
        };

        (score, positive_matches, negative_matches)
    }

    fn evaluate_complexity(&self, pattern: &Pattern) -> f64 {
        let normalized = pattern.complexity() as f64 / MAX_REASONABLE_COMPLEXITY;
        1.0 / (1.0 + normalized)
    }

    fn evaluate_readability(&self, pattern: &Pattern, regex_str: &str) -> f64 {
        let mut score = 1.0_f64;

        let nesting_depth = nesting_depth(pattern);
        if nesting_depth > 3 {
            score *= 0.8_f64.powi((nesting_depth - 3) as i32);
        }

        let len = regex_str.chars().count();
        if len > 50 {
            score *= 0.9_f64.powf((len - 50) as f64 / 10.0);
        }

        let complex_quantifier_count = regex_str.matches('{').count();
        if complex_quantifier_count > 2 {
            score *= 0.95_f64.powi((complex_quantifier_count - 2) as i32);
        }

        let alternation_count = regex_str.matches('|').count();
        if alternation_count > 3 {
            score *= 0.9_f64.powi((alternation_count - 3) as i32);
        }

        score.clamp(0.0, 1.0)
    }

    fn evaluate_performance(
        &self,
        compiled: &Regex,
        positive_examples: &[String],
        negative_examples: &[String],
    ) -> (f64, bool) {
        let sample: Vec<String> = positive_examples
            .iter()
            .chain(negative_examples.iter())
            .take(PERF_SAMPLE_CAP)
            .cloned()
            .collect();

        if sample.is_empty() {
            return (1.0, false);
        }

        let worker_pattern = compiled.clone();
        let deadline = self.perf_timeout;
        let outcome = run_with_deadline(deadline, move || {
            let start = Instant::now();
            for s in &sample {
                let _ = worker_pattern.is_match(s);
                let _ = worker_pattern.find(s);
            }
            start.elapsed()
        });

        match outcome {
            None => (0.0, true),
            Some(elapsed) => {
                let max_acceptable = deadline.as_secs_f64() / 2.0;
                let normalized = elapsed.as_secs_f64() / max_acceptable;
                (1.0 / (1.0 + normalized), false)
            }
        }
    }
}

fn nesting_depth(pattern: &Pattern) -> u32 {
    match pattern {
        Pattern::Quantifier(q) => 1 + nesting_depth(&q.child),
        Pattern::Group(g) => 1 + nesting_depth(&g.child),
        Pattern::Alternation { alts } => alts.iter().map(nesting_depth).max().unwrap_or(0),
        Pattern::Sequence { parts } => parts.iter().map(nesting_depth).max().unwrap_or(0),
        Pattern::Literal { .. } | Pattern::CharClass(_) | Pattern::Wildcard | Pattern::Anchor { .. } => 0,
    }
}
