//! Simulated-annealing driver: the main search loop over the mutator,
//! scheduler, and fitness evaluator.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::errors::SynthesisError;
use crate::core::fitness::{FitnessResult, MultiCriteriaScorer};
use crate::core::mutator::Mutator;
use crate::core::pattern::Pattern;
use crate::core::scheduler::{CoolingSchedule, Scheduler};

const PERFECT_SCORE_THRESHOLD: f64 = 0.999;

#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub max_iterations: u32,
    pub max_no_improvement: u32,
    pub cooling_schedule: CoolingSchedule,
    pub mutation_rate: f64,
    pub max_complexity: u64,
    pub seed: u64,
    pub timeout: Option<Duration>,
}

impl Default for OptimizeConfig {
    fn default() -> OptimizeConfig {
        OptimizeConfig {
            initial_temperature: 10.0,
            final_temperature: 0.01,
            max_iterations: 1000,
            max_no_improvement: 150,
            cooling_schedule: CoolingSchedule::Adaptive,
            mutation_rate: 0.15,
            max_complexity: 50,
            seed: 0,
            timeout: None,
        }
    }
}

impl OptimizeConfig {
    /// Reject configs that can never produce a sensible run, rather than
    /// let them silently degrade into a no-op search.
    fn validate(&self) -> Result<(), SynthesisError> {
        if self.final_temperature >= self.initial_temperature {
            return Err(SynthesisError::InvalidConfig {
                reason: format!(
                    "final_temperature ({}) must be less than initial_temperature ({})",
                    self.final_temperature, self.initial_temperature
                ),
            });
        }
        if self.max_iterations == 0 {
            return Err(SynthesisError::InvalidConfig {
                reason: "max_iterations must be at least 1".to_string(),
            });
        }
        if self.max_no_improvement == 0 {
            return Err(SynthesisError::InvalidConfig {
                reason: "max_no_improvement must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(SynthesisError::InvalidConfig {
                reason: format!("mutation_rate ({}) must be within [0, 1]", self.mutation_rate),
            });
        }
        if self.max_complexity == 0 {
            return Err(SynthesisError::InvalidConfig {
                reason: "max_complexity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceReason {
    Timeout,
    NoImprovement,
    PerfectSolution,
    TemperatureConverged,
    MaxIterations,
}

impl std::fmt::Display for ConvergenceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ConvergenceReason::Timeout => "timeout",
            ConvergenceReason::NoImprovement => "no_improvement",
            ConvergenceReason::PerfectSolution => "perfect_solution",
            ConvergenceReason::TemperatureConverged => "temperature_converged",
            ConvergenceReason::MaxIterations => "max_iterations",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub best_pattern: Pattern,
    pub best_fitness: FitnessResult,
    pub iterations: u32,
    pub time_seconds: f64,
    pub temperature_history: Vec<f64>,
    pub fitness_history: Vec<f64>,
    pub accepted_moves: u32,
    pub rejected_moves: u32,
    pub convergence_reason: ConvergenceReason,
    pub final_temperature: f64,
    /// Which restart (0-based) produced this result; `None` for a plain
    /// `optimize` call that never went through `optimize_with_restarts`.
    pub restart_index: Option<u32>,
}

impl OptimizeResult {
    /// `convergence_reason` as the library-API's result record spells it,
    /// suffixed with the winning restart index when this came from
    /// `optimize_with_restarts` (spec's "convergence_reason is suffixed
    /// with the restart index that produced it").
    pub fn convergence_label(&self) -> String {
        match self.restart_index {
            Some(idx) => format!("{}#{idx}", self.convergence_reason),
            None => self.convergence_reason.to_string(),
        }
    }
}

pub struct AnnealingDriver {
    config: OptimizeConfig,
}

impl AnnealingDriver {
    pub fn new(config: OptimizeConfig) -> AnnealingDriver {
        AnnealingDriver { config }
    }

    /// Run the search once. Fails only on caller-fixable preconditions
    /// (no positive examples, or a config that can never converge);
    /// every other failure mode (compile errors, perf timeouts, rejected
    /// neighbors) is recovered internally and folded into the returned
    /// `OptimizeResult` instead.
    pub fn optimize(
        &self,
        positive_examples: &[String],
        negative_examples: &[String],
        scorer: &MultiCriteriaScorer,
        initial_pattern: Option<Pattern>,
    ) -> Result<OptimizeResult, SynthesisError> {
        if positive_examples.is_empty() {
            return Err(SynthesisError::EmptyPositives);
        }
        self.config.validate()?;
        Ok(self.optimize_with_seed(
            positive_examples,
            negative_examples,
            scorer,
            initial_pattern,
            self.config.seed,
        ))
    }

    fn optimize_with_seed(
        &self,
        positive_examples: &[String],
        negative_examples: &[String],
        scorer: &MultiCriteriaScorer,
        initial_pattern: Option<Pattern>,
        seed: u64,
    ) -> OptimizeResult {
        let start = Instant::now();
        let mut mutator = Mutator::new(seed, self.config.mutation_rate);
        let mut accept_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let scheduler = Scheduler::new(
            self.config.cooling_schedule,
            self.config.initial_temperature,
            self.config.final_temperature,
            self.config.max_iterations,
        );

        let mut current_pattern = initial_pattern
            .unwrap_or_else(|| mutator.random_pattern(self.config.max_complexity / 2, Some(positive_examples)));
        let mut current_fitness = scorer.score(&current_pattern, positive_examples, negative_examples);

        let mut best_pattern = current_pattern.clone();
        let mut best_fitness = current_fitness.clone_result();

        let mut temperature_history = Vec::new();
        let mut fitness_history = Vec::new();
        let mut accepted_moves = 0u32;
        let mut rejected_moves = 0u32;
        let mut last_improvement_iteration = 0u32;
        let mut no_improvement_count = 0u32;

        let mut reason = ConvergenceReason::MaxIterations;
        let mut last_iteration = 0u32;
        let mut last_temperature = 0.0;

        for iteration in 0..self.config.max_iterations {
            last_iteration = iteration;

            if let Some(timeout) = self.config.timeout {
                if start.elapsed() > timeout {
                    reason = ConvergenceReason::Timeout;
                    break;
                }
            }

            let temperature = scheduler.temperature(iteration, last_improvement_iteration);
            temperature_history.push(temperature);
            last_temperature = temperature;

            let neighbor_pattern = mutator.mutate(&current_pattern);
            if neighbor_pattern.complexity() > self.config.max_complexity {
                rejected_moves += 1;
                fitness_history.push(current_fitness.total_score);
                continue;
            }

            let neighbor_fitness = scorer.score(&neighbor_pattern, positive_examples, negative_examples);

            let accept = should_accept(
                current_fitness.total_score,
                neighbor_fitness.total_score,
                temperature,
                &mut accept_rng,
            );

            if accept {
                let neighbor_is_better = neighbor_fitness.total_score > best_fitness.total_score;
                current_pattern = neighbor_pattern.clone();
                current_fitness = neighbor_fitness;
                accepted_moves += 1;

                if neighbor_is_better {
                    best_pattern = neighbor_pattern;
                    best_fitness = current_fitness.clone_result();
                    last_improvement_iteration = iteration;
                    no_improvement_count = 0;
                } else {
                    no_improvement_count += 1;
                }
            } else {
                rejected_moves += 1;
                no_improvement_count += 1;
            }

            fitness_history.push(current_fitness.total_score);

            if no_improvement_count >= self.config.max_no_improvement {
                reason = ConvergenceReason::NoImprovement;
                break;
            }

            if best_fitness.total_score >= PERFECT_SCORE_THRESHOLD
                && best_fitness.positive_matches == best_fitness.positive_total
                && best_fitness.negative_matches == best_fitness.negative_total
            {
                reason = ConvergenceReason::PerfectSolution;
                break;
            }

            if temperature < self.config.final_temperature {
                reason = ConvergenceReason::TemperatureConverged;
                break;
            }
        }

        OptimizeResult {
            best_pattern,
            best_fitness,
            iterations: last_iteration + 1,
            time_seconds: start.elapsed().as_secs_f64(),
            temperature_history,
            fitness_history,
            accepted_moves,
            rejected_moves,
            convergence_reason: reason,
            final_temperature: last_temperature,
            restart_index: None,
        }
    }

    /// Run several independent restarts (seeds `seed+0, seed+1, …`) and
    /// keep the best-scoring result.
    pub fn optimize_with_restarts(
        &self,
        positive_examples: &[String],
        negative_examples: &[String],
        scorer: &MultiCriteriaScorer,
        num_restarts: u32,
    ) -> Result<OptimizeResult, SynthesisError> {
        if positive_examples.is_empty() {
            return Err(SynthesisError::EmptyPositives);
        }
        if num_restarts == 0 {
            return Err(SynthesisError::InvalidConfig {
                reason: "num_restarts must be at least 1".to_string(),
            });
        }
        self.config.validate()?;

        let mut best: Option<OptimizeResult> = None;

        for restart in 0..num_restarts {
            let seed = self.config.seed.wrapping_add(restart as u64);
            let mut result = self.optimize_with_seed(positive_examples, negative_examples, scorer, None, seed);
            result.restart_index = Some(restart);

            let is_better = best
                .as_ref()
                .map(|b| result.best_fitness.total_score > b.best_fitness.total_score)
                .unwrap_or(true);

            if is_better {
                best = Some(result);
            }
        }

        Ok(best.expect("loop runs at least once since num_restarts >= 1 was just checked"))
    }
}

fn should_accept(current_score: f64, neighbor_score: f64, temperature: f64, rng: &mut StdRng) -> bool {
    if neighbor_score > current_score {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    let delta = neighbor_score - current_score;
    let probability = (delta / temperature).exp();
    rng.gen_range(0.0..1.0) < probability
}

impl FitnessResult {
    fn clone_result(&self) -> FitnessResult {
        FitnessResult {
            total_score: self.total_score,
            correctness_score: self.correctness_score,
            complexity_score: self.complexity_score,
            readability_score: self.readability_score,
            performance_score: self.performance_score,
            positive_matches: self.positive_matches,
            negative_matches: self.negative_matches,
            positive_total: self.positive_total,
            negative_total: self.negative_total,
            evaluation_time_ms: self.evaluation_time_ms,
            timeout_occurred: self.timeout_occurred,
            compilation_error: self.compilation_error.clone(),
        }
    }
}
