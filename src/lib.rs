//! Example-driven regex synthesis: grow a pattern from positive/negative
//! string examples via simulated annealing over a small regex IR,
//! scoring candidates on correctness, complexity, readability, and
//! runtime performance.
//!
//! # Modules
//!
//! - `core::pattern`: the `Pattern` IR and its PCRE2-subset serialization
//! - `core::analyzer`: structural/domain analysis of example sets
//! - `core::mutator`: structural mutation operators and random generation
//! - `core::fitness`: multi-criteria candidate scoring
//! - `core::scheduler`: annealing temperature schedules
//! - `core::annealing`: the search loop itself
//! - `core::validator`: final validation, ReDoS risk heuristics, benchmarking
//! - `core::errors`: precondition/configuration errors
//! - `emitters::pcre2`: `Pattern` → regex string

pub mod core;
pub mod emitters;

pub use core::annealing::{AnnealingDriver, OptimizeConfig, OptimizeResult};
pub use core::errors::SynthesisError;
pub use core::fitness::{FitnessResult, MultiCriteriaScorer, ScoringMode};
pub use core::pattern::Pattern;
pub use core::scheduler::CoolingSchedule;
pub use core::validator::{validate, validate_default, ValidationRecord};
