//! Error types surfaced by the synthesis pipeline.
//!
//! Everything here is a precondition failure the caller could have
//! avoided (empty input, a malformed config knob); scoring and
//! validation outcomes are ordinary data (`FitnessResult`,
//! `ValidationRecord`), not errors, since "this candidate scored badly"
//! is an expected result of the search, not a failure to run it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("at least one positive example is required")]
    EmptyPositives,

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
