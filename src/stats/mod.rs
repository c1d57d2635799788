// Descriptive and inferential statistics over daily step totals
//
// Three layers, each usable on its own:
// - descriptive: arithmetic/harmonic means, population and pooled standard deviation
// - hypothesis: independent two-sample t-tests (pooled and Welch)
// - anova: one-way and repeated-measures ANOVA F-tests
//
// Implementation:
// - Uses statrs (crates.io) for the Student's t and Fisher-Snedecor CDFs
// - Uses aprender (crates.io) for the Welch cross-check and quantiles
// - Uses trueno (crates.io) for SIMD vector mean/stddev
//
// All functions take f64 slices. Failures are reported through `StatsError`
// rather than sentinel values, except where a zero result is meaningful
// (population std dev of an empty sample, pooled std dev with no degrees of freedom).

mod anova;
mod descriptive;
mod hypothesis;

pub use anova::{anova, repeated_measures_anova, FTest};
pub use descriptive::{
    arithmetic_mean, coefficient_of_variation, harmonic_mean, harmonic_means, median,
    pooled_std_dev, pooled_variance, std_dev, summarize, Summary,
};
pub use hypothesis::{t_test, welch_t_test, SampleInput, SampleParams, TTest};

use thiserror::Error;

/// Errors raised by the statistics layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("Cannot compute statistics of an empty sample")]
    EmptySample,

    #[error("Division by zero while computing {0}")]
    DivisionByZero(&'static str),

    #[error("Insufficient groups: need at least {required}, got {actual}")]
    InsufficientGroups { required: usize, actual: usize },

    #[error("Insufficient degrees of freedom for {0}")]
    InsufficientDegreesOfFreedom(&'static str),

    #[error("Ragged matrix: row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Distribution error: {0}")]
    Distribution(String),
}
