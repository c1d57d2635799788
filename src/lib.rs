//! stepstat - Descriptive and inferential statistics for wearable step-count exports
//!
//! This library loads wearable CSV exports (e.g. Fitbit minute steps), sums
//! them into daily totals, and computes arithmetic/harmonic means, pooled
//! variance, t-tests and ANOVA F-tests grouped by weekday and by season.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod grouping;
pub mod json_output;
pub mod markdown_output;
pub mod report;
pub mod stats;
