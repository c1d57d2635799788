//! Analysis configuration
//!
//! Settings can come from a TOML file (`--config stepstat.toml`) and are
//! then overridden by command-line flags.
//!
//! # Example stepstat.toml
//!
//! ```toml
//! timestamp_column = "ActivityHour"
//! timestamp_format = "%m/%d/%Y %I:%M:%S %p"
//! series_pattern = "^Steps"
//! hemisphere = "north"
//! significance_level = 0.05
//! repeated_measures = false
//! ```

use crate::grouping::Hemisphere;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Fitbit hourly/minute export timestamp, e.g. `4/12/2016 12:00:00 AM`
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Fitbit timestamp column name
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "ActivityHour";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Column holding the row timestamp
    pub timestamp_column: String,

    /// chrono format string; date-only formats are accepted too
    pub timestamp_format: String,

    /// Only columns matching this regex become series (all numeric columns if unset)
    pub series_pattern: Option<String>,

    /// Hemisphere used to map months to seasons
    pub hemisphere: Hemisphere,

    /// Statistical significance level (alpha)
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: stricter
    pub significance_level: f64,

    /// Run repeated-measures ANOVA with dates as subjects and series as conditions
    pub repeated_measures: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            series_pattern: None,
            hemisphere: Hemisphere::North,
            significance_level: 0.05,
            repeated_measures: false,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timestamp_column.trim().is_empty() {
            return Err("timestamp_column must not be empty".to_string());
        }

        if self.timestamp_format.trim().is_empty() {
            return Err("timestamp_format must not be empty".to_string());
        }

        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            ));
        }

        if let Some(pattern) = &self.series_pattern {
            regex::Regex::new(pattern)
                .map_err(|e| format!("series_pattern '{}' is not a valid regex: {}", pattern, e))?;
        }

        Ok(())
    }
}
