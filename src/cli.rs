//! CLI argument parsing for stepstat

use crate::config::AnalysisConfig;
use crate::grouping::Hemisphere;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
    /// Markdown report
    Markdown,
}

#[derive(Parser, Debug)]
#[command(name = "stepstat")]
#[command(version)]
#[command(about = "Descriptive and inferential statistics for wearable step-count exports", long_about = None)]
pub struct Cli {
    /// Wearable CSV export to analyse
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Second export; the t-test compares the two instead of weekdays vs weekends
    #[arg(long = "compare", value_name = "FILE")]
    pub compare: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file (flags override its values)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Name of the timestamp column (default: ActivityHour)
    #[arg(long = "timestamp-column", value_name = "NAME")]
    pub timestamp_column: Option<String>,

    /// chrono format of the timestamp column (default: %m/%d/%Y %I:%M:%S %p)
    #[arg(long = "timestamp-format", value_name = "FORMAT")]
    pub timestamp_format: Option<String>,

    /// Regex selecting which numeric columns are summed (e.g. ^Steps)
    #[arg(long = "series", value_name = "PATTERN")]
    pub series_pattern: Option<String>,

    /// Hemisphere for season grouping
    #[arg(long = "hemisphere", value_enum)]
    pub hemisphere: Option<Hemisphere>,

    /// Significance level for hypothesis tests (default: 0.05)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub significance_level: Option<f64>,

    /// Run repeated-measures ANOVA across series (dates as subjects)
    #[arg(long = "repeated-measures")]
    pub repeated_measures: bool,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Layer defaults, the optional TOML file and command-line flags
    pub fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)
                .with_context(|| format!("Invalid configuration file {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(column) = &self.timestamp_column {
            config.timestamp_column = column.clone();
        }
        if let Some(format) = &self.timestamp_format {
            config.timestamp_format = format.clone();
        }
        if let Some(pattern) = &self.series_pattern {
            config.series_pattern = Some(pattern.clone());
        }
        if let Some(hemisphere) = self.hemisphere {
            config.hemisphere = hemisphere;
        }
        if let Some(alpha) = self.significance_level {
            config.significance_level = alpha;
        }
        if self.repeated_measures {
            config.repeated_measures = true;
        }

        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parses_input() {
        let cli = Cli::parse_from(["stepstat", "steps.csv"]);
        assert_eq!(cli.input, PathBuf::from("steps.csv"));
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.compare.is_none());
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["stepstat"]).is_err());
    }

    #[test]
    fn test_cli_format_markdown() {
        let cli = Cli::parse_from(["stepstat", "--format", "markdown", "steps.csv"]);
        assert_eq!(cli.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_cli_compare_flag() {
        let cli = Cli::parse_from(["stepstat", "fitbit.csv", "--compare", "actigraph.csv"]);
        assert_eq!(cli.compare, Some(PathBuf::from("actigraph.csv")));
    }

    #[test]
    fn test_resolve_config_defaults() {
        let cli = Cli::parse_from(["stepstat", "steps.csv"]);
        assert_eq!(cli.resolve_config().unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_resolve_config_flags_override() {
        let cli = Cli::parse_from([
            "stepstat",
            "--alpha",
            "0.01",
            "--hemisphere",
            "south",
            "--series",
            "^Steps",
            "--repeated-measures",
            "steps.csv",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.significance_level, 0.01);
        assert_eq!(config.hemisphere, Hemisphere::South);
        assert_eq!(config.series_pattern.as_deref(), Some("^Steps"));
        assert!(config.repeated_measures);
    }

    #[test]
    fn test_resolve_config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timestamp_column = \"ActivityDay\"").unwrap();
        writeln!(file, "significance_level = 0.1").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::parse_from(["stepstat", "--config", &path, "--alpha", "0.02", "d.csv"]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.timestamp_column, "ActivityDay");
        assert_eq!(config.significance_level, 0.02);
    }

    #[test]
    fn test_resolve_config_rejects_bad_alpha() {
        let cli = Cli::parse_from(["stepstat", "--alpha", "2", "steps.csv"]);
        assert!(cli.resolve_config().is_err());
    }
}
