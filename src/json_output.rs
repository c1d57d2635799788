//! JSON output format for step-count reports

use crate::report::{SeasonRow, SeriesMeans, SkippedTest, Statistic, StepReport, WeekdayRow};
use crate::stats::Summary;
use serde::{Deserialize, Serialize};

/// Root JSON output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Input export label
    pub source: String,
    /// Comparison export label (if --compare given)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    pub significance_level: f64,
    /// Summary of combined daily totals
    pub summary: Summary,
    /// Descriptive statistics and test results
    pub statistics: Vec<JsonStatistic>,
    /// Average combined steps per weekday, Monday first
    pub weekday_table: Vec<WeekdayRow>,
    /// Average combined steps per season, winter first
    pub season_table: Vec<SeasonRow>,
    /// Per-series means of daily totals
    pub series: Vec<SeriesMeans>,
    /// Tests that could not run on this data
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedTest>,
}

/// A statistic with its significance verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonStatistic {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    /// Present for hypothesis tests only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant: Option<bool>,
}

impl JsonStatistic {
    fn from_statistic(stat: &Statistic, alpha: f64) -> Self {
        Self {
            name: stat.name.clone(),
            value: stat.value,
            p_value: stat.p_value,
            significant: stat.p_value.map(|p| p < alpha),
        }
    }
}

impl JsonOutput {
    /// Create the JSON structure for a report
    pub fn from_report(report: &StepReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "stepstat-json-v1".to_string(),
            source: report.source.clone(),
            comparison: report.comparison.clone(),
            significance_level: report.significance_level,
            summary: report.summary.clone(),
            statistics: report
                .statistics
                .iter()
                .map(|s| JsonStatistic::from_statistic(s, report.significance_level))
                .collect(),
            weekday_table: report.weekday_table.clone(),
            season_table: report.season_table.clone(),
            series: report.series.clone(),
            skipped: report.skipped.clone(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
