//! Loading wearable step-count exports into daily totals
//!
//! Exports come in a wide layout: one timestamp column followed by numeric
//! columns (Fitbit `minuteSteps` has `ActivityHour,Steps00..Steps59`; daily
//! exports have e.g. `ActivityDay,Calories`). Every numeric column becomes a
//! *series*; rows are summed per calendar date.

use crate::config::AnalysisConfig;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading an export
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Timestamp column '{0}' not found in header")]
    MissingTimestampColumn(String),

    #[error("Row {row}: cannot parse timestamp '{value}' with format '{format}'")]
    InvalidTimestamp {
        row: usize,
        value: String,
        format: String,
    },

    #[error("Invalid series pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No numeric series found")]
    NoNumericSeries,

    #[error("Export contains no data rows")]
    NoRows,
}

/// Steps (or any summed quantity) for one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub steps: f64,
}

/// Daily totals per series, ordered by date
#[derive(Debug, Clone)]
pub struct StepDataset {
    /// Label used in reports (file name for loaded exports)
    pub label: String,
    series_names: Vec<String>,
    /// date → per-series totals, indexed like `series_names`
    days: BTreeMap<NaiveDate, Vec<f64>>,
}

impl StepDataset {
    /// Build a dataset directly from per-date series totals
    pub fn from_days(
        label: impl Into<String>,
        series_names: Vec<String>,
        days: BTreeMap<NaiveDate, Vec<f64>>,
    ) -> Self {
        Self {
            label: label.into(),
            series_names,
            days,
        }
    }

    /// Number of distinct dates
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    /// Daily totals of a single series
    pub fn series(&self, name: &str) -> Option<Vec<DailyTotal>> {
        let index = self.series_names.iter().position(|s| s == name)?;
        Some(
            self.days
                .iter()
                .map(|(&date, totals)| DailyTotal {
                    date,
                    steps: totals[index],
                })
                .collect(),
        )
    }

    /// Sum of all series per date
    pub fn combined(&self) -> Vec<DailyTotal> {
        self.days
            .iter()
            .map(|(&date, totals)| DailyTotal {
                date,
                steps: totals.iter().sum(),
            })
            .collect()
    }

    /// Rows = dates, columns = series
    pub fn series_matrix(&self) -> Vec<Vec<f64>> {
        self.days.values().cloned().collect()
    }
}

/// Load an export from disk
///
/// # Example
///
/// ```no_run
/// use stepstat::config::AnalysisConfig;
/// use stepstat::dataset::load_csv;
///
/// # fn main() -> anyhow::Result<()> {
/// let dataset = load_csv("1_FB_minuteSteps.csv", &AnalysisConfig::default())?;
/// println!("{} days, {} series", dataset.len(), dataset.series_names().len());
/// # Ok(())
/// # }
/// ```
pub fn load_csv<P: AsRef<Path>>(
    path: P,
    config: &AnalysisConfig,
) -> Result<StepDataset, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    info!(path = %path.display(), "loading export");
    from_reader(file, label, config)
}

/// Load an export from any reader
pub fn from_reader<R: Read>(
    reader: R,
    label: impl Into<String>,
    config: &AnalysisConfig,
) -> Result<StepDataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let timestamp_index = headers
        .iter()
        .position(|h| h == config.timestamp_column)
        .ok_or_else(|| DatasetError::MissingTimestampColumn(config.timestamp_column.clone()))?;

    let records = reader.records().collect::<Result<Vec<StringRecord>, _>>()?;
    if records.is_empty() {
        return Err(DatasetError::NoRows);
    }

    let pattern = match &config.series_pattern {
        Some(p) => Some(Regex::new(p).map_err(|source| DatasetError::InvalidPattern {
            pattern: p.clone(),
            source,
        })?),
        None => None,
    };

    let series = numeric_columns(&headers, &records, timestamp_index, pattern.as_ref());
    if series.is_empty() {
        return Err(DatasetError::NoNumericSeries);
    }
    debug!(count = series.len(), "detected numeric series");

    let mut days: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        let raw = record.get(timestamp_index).unwrap_or_default();
        // Header is line 1
        let date = parse_date(raw, &config.timestamp_format).ok_or_else(|| {
            DatasetError::InvalidTimestamp {
                row: i + 2,
                value: raw.to_string(),
                format: config.timestamp_format.clone(),
            }
        })?;

        let totals = days.entry(date).or_insert_with(|| vec![0.0; series.len()]);
        for (slot, &column) in series.iter().enumerate() {
            totals[slot] += parse_cell(record.get(column).unwrap_or_default()).unwrap_or(0.0);
        }
    }

    let series_names = series.iter().map(|&c| headers[c].to_string()).collect();
    let dataset = StepDataset::from_days(label, series_names, days);
    info!(
        days = dataset.len(),
        rows = records.len(),
        "aggregated export into daily totals"
    );
    Ok(dataset)
}

/// Columns (other than the timestamp) whose non-empty cells all parse as numbers
fn numeric_columns(
    headers: &StringRecord,
    records: &[StringRecord],
    timestamp_index: usize,
    pattern: Option<&Regex>,
) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != timestamp_index)
        .filter(|&(_, name)| pattern.map_or(true, |re| re.is_match(name)))
        .filter(|&(i, name)| {
            let numeric = records.iter().all(|r| {
                let cell = r.get(i).unwrap_or_default();
                cell.is_empty() || parse_cell(cell).is_some()
            });
            if !numeric {
                debug!(column = name, "skipping non-numeric column");
            }
            numeric
        })
        .map(|(i, _)| i)
        .collect()
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a timestamp as date-time, falling back to a date-only parse
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, format)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, format))
        .ok()
}
