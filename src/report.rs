//! Step-count report: descriptive statistics, tests and the weekday table
//!
//! Everything is computed over *combined* daily totals (all series summed
//! per date), except the per-series means table and the repeated-measures
//! ANOVA, which treat each series separately.

use crate::config::AnalysisConfig;
use crate::dataset::StepDataset;
use crate::grouping::{
    group_by_season, group_by_weekday, non_empty, split_weekend, weekday_name, Season, WEEKDAYS,
};
use crate::stats::{
    self, anova, arithmetic_mean, harmonic_mean, pooled_std_dev, pooled_variance,
    repeated_measures_anova, std_dev, summarize, t_test, welch_t_test, StatsError, Summary,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A named scalar result, with a p-value for hypothesis tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
}

impl Statistic {
    fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            p_value: None,
        }
    }

    fn test(name: impl Into<String>, value: f64, p_value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            p_value: Some(p_value),
        }
    }

    /// Whether this is a test result significant at `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value.is_some_and(|p| p < alpha)
    }
}

/// Average combined steps for one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayRow {
    pub day: String,
    /// `None` when the data has no date on this weekday
    pub average_steps: Option<f64>,
    pub days: usize,
}

/// Average combined steps for one season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRow {
    pub season: String,
    pub average_steps: Option<f64>,
    pub days: usize,
}

/// Arithmetic and harmonic mean of one series' daily totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeans {
    pub series: String,
    pub arithmetic_mean: f64,
    /// `None` when every daily total is zero
    pub harmonic_mean: Option<f64>,
}

/// A test that could not run on this data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTest {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,
    pub significance_level: f64,
    pub summary: Summary,
    pub statistics: Vec<Statistic>,
    pub weekday_table: Vec<WeekdayRow>,
    pub season_table: Vec<SeasonRow>,
    pub series: Vec<SeriesMeans>,
    pub skipped: Vec<SkippedTest>,
}

impl StepReport {
    /// Look up a statistic by exact name
    pub fn statistic(&self, name: &str) -> Option<&Statistic> {
        self.statistics.iter().find(|s| s.name == name)
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str(&format!("Step-count report: {}\n", self.source));
        if let Some(comparison) = &self.comparison {
            report.push_str(&format!("Compared against: {}\n", comparison));
        }
        report.push_str(&format!(
            "Days: {} (min {:.0}, max {:.0})\n",
            self.summary.count, self.summary.min, self.summary.max
        ));
        report.push_str(&format!(
            "Significance level: {} ({:.0}% confidence)\n",
            self.significance_level,
            (1.0 - self.significance_level) * 100.0
        ));

        report.push_str("\nStatistics:\n");
        for stat in &self.statistics {
            match stat.p_value {
                Some(p) => {
                    let marker = if p < self.significance_level {
                        "significant"
                    } else {
                        "not significant"
                    };
                    report.push_str(&format!(
                        "  {}: {:.3} (p={:.4}, {})\n",
                        stat.name, stat.value, p, marker
                    ));
                }
                None => report.push_str(&format!("  {}: {:.1}\n", stat.name, stat.value)),
            }
        }

        report.push_str("\nAverage combined steps by day of week:\n");
        for row in &self.weekday_table {
            match row.average_steps {
                Some(avg) => report.push_str(&format!(
                    "  {:<10} {:>10.1}  ({} days)\n",
                    row.day, avg, row.days
                )),
                None => report.push_str(&format!("  {:<10} {:>10}  (0 days)\n", row.day, "-")),
            }
        }

        report.push_str("\nAverage combined steps by season:\n");
        for row in &self.season_table {
            match row.average_steps {
                Some(avg) => report.push_str(&format!(
                    "  {:<10} {:>10.1}  ({} days)\n",
                    row.season, avg, row.days
                )),
                None => report.push_str(&format!("  {:<10} {:>10}  (0 days)\n", row.season, "-")),
            }
        }

        if self.series.len() > 1 {
            report.push_str("\nPer-series daily means:\n");
            report.push_str(&format!(
                "  {:<15} | {:<18} | {:<15}\n",
                "Series", "Arithmetic Mean", "Harmonic Mean"
            ));
            for s in &self.series {
                let harmonic = s
                    .harmonic_mean
                    .map_or_else(|| "-".to_string(), |h| format!("{:.2}", h));
                report.push_str(&format!(
                    "  {:<15} | {:<18.2} | {:<15}\n",
                    s.series, s.arithmetic_mean, harmonic
                ));
            }
        }

        if !self.skipped.is_empty() {
            report.push_str(&format!("\nSkipped tests ({}):\n", self.skipped.len()));
            for skipped in &self.skipped {
                report.push_str(&format!("  - {}: {}\n", skipped.name, skipped.reason));
            }
        }

        report
    }
}

/// Collects statistics, turning test failures into skipped entries
struct ReportBuilder {
    statistics: Vec<Statistic>,
    skipped: Vec<SkippedTest>,
}

impl ReportBuilder {
    fn push<T>(
        &mut self,
        name: &str,
        result: Result<T, StatsError>,
        to_statistics: impl FnOnce(T) -> Vec<Statistic>,
    ) {
        match result {
            Ok(value) => self.statistics.extend(to_statistics(value)),
            Err(e) => {
                warn!(test = name, reason = %e, "skipping test");
                self.skipped.push(SkippedTest {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Build the full report for a dataset
///
/// With `comparison`, the t-tests compare the two datasets' combined daily
/// totals; otherwise they compare weekdays against weekends.
///
/// # Errors
/// Fails only when the dataset has no days to summarize.
pub fn build_report(
    dataset: &StepDataset,
    comparison: Option<&StepDataset>,
    config: &AnalysisConfig,
) -> Result<StepReport, StatsError> {
    let days = dataset.combined();
    let totals: Vec<f64> = days.iter().map(|d| d.steps).collect();
    let summary = summarize(&totals)?;
    debug!(days = totals.len(), mean = summary.mean, "summarized combined totals");

    let mut builder = ReportBuilder {
        statistics: vec![Statistic::new("Arithmetic Mean", summary.mean)],
        skipped: Vec::new(),
    };
    builder.push("Harmonic Mean", harmonic_mean(&totals), |h| {
        vec![Statistic::new("Harmonic Mean", h)]
    });
    builder.statistics.extend([
        Statistic::new("Standard Deviation", summary.std_dev),
        Statistic::new("Median", summary.median),
    ]);

    let weekday_groups = group_by_weekday(&days);
    let pairs: Vec<(f64, usize)> = weekday_groups
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| (std_dev(g), g.len()))
        .collect();
    builder.push(
        "Pooled Standard Deviation (weekday)",
        pooled_std_dev(&pairs).and_then(|sd| Ok((sd, pooled_variance(&pairs)?))),
        |(sd, var)| {
            vec![
                Statistic::new("Pooled Standard Deviation (weekday)", sd),
                Statistic::new("Pooled Variance (weekday)", var),
            ]
        },
    );

    let (first, second, label) = match comparison {
        Some(other) => {
            let other_totals: Vec<f64> = other.combined().iter().map(|d| d.steps).collect();
            (
                totals.clone(),
                other_totals,
                format!("{} vs {}", dataset.label, other.label),
            )
        }
        None => {
            let (weekday, weekend) = split_weekend(&days);
            (weekday, weekend, "weekday vs weekend".to_string())
        }
    };

    let name = format!("T-Test ({})", label);
    builder.push(&name, t_test(&first, &second), |t| {
        vec![Statistic::test(name.clone(), t.statistic, t.p_value)]
    });
    let name = format!("Welch T-Test ({})", label);
    builder.push(&name, welch_t_test(&first, &second), |t| {
        vec![Statistic::test(name.clone(), t.statistic, t.p_value)]
    });

    let name = "ANOVA F-Statistic (weekday)";
    builder.push(name, anova(&non_empty(weekday_groups.clone())), |f| {
        vec![Statistic::test(name, f.statistic, f.p_value)]
    });

    let name = "ANOVA F-Statistic (season)";
    let season_groups = group_by_season(&days, config.hemisphere);
    builder.push(name, anova(&non_empty(season_groups.clone())), |f| {
        vec![Statistic::test(name, f.statistic, f.p_value)]
    });

    if config.repeated_measures {
        let name = "Repeated-Measures ANOVA F-Statistic (series)";
        builder.push(name, repeated_measures_anova(&dataset.series_matrix()), |f| {
            vec![Statistic::test(name, f.statistic, f.p_value)]
        });
    }

    let weekday_table = WEEKDAYS
        .iter()
        .zip(&weekday_groups)
        .map(|(&day, group)| WeekdayRow {
            day: weekday_name(day).to_string(),
            average_steps: arithmetic_mean(group).ok(),
            days: group.len(),
        })
        .collect();

    let season_table = Season::ALL
        .iter()
        .zip(&season_groups)
        .map(|(season, group)| SeasonRow {
            season: season.to_string(),
            average_steps: arithmetic_mean(group).ok(),
            days: group.len(),
        })
        .collect();

    let series = series_means(dataset);

    Ok(StepReport {
        source: dataset.label.clone(),
        comparison: comparison.map(|c| c.label.clone()),
        significance_level: config.significance_level,
        summary,
        statistics: builder.statistics,
        weekday_table,
        season_table,
        series,
        skipped: builder.skipped,
    })
}

/// Arithmetic and harmonic means of each series' daily totals
pub fn series_means(dataset: &StepDataset) -> Vec<SeriesMeans> {
    let matrix = dataset.series_matrix();
    let columns: Vec<Vec<f64>> = (0..dataset.series_names().len())
        .map(|i| matrix.iter().map(|row| row[i]).collect())
        .collect();
    let harmonic = stats::harmonic_means(&columns);

    dataset
        .series_names()
        .iter()
        .zip(columns.iter().zip(harmonic))
        .filter_map(|(name, (values, harmonic))| {
            Some(SeriesMeans {
                series: name.clone(),
                arithmetic_mean: arithmetic_mean(values).ok()?,
                harmonic_mean: harmonic.ok(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::Hemisphere;
    use chrono::{Duration, NaiveDate};
    use std::collections::BTreeMap;

    /// Four weeks starting Monday 2016-04-11, two series, busier weekends
    fn sample_dataset() -> StepDataset {
        let start = NaiveDate::from_ymd_opt(2016, 4, 11).unwrap();
        let mut days = BTreeMap::new();
        for i in 0..28 {
            let date = start + Duration::days(i);
            let weekend = i % 7 >= 5;
            let base = if weekend { 7_000.0 } else { 4_000.0 };
            let jitter = (i % 3) as f64 * 150.0;
            days.insert(date, vec![base + jitter, base / 2.0 + jitter]);
        }
        StepDataset::from_days("sample.csv", vec!["A".into(), "B".into()], days)
    }

    #[test]
    fn test_report_contains_descriptive_statistics() {
        let report = build_report(&sample_dataset(), None, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.summary.count, 28);
        let mean = report.statistic("Arithmetic Mean").unwrap();
        assert!(mean.p_value.is_none());
        assert!(report.statistic("Harmonic Mean").unwrap().value <= mean.value);
        assert!(report.statistic("Pooled Standard Deviation (weekday)").is_some());
        assert!(report.statistic("Pooled Variance (weekday)").is_some());
    }

    #[test]
    fn test_report_weekend_t_test_significant() {
        let report = build_report(&sample_dataset(), None, &AnalysisConfig::default()).unwrap();

        let t = report.statistic("T-Test (weekday vs weekend)").unwrap();
        assert!(t.value < 0.0);
        assert!(t.is_significant(report.significance_level));
        assert!(report.statistic("Welch T-Test (weekday vs weekend)").is_some());
    }

    #[test]
    fn test_report_weekday_table_has_seven_rows() {
        let report = build_report(&sample_dataset(), None, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.weekday_table.len(), 7);
        assert_eq!(report.weekday_table[0].day, "Monday");
        assert_eq!(report.weekday_table[0].days, 4);
        let saturday = report.weekday_table[5].average_steps.unwrap();
        let monday = report.weekday_table[0].average_steps.unwrap();
        assert!(saturday > monday);
    }

    #[test]
    fn test_report_skips_season_anova_with_one_season() {
        let report = build_report(&sample_dataset(), None, &AnalysisConfig::default()).unwrap();

        // April and May are both spring
        assert!(report.statistic("ANOVA F-Statistic (season)").is_none());
        assert!(report
            .skipped
            .iter()
            .any(|s| s.name == "ANOVA F-Statistic (season)"));
        assert!(report.statistic("ANOVA F-Statistic (weekday)").is_some());
    }

    #[test]
    fn test_report_with_comparison_dataset() {
        let primary = sample_dataset();
        let mut days = BTreeMap::new();
        for (i, date) in primary.dates().enumerate() {
            days.insert(date, vec![20_000.0 + (i % 4) as f64 * 300.0]);
        }
        let other = StepDataset::from_days("other.csv", vec!["Steps".into()], days);

        let report = build_report(&primary, Some(&other), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.comparison.as_deref(), Some("other.csv"));
        let t = report.statistic("T-Test (sample.csv vs other.csv)").unwrap();
        assert!(t.value < 0.0);
        assert!(report.statistic("T-Test (weekday vs weekend)").is_none());
    }

    #[test]
    fn test_report_repeated_measures_when_enabled() {
        let config = AnalysisConfig {
            repeated_measures: true,
            ..AnalysisConfig::default()
        };
        let report = build_report(&sample_dataset(), None, &config).unwrap();
        let rm = report
            .statistic("Repeated-Measures ANOVA F-Statistic (series)")
            .unwrap();
        assert!(rm.p_value.is_some());
    }

    #[test]
    fn test_series_means() {
        let means = series_means(&sample_dataset());
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].series, "A");
        assert!(means[0].arithmetic_mean > means[1].arithmetic_mean);
        assert!(means[1].harmonic_mean.is_some());
    }

    #[test]
    fn test_text_report_lists_sections() {
        let report = build_report(&sample_dataset(), None, &AnalysisConfig::default()).unwrap();
        let text = report.to_report_string();

        assert!(text.contains("Step-count report: sample.csv"));
        assert!(text.contains("Arithmetic Mean:"));
        assert!(text.contains("Monday"));
        assert!(text.contains("Per-series daily means:"));
        assert!(text.contains("Skipped tests (1):"));
    }

    #[test]
    fn test_report_all_zero_days_skips_harmonic_mean() {
        let start = NaiveDate::from_ymd_opt(2016, 4, 11).unwrap();
        let days: BTreeMap<_, _> = (0..14)
            .map(|i| (start + Duration::days(i), vec![0.0]))
            .collect();
        let dataset = StepDataset::from_days("idle.csv", vec!["Steps".into()], days);

        let report = build_report(&dataset, None, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.summary.harmonic_mean, None);
        assert_eq!(report.statistic("Arithmetic Mean").unwrap().value, 0.0);
        assert!(report.statistic("Harmonic Mean").is_none());
        let skipped = report
            .skipped
            .iter()
            .find(|s| s.name == "Harmonic Mean")
            .unwrap();
        assert!(skipped.reason.contains("Division by zero"));
        assert!(!report.to_report_string().contains("Harmonic Mean: 0.0"));
    }

    #[test]
    fn test_report_season_table_follows_hemisphere() {
        let north = build_report(&sample_dataset(), None, &AnalysisConfig::default()).unwrap();
        let config = AnalysisConfig {
            hemisphere: Hemisphere::South,
            ..AnalysisConfig::default()
        };
        let south = build_report(&sample_dataset(), None, &config).unwrap();

        let days_in = |report: &StepReport, season: &str| {
            report
                .season_table
                .iter()
                .find(|row| row.season == season)
                .map(|row| row.days)
                .unwrap()
        };

        // April and May
        assert_eq!(north.season_table.len(), 4);
        assert_eq!(days_in(&north, "Spring"), 28);
        assert_eq!(days_in(&north, "Autumn"), 0);
        assert_eq!(days_in(&south, "Autumn"), 28);
        assert_eq!(days_in(&south, "Spring"), 0);
        assert!(south.to_report_string().contains("Autumn"));
    }
}
