//! Markdown output format for step-count reports
//!
//! Mirrors the layout of a written analysis: a statistics list followed by
//! the day-of-week table.

use crate::report::StepReport;

/// Markdown output formatter
#[derive(Debug)]
pub struct MarkdownOutput<'a> {
    report: &'a StepReport,
}

impl<'a> MarkdownOutput<'a> {
    pub fn new(report: &'a StepReport) -> Self {
        Self { report }
    }

    /// Escape characters that would break a table cell
    fn escape_cell(text: &str) -> String {
        text.replace('\\', "\\\\").replace('|', "\\|")
    }

    fn statistics_section(&self) -> String {
        let mut output = String::from("## Statistics\n\n");
        let alpha = self.report.significance_level;

        for stat in &self.report.statistics {
            match stat.p_value {
                Some(p) => {
                    let verdict = if p < alpha {
                        "significant"
                    } else {
                        "not significant"
                    };
                    output.push_str(&format!(
                        "- **{}**: {:.3} (p-value: {:.4}, {} at α = {})\n",
                        stat.name, stat.value, p, verdict, alpha
                    ));
                }
                None => {
                    output.push_str(&format!("- **{}**: {:.1}\n", stat.name, stat.value));
                }
            }
        }

        if !self.report.skipped.is_empty() {
            output.push('\n');
            for skipped in &self.report.skipped {
                output.push_str(&format!("- _{} skipped_: {}\n", skipped.name, skipped.reason));
            }
        }

        output
    }

    fn weekday_section(&self) -> String {
        let mut output = String::from("## Average Combined Step Count by Day of Week\n\n");
        output.push_str("| Day | Average Steps | Days |\n");
        output.push_str("|-----|---------------|------|\n");

        for row in &self.report.weekday_table {
            let avg = row
                .average_steps
                .map_or_else(|| "-".to_string(), |a| format!("{:.1}", a));
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                Self::escape_cell(&row.day),
                avg,
                row.days
            ));
        }

        output
    }

    fn series_section(&self) -> String {
        let mut output = String::from("## Per-Series Daily Means\n\n");
        output.push_str("| Series | Arithmetic Mean | Harmonic Mean |\n");
        output.push_str("|--------|-----------------|---------------|\n");

        for s in &self.report.series {
            let harmonic = s
                .harmonic_mean
                .map_or_else(|| "-".to_string(), |h| format!("{:.2}", h));
            output.push_str(&format!(
                "| {} | {:.2} | {} |\n",
                Self::escape_cell(&s.series),
                s.arithmetic_mean,
                harmonic
            ));
        }

        output
    }

    /// Generate the complete Markdown document
    pub fn to_markdown(&self) -> String {
        let mut output = format!("# Step-Count Analysis: {}\n\n", self.report.source);

        if let Some(comparison) = &self.report.comparison {
            output.push_str(&format!("Compared against `{}`.\n\n", comparison));
        }
        output.push_str(&format!("{} days analysed.\n\n", self.report.summary.count));

        output.push_str(&self.statistics_section());
        output.push('\n');
        output.push_str(&self.weekday_section());

        if self.report.series.len() > 1 {
            output.push('\n');
            output.push_str(&self.series_section());
        }

        output
    }
}
