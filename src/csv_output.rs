//! CSV output format for step-count reports
//!
//! Two tables separated by a blank line: statistics, then the weekday table.

use crate::report::StepReport;

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    report: &'a StepReport,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter
    pub fn new(report: &'a StepReport) -> Self {
        Self { report }
    }

    /// Escape CSV field (handle commas, quotes, line breaks)
    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Statistics table: name, value, p_value, significant
    pub fn statistics_csv(&self) -> String {
        let alpha = self.report.significance_level;
        let mut output = String::from("statistic,value,p_value,significant\n");

        for stat in &self.report.statistics {
            output.push_str(&Self::escape_field(&stat.name));
            output.push(',');
            output.push_str(&stat.value.to_string());
            output.push(',');
            if let Some(p) = stat.p_value {
                output.push_str(&p.to_string());
                output.push(',');
                output.push_str(if p < alpha { "true" } else { "false" });
            } else {
                output.push(',');
            }
            output.push('\n');
        }

        output
    }

    /// Weekday table: day, average_steps, days
    pub fn weekday_csv(&self) -> String {
        let mut output = String::from("day,average_steps,days\n");

        for row in &self.report.weekday_table {
            output.push_str(&row.day);
            output.push(',');
            if let Some(avg) = row.average_steps {
                output.push_str(&format!("{:.1}", avg));
            }
            output.push(',');
            output.push_str(&row.days.to_string());
            output.push('\n');
        }

        output
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = self.statistics_csv();
        output.push('\n');
        output.push_str(&self.weekday_csv());
        output
    }
}
