// One-way and repeated-measures ANOVA
//
// Both tests partition the total sum of squares and compare the
// between-condition mean square against the residual mean square with the
// Fisher-Snedecor distribution: p = P(F > f).

use super::descriptive::arithmetic_mean;
use super::StatsError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Residual sums of squares at or below this fraction of the total are
/// rounding noise, not variance
const RESIDUAL_TOLERANCE: f64 = 1e-12;

/// Result of an F-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FTest {
    /// F-statistic
    pub statistic: f64,

    /// Upper-tail p-value
    pub p_value: f64,

    /// Numerator degrees of freedom (between groups / conditions)
    pub df_between: f64,

    /// Denominator degrees of freedom (within groups / error)
    pub df_within: f64,
}

impl FTest {
    /// Whether the group means differ significantly at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn f_test(
    ss_between: f64,
    df_between: f64,
    ss_within: f64,
    df_within: f64,
    ss_total: f64,
    what: &'static str,
) -> Result<FTest, StatsError> {
    if ss_within <= RESIDUAL_TOLERANCE * ss_total {
        return Err(StatsError::DivisionByZero(what));
    }
    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;

    let statistic = ms_between / ms_within;
    let dist = FisherSnedecor::new(df_between, df_within)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;

    Ok(FTest {
        statistic,
        p_value: dist.sf(statistic).clamp(0.0, 1.0),
        df_between,
        df_within,
    })
}

/// One-way ANOVA across three or more groups
///
/// # Example
/// ```
/// use stepstat::stats::anova;
///
/// let groups = vec![
///     vec![1.0, 2.0, 3.0],
///     vec![4.0, 5.0, 6.0],
///     vec![7.0, 8.0, 9.0],
/// ];
/// let result = anova(&groups).unwrap();
/// assert!((result.statistic - 27.0).abs() < 1e-9);
/// ```
pub fn anova(groups: &[Vec<f64>]) -> Result<FTest, StatsError> {
    let m = groups.len();
    if m < 3 {
        return Err(StatsError::InsufficientGroups {
            required: 3,
            actual: m,
        });
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(StatsError::EmptySample);
    }

    let all: Vec<f64> = groups.iter().flatten().copied().collect();
    let n = all.len();
    if n <= m {
        return Err(StatsError::InsufficientDegreesOfFreedom("ANOVA"));
    }

    let grand_mean = arithmetic_mean(&all)?;
    let ss_total: f64 = all.iter().map(|x| (x - grand_mean).powi(2)).sum();

    let mut ss_between = 0.0;
    for group in groups {
        let group_mean = arithmetic_mean(group)?;
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
    }
    let ss_within = ss_total - ss_between;

    f_test(
        ss_between,
        (m - 1) as f64,
        ss_within,
        (n - m) as f64,
        ss_total,
        "ANOVA within-group mean square",
    )
}

/// Repeated-measures ANOVA
///
/// Each row is one subject measured under every condition (column). The
/// subject effect is removed from the residual before testing conditions.
pub fn repeated_measures_anova(rows: &[Vec<f64>]) -> Result<FTest, StatsError> {
    let num_rows = rows.len();
    let num_columns = rows.first().map_or(0, Vec::len);

    if num_rows < 2 {
        return Err(StatsError::InsufficientGroups {
            required: 2,
            actual: num_rows,
        });
    }
    if num_columns < 2 {
        return Err(StatsError::InsufficientGroups {
            required: 2,
            actual: num_columns,
        });
    }
    for (row, values) in rows.iter().enumerate() {
        if values.len() != num_columns {
            return Err(StatsError::RaggedMatrix {
                row,
                expected: num_columns,
                actual: values.len(),
            });
        }
    }

    let all: Vec<f64> = rows.iter().flatten().copied().collect();
    let grand_mean = arithmetic_mean(&all)?;

    let mut ss_subjects = 0.0;
    for row in rows {
        let row_mean = arithmetic_mean(row)?;
        ss_subjects += num_columns as f64 * (row_mean - grand_mean).powi(2);
    }

    let mut ss_conditions = 0.0;
    for column in 0..num_columns {
        let column_mean = rows.iter().map(|r| r[column]).sum::<f64>() / num_rows as f64;
        ss_conditions += num_rows as f64 * (column_mean - grand_mean).powi(2);
    }

    let ss_total: f64 = all.iter().map(|x| (x - grand_mean).powi(2)).sum();
    let ss_error = ss_total - ss_conditions - ss_subjects;

    f_test(
        ss_conditions,
        (num_columns - 1) as f64,
        ss_error,
        ((num_columns - 1) * (num_rows - 1)) as f64,
        ss_total,
        "repeated-measures error mean square",
    )
}
