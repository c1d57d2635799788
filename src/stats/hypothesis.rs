// Independent two-sample t-tests
//
// - `t_test`: pooled-variance Student's t-test, the test reported for
//   step-count comparisons. Accepts raw samples or precomputed parameters.
// - `welch_t_test`: unequal-variance variant via aprender, reported
//   alongside as a cross-check when the groups differ in spread.
//
// P-values are two-tailed: p = 2 * P(T > |t|).

use super::descriptive::{arithmetic_mean, pooled_std_dev, std_dev};
use super::StatsError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Mean, population standard deviation and size of one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleParams {
    pub mean: f64,
    pub std_dev: f64,
    pub n: usize,
}

/// Input to [`t_test`]: raw observations or already-reduced parameters
#[derive(Debug, Clone, Copy)]
pub enum SampleInput<'a> {
    Samples(&'a [f64]),
    Params(SampleParams),
}

impl<'a> From<&'a [f64]> for SampleInput<'a> {
    fn from(samples: &'a [f64]) -> Self {
        SampleInput::Samples(samples)
    }
}

impl<'a> From<&'a Vec<f64>> for SampleInput<'a> {
    fn from(samples: &'a Vec<f64>) -> Self {
        SampleInput::Samples(samples.as_slice())
    }
}

impl From<SampleParams> for SampleInput<'_> {
    fn from(params: SampleParams) -> Self {
        SampleInput::Params(params)
    }
}

impl SampleInput<'_> {
    /// Reduce to parameters, computing them from samples if needed
    pub fn params(&self) -> Result<SampleParams, StatsError> {
        match *self {
            SampleInput::Params(params) => {
                if params.n == 0 {
                    return Err(StatsError::EmptySample);
                }
                Ok(params)
            }
            SampleInput::Samples(data) => Ok(SampleParams {
                mean: arithmetic_mean(data)?,
                std_dev: std_dev(data),
                n: data.len(),
            }),
        }
    }
}

/// Result of a two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTest {
    /// t-statistic; positive when the first sample has the larger mean
    pub statistic: f64,

    /// Two-tailed p-value
    pub p_value: f64,

    /// Degrees of freedom
    pub df: f64,
}

impl TTest {
    /// Whether the difference is significant at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Pooled-variance independent two-sample t-test
///
/// # Example
/// ```
/// use stepstat::stats::t_test;
///
/// let weekdays = vec![10.0, 12.0, 11.0, 13.0, 10.0];
/// let weekends = vec![25.0, 27.0, 26.0, 28.0, 25.0];
///
/// let result = t_test(&weekdays, &weekends).unwrap();
/// assert!(result.statistic < 0.0);
/// assert!(result.p_value < 0.05);
/// ```
pub fn t_test<'a, 'b>(
    first: impl Into<SampleInput<'a>>,
    second: impl Into<SampleInput<'b>>,
) -> Result<TTest, StatsError> {
    let a = first.into().params()?;
    let b = second.into().params()?;

    if a.n + b.n < 3 {
        return Err(StatsError::InsufficientDegreesOfFreedom("t-test"));
    }
    let df = (a.n + b.n - 2) as f64;

    let sigma_p = pooled_std_dev(&[(a.std_dev, a.n), (b.std_dev, b.n)])?;
    let standard_error = sigma_p * (1.0 / a.n as f64 + 1.0 / b.n as f64).sqrt();
    if standard_error == 0.0 {
        return Err(StatsError::DivisionByZero("t-test standard error"));
    }

    let statistic = (a.mean - b.mean) / standard_error;

    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * dist.sf(statistic.abs())).clamp(0.0, 1.0);

    Ok(TTest {
        statistic,
        p_value,
        df,
    })
}

/// Welch's unequal-variance t-test using aprender's `ttest_ind`
pub fn welch_t_test(first: &[f64], second: &[f64]) -> Result<TTest, StatsError> {
    if first.is_empty() || second.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if first.len() < 2 || second.len() < 2 {
        return Err(StatsError::InsufficientDegreesOfFreedom("Welch t-test"));
    }
    if std_dev(first) == 0.0 && std_dev(second) == 0.0 {
        return Err(StatsError::DivisionByZero("Welch t-test standard error"));
    }

    let a: Vec<f32> = first.iter().map(|&x| x as f32).collect();
    let b: Vec<f32> = second.iter().map(|&x| x as f32).collect();

    let result = aprender::stats::hypothesis::ttest_ind(&a, &b, false)
        .map_err(|e| StatsError::Distribution(format!("Failed to compute t-test: {}", e)))?;

    Ok(TTest {
        statistic: f64::from(result.statistic),
        p_value: f64::from(result.pvalue),
        df: f64::from(result.df),
    })
}
