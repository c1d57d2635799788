// Descriptive statistics for step-count samples
//
// Harmonic mean follows the convention used for wearable data: zero-step
// days are skipped in the reciprocal sum but still counted in `n`, so a
// single missing day does not make the whole mean undefined.

use super::StatsError;
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use trueno::Vector;

/// Summary of one sample, as shown in the report header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` when every value is zero
    pub harmonic_mean: Option<f64>,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Sum of values divided by count
pub fn arithmetic_mean(data: &[f64]) -> Result<f64, StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Harmonic mean `n / Σ(1/x)`, skipping zeros in the reciprocal sum
///
/// # Example
/// ```
/// use stepstat::stats::harmonic_mean;
///
/// let h = harmonic_mean(&[1.0, 2.0, 4.0]).unwrap();
/// assert!((h - 12.0 / 7.0).abs() < 1e-12);
/// ```
pub fn harmonic_mean(data: &[f64]) -> Result<f64, StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let reciprocal_sum: f64 = data.iter().filter(|&&x| x != 0.0).map(|x| 1.0 / x).sum();
    if reciprocal_sum == 0.0 {
        return Err(StatsError::DivisionByZero("harmonic mean"));
    }

    Ok(data.len() as f64 / reciprocal_sum)
}

/// Harmonic mean of each dataset independently
///
/// Empty datasets yield `Ok(0.0)`. A dataset whose reciprocal sum is zero
/// yields its own error without affecting the others.
pub fn harmonic_means(datasets: &[Vec<f64>]) -> Vec<Result<f64, StatsError>> {
    datasets
        .iter()
        .map(|data| {
            if data.is_empty() {
                Ok(0.0)
            } else {
                harmonic_mean(data)
            }
        })
        .collect()
}

/// Population standard deviation (divide by n); 0 for an empty sample
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let sq_diff: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    (sq_diff / n).sqrt()
}

/// Pooled standard deviation from `(sigma, n)` pairs
///
/// `sqrt(Σ(n-1)σ² / Σ(n-1))`. Requires at least two pairs. Returns 0 when
/// the pairs carry no degrees of freedom (every `n <= 1`).
pub fn pooled_std_dev(pairs: &[(f64, usize)]) -> Result<f64, StatsError> {
    pooled_variance(pairs).map(f64::sqrt)
}

/// Pooled variance, the square of [`pooled_std_dev`]
pub fn pooled_variance(pairs: &[(f64, usize)]) -> Result<f64, StatsError> {
    if pairs.len() < 2 {
        return Err(StatsError::InsufficientGroups {
            required: 2,
            actual: pairs.len(),
        });
    }

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &(sigma, n) in pairs {
        let dof = n.saturating_sub(1) as f64;
        numerator += dof * sigma.powi(2);
        denominator += dof;
    }

    if denominator == 0.0 {
        return Ok(0.0);
    }

    Ok(numerator / denominator)
}

/// Median using aprender's R-7 quantile
pub fn median(data: &[f64]) -> Result<f64, StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let values: Vec<f32> = data.iter().map(|&x| x as f32).collect();
    let vector = Vector::from_slice(&values);
    let stats = DescriptiveStats::new(&vector);
    stats
        .quantile(0.5)
        .map(f64::from)
        .map_err(|e| StatsError::Distribution(format!("Failed to compute median: {}", e)))
}

/// Coefficient of variation (std_dev / |mean|)
///
/// 0 for an empty sample or a mean near zero.
pub fn coefficient_of_variation(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let values: Vec<f32> = data.iter().map(|&x| x as f32).collect();
    let vec = Vector::from_slice(&values);

    let Ok(mean) = vec.mean() else {
        return 0.0;
    };
    let Ok(std) = vec.stddev() else {
        return 0.0;
    };

    if mean.abs() < 1e-6 {
        return 0.0;
    }

    f64::from(std / mean.abs())
}

/// Compute every summary field for a non-empty sample
///
/// The harmonic mean is `None` when the sample is all zeros.
pub fn summarize(data: &[f64]) -> Result<Summary, StatsError> {
    let mean = arithmetic_mean(data)?;
    let harmonic_mean = match harmonic_mean(data) {
        Ok(h) => Some(h),
        Err(StatsError::DivisionByZero(_)) => None,
        Err(e) => return Err(e),
    };

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(Summary {
        count: data.len(),
        mean,
        harmonic_mean,
        std_dev: std_dev(data),
        median: median(data)?,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_mean_basic() {
        assert_eq!(arithmetic_mean(&[2.0, 4.0, 6.0, 8.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_arithmetic_mean_empty() {
        assert_eq!(arithmetic_mean(&[]), Err(StatsError::EmptySample));
    }

    #[test]
    fn test_harmonic_mean_basic() {
        let h = harmonic_mean(&[1.0, 2.0, 4.0]).unwrap();
        assert!((h - 1.714_285_714).abs() < 1e-6);
    }

    #[test]
    fn test_harmonic_mean_skips_zero_but_counts_it() {
        // n = 3, reciprocal sum = 1/2 + 1/2 = 1
        let h = harmonic_mean(&[0.0, 2.0, 2.0]).unwrap();
        assert_eq!(h, 3.0);
    }

    #[test]
    fn test_harmonic_mean_all_zero() {
        assert!(matches!(
            harmonic_mean(&[0.0, 0.0]),
            Err(StatsError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_harmonic_means_mixed_datasets() {
        let datasets = vec![vec![1.0, 1.0], vec![], vec![0.0]];
        let results = harmonic_means(&datasets);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], Ok(1.0));
        assert_eq!(results[1], Ok(0.0));
        assert!(results[2].is_err());
    }

    #[test]
    fn test_std_dev_population() {
        // mean=5, variance = 20/4 = 5
        let sd = std_dev(&[2.0, 4.0, 6.0, 8.0]);
        assert!((sd - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_empty_is_zero() {
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_pooled_std_dev_equal_sigmas() {
        let sp = pooled_std_dev(&[(3.0, 10), (3.0, 20)]).unwrap();
        assert!((sp - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_pooled_std_dev_weights_by_dof() {
        // ((4 * 1) + (1 * 4)) / 5 = 8 / 5
        let var = pooled_variance(&[(1.0, 5), (2.0, 2)]).unwrap();
        assert!((var - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_pooled_std_dev_needs_two_pairs() {
        assert_eq!(
            pooled_std_dev(&[(1.0, 5)]),
            Err(StatsError::InsufficientGroups {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_pooled_std_dev_no_dof() {
        assert_eq!(pooled_std_dev(&[(1.0, 1), (2.0, 1)]).unwrap(), 0.0);
    }

    #[test]
    fn test_median_odd_length() {
        assert_eq!(median(&[9.0, 1.0, 5.0, 3.0, 7.0]).unwrap(), 5.0);
    }

    #[test]
    fn test_median_even_length() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_coefficient_of_variation_constant() {
        assert_eq!(coefficient_of_variation(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 8.0);
        assert_eq!(summary.median, 5.0);
        // 4 / (1/2 + 1/4 + 1/6 + 1/8) = 96 / 25
        assert!((summary.harmonic_mean.unwrap() - 3.84).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_all_zero_days() {
        let summary = summarize(&[0.0, 0.0]).unwrap();
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.harmonic_mean, None);
    }
}
