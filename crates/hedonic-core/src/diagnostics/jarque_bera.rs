//! Jarque-Bera test for residual normality

use crate::errors::{StatsError, StatsResult};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of the Jarque-Bera test
#[derive(Debug, Clone)]
pub struct JarqueBeraResult {
    /// JB test statistic
    pub statistic: f64,
    /// p-value (chi-squared with 2 degrees of freedom)
    pub p_value: f64,
    /// Sample skewness
    pub skewness: f64,
    /// Sample excess kurtosis
    pub kurtosis: f64,
    /// Number of observations
    pub n: usize,
}

/// Test whether a sample's skewness and kurtosis match a normal distribution
///
/// Typically applied to regression residuals. NaN values are skipped.
pub fn jarque_bera(data: &[f64]) -> StatsResult<JarqueBeraResult> {
    let clean: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    let n = clean.len();
    if n < 3 {
        return Err(StatsError::InsufficientDataMsg(
            "Jarque-Bera test requires at least 3 observations".into(),
        ));
    }

    let mean: f64 = clean.iter().sum::<f64>() / n as f64;

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for &x in &clean {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n as f64;
    m3 /= n as f64;
    m4 /= n as f64;

    if m2 <= 0.0 {
        return Err(StatsError::InvalidInput("data has zero variance".into()));
    }

    let std_dev = m2.sqrt();
    let skewness = m3 / (std_dev * std_dev * std_dev);
    let kurtosis = m4 / (m2 * m2) - 3.0;

    // JB = n/6 * (S^2 + K^2/4)
    let statistic = (n as f64 / 6.0) * (skewness * skewness + kurtosis * kurtosis / 4.0);

    let chi2 = ChiSquared::new(2.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = (1.0 - chi2.cdf(statistic)).clamp(0.0, 1.0);

    Ok(JarqueBeraResult {
        statistic,
        p_value,
        skewness,
        kurtosis,
        n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_sample_passes() {
        let data: Vec<f64> = vec![
            -1.0, -0.5, 0.0, 0.5, 1.0, -0.8, -0.3, 0.2, 0.7, 1.2, -1.2, -0.7, -0.2, 0.3, 0.8,
            -0.9, -0.4, 0.1, 0.6, 1.1,
        ];

        let result = jarque_bera(&data).unwrap();
        assert!(result.statistic >= 0.0);
        assert!(result.p_value > 0.05);
        assert!(result.skewness.abs() < 0.5);
    }

    #[test]
    fn test_skewed_sample_detected() {
        let data: Vec<f64> = vec![
            1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8, 1.9, 2.0, 2.5, 3.0, 4.0, 5.0, 10.0,
            20.0, 50.0,
        ];

        let result = jarque_bera(&data).unwrap();
        assert!(result.skewness > 1.0);
        assert!(result.p_value < 0.01);
    }

    #[test]
    fn test_chi2_pvalue_matches_closed_form() {
        // For chi-squared with 2 df the survival function is exp(-x/2)
        let data: Vec<f64> = (0..25).map(|i| ((i * 13) % 7) as f64).collect();
        let result = jarque_bera(&data).unwrap();
        assert!((result.p_value - (-result.statistic / 2.0).exp()).abs() < 1e-8);
    }

    #[test]
    fn test_insufficient_data() {
        assert!(jarque_bera(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_nan_skipped() {
        let data = vec![1.0, f64::NAN, 2.0, 3.0, f64::NAN, 4.0, 5.0];
        let result = jarque_bera(&data).unwrap();
        assert_eq!(result.n, 5);
    }
}
