//! Information criteria for model comparison (AIC, BIC)

use crate::errors::{StatsError, StatsResult};

/// AIC = n * ln(RSS/n) + 2k
///
/// k counts all parameters including the intercept. Lower is better.
pub fn compute_aic(rss: f64, n: usize, k: usize) -> StatsResult<f64> {
    validate(rss, n)?;
    if rss == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    let n_f = n as f64;
    Ok(n_f * (rss / n_f).ln() + 2.0 * k as f64)
}

/// BIC = n * ln(RSS/n) + k * ln(n)
///
/// Penalizes complexity more heavily than AIC as n grows.
pub fn compute_bic(rss: f64, n: usize, k: usize) -> StatsResult<f64> {
    validate(rss, n)?;
    if rss == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    let n_f = n as f64;
    Ok(n_f * (rss / n_f).ln() + k as f64 * n_f.ln())
}

/// Compute both criteria at once
pub fn compute_aic_bic(rss: f64, n: usize, k: usize) -> StatsResult<(f64, f64)> {
    Ok((compute_aic(rss, n, k)?, compute_bic(rss, n, k)?))
}

fn validate(rss: f64, n: usize) -> StatsResult<()> {
    if n == 0 {
        return Err(StatsError::InvalidInput("n must be > 0".into()));
    }
    if rss < 0.0 {
        return Err(StatsError::InvalidInput("RSS must be non-negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aic_value() {
        // AIC = 100 * ln(0.1) + 6
        let aic = compute_aic(10.0, 100, 3).unwrap();
        assert!((aic - (-224.2585)).abs() < 0.01);
    }

    #[test]
    fn test_bic_value() {
        // BIC = 100 * ln(0.1) + 3 * ln(100)
        let bic = compute_bic(10.0, 100, 3).unwrap();
        assert!((bic - (-216.4430)).abs() < 0.01);
    }

    #[test]
    fn test_bic_exceeds_aic_for_large_n() {
        // With n >= 8, ln(n) > 2 and BIC penalizes harder
        let (aic, bic) = compute_aic_bic(5.0, 50, 4).unwrap();
        assert!(bic > aic);
    }

    #[test]
    fn test_perfect_fit() {
        assert_eq!(compute_aic(0.0, 100, 3).unwrap(), f64::NEG_INFINITY);
        assert_eq!(compute_bic(0.0, 100, 3).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(compute_aic(-1.0, 100, 3).is_err());
        assert!(compute_bic(10.0, 0, 3).is_err());
    }
}
