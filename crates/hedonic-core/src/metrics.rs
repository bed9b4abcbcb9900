//! Held-out evaluation metrics

use crate::errors::{StatsError, StatsResult};

fn validate(actual: &[f64], predicted: &[f64]) -> StatsResult<()> {
    if actual.is_empty() {
        return Err(StatsError::EmptyInput { field: "actual" });
    }
    if actual.len() != predicted.len() {
        return Err(StatsError::DimensionMismatch {
            y_len: actual.len(),
            x_rows: predicted.len(),
        });
    }
    Ok(())
}

/// Root mean squared error
pub fn rmse(actual: &[f64], predicted: &[f64]) -> StatsResult<f64> {
    validate(actual, predicted)?;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    Ok(mse.sqrt())
}

/// Mean absolute error
pub fn mae(actual: &[f64], predicted: &[f64]) -> StatsResult<f64> {
    validate(actual, predicted)?;
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64)
}

/// Coefficient of determination on held-out data
///
/// Can be negative when the model predicts worse than the held-out mean.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> StatsResult<f64> {
    validate(actual, predicted)?;
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let tss: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let rss: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    if tss <= 0.0 {
        return Err(StatsError::InvalidInput(
            "held-out response has no variance".into(),
        ));
    }
    Ok(1.0 - rss / tss)
}

/// RMSE of a log-response model on the original scale
///
/// Predictions made on ln(y) are exponentiated back before comparing
/// against the raw held-out response.
pub fn rmse_log_model(actual_raw: &[f64], predicted_log: &[f64]) -> StatsResult<f64> {
    validate(actual_raw, predicted_log)?;
    let back: Vec<f64> = predicted_log.iter().map(|p| p.exp()).collect();
    rmse(actual_raw, &back)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmse_known_value() {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        let predicted = vec![1.0, 2.0, 3.0, 6.0];
        // MSE = 4/4 = 1
        assert!((rmse(&actual, &predicted).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mae_known_value() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![2.0, 2.0, 1.0];
        assert!((mae(&actual, &predicted).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_r_squared_perfect_and_mean() {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        assert!((r_squared(&actual, &actual).unwrap() - 1.0).abs() < 1e-12);

        let mean_pred = vec![2.5; 4];
        assert!(r_squared(&actual, &mean_pred).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_rmse_log_model_back_transform() {
        let actual_raw: Vec<f64> = vec![10.0, 100.0, 1000.0];
        let predicted_log: Vec<f64> = actual_raw.iter().map(|v| v.ln()).collect();
        assert!(rmse_log_model(&actual_raw, &predicted_log).unwrap() < 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(rmse(&[1.0], &[1.0, 2.0]).is_err());
        assert!(mae(&[], &[]).is_err());
    }
}
