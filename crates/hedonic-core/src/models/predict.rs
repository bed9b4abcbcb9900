//! Linear predictor for fitted models

use crate::errors::{StatsError, StatsResult};

/// Compute `y_hat = X * beta + intercept` over column-major features
///
/// # Arguments
/// * `x` - Feature matrix (p features, each with n observations)
/// * `coefficients` - Fitted coefficients (p values)
/// * `intercept` - Optional intercept term
pub fn predict(
    x: &[Vec<f64>],
    coefficients: &[f64],
    intercept: Option<f64>,
) -> StatsResult<Vec<f64>> {
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    if coefficients.is_empty() {
        return Err(StatsError::EmptyInput {
            field: "coefficients",
        });
    }
    if x.len() != coefficients.len() {
        return Err(StatsError::DimensionMismatch {
            y_len: coefficients.len(),
            x_rows: x.len(),
        });
    }

    let n_obs = x[0].len();
    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                y_len: n_obs,
                x_rows: col.len(),
            });
        }
    }

    let base = intercept.unwrap_or(0.0);
    let predictions = (0..n_obs)
        .map(|i| {
            base + coefficients
                .iter()
                .zip(x)
                .map(|(coef, col)| coef * col[i])
                .sum::<f64>()
        })
        .collect();

    Ok(predictions)
}
