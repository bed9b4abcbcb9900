//! Residual computation for regression models

use crate::errors::{StatsError, StatsResult};
use faer::prelude::*;
use faer::{Mat, Side};

/// Result containing different types of residuals
#[derive(Debug, Clone)]
pub struct ResidualsResult {
    /// Raw residuals: e = y - y_hat
    pub raw: Vec<f64>,
    /// Standardized residuals: e / s (if a residual std error was given)
    pub standardized: Option<Vec<f64>>,
    /// Studentized residuals: e / (s * sqrt(1 - h_ii))
    pub studentized: Option<Vec<f64>>,
    /// Leverage values (hat diagonal)
    pub leverage: Option<Vec<f64>>,
}

/// Compute residuals from observed and predicted values
///
/// Studentized residuals and leverage need the feature matrix `x` and are
/// only computed when `include_studentized` is set.
pub fn compute_residuals(
    y: &[f64],
    y_hat: &[f64],
    x: Option<&[Vec<f64>]>,
    residual_std_error: Option<f64>,
    include_studentized: bool,
) -> StatsResult<ResidualsResult> {
    let n = y.len();
    if n == 0 {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if y_hat.len() != n {
        return Err(StatsError::DimensionMismatchMsg(format!(
            "y has {} elements, y_hat has {}",
            n,
            y_hat.len()
        )));
    }

    let raw: Vec<f64> = y.iter().zip(y_hat).map(|(yi, yhi)| yi - yhi).collect();

    let standardized = residual_std_error.map(|s| {
        if s > 0.0 {
            raw.iter().map(|e| e / s).collect()
        } else {
            raw.clone()
        }
    });

    let (studentized, leverage) = if let (true, Some(x_data)) = (include_studentized, x) {
        studentize(&raw, x_data, residual_std_error)?
    } else {
        (None, None)
    };

    Ok(ResidualsResult {
        raw,
        standardized,
        studentized,
        leverage,
    })
}

// Leverage h_ii = x_i' (X'X)^-1 x_i over the intercept-augmented design.
#[allow(clippy::type_complexity)]
fn studentize(
    raw_residuals: &[f64],
    x: &[Vec<f64>],
    residual_std_error: Option<f64>,
) -> StatsResult<(Option<Vec<f64>>, Option<Vec<f64>>)> {
    let n = raw_residuals.len();
    let k = x.len();
    if k == 0 {
        return Ok((None, None));
    }
    for (j, col) in x.iter().enumerate() {
        if col.len() != n {
            return Err(StatsError::DimensionMismatchMsg(format!(
                "feature {j} has {} observations, expected {n}",
                col.len()
            )));
        }
    }

    let n_cols = k + 1;
    let design = Mat::from_fn(n, n_cols, |i, j| if j == 0 { 1.0 } else { x[j - 1][i] });
    let xt = design.transpose().to_owned();
    let xtx = &xt * &design;

    // Singular design: leave the studentized pieces unset rather than fail
    let chol = match xtx.cholesky(Side::Lower) {
        Ok(c) => c,
        Err(_) => return Ok((None, None)),
    };
    let z = chol.solve(xt.as_ref()); // (X'X)^-1 X', n_cols x n

    let leverage: Vec<f64> = (0..n)
        .map(|i| {
            (0..n_cols)
                .map(|j| design.read(i, j) * z.read(j, i))
                .sum::<f64>()
        })
        .collect();

    let studentized = residual_std_error.map(|s| {
        raw_residuals
            .iter()
            .zip(&leverage)
            .map(|(e, h)| e / (s * (1.0 - h).max(1e-10).sqrt()))
            .collect()
    });

    Ok((studentized, Some(leverage)))
}
