//! Lasso regression (L1-penalised least squares)
//!
//! Cyclic coordinate descent with soft-thresholding on internally
//! standardized predictors. The nonzero pattern of the returned
//! coefficients is what bootstrap selection tallies.

use crate::errors::{StatsError, StatsResult};
use crate::types::{ConvergenceInfo, LassoOptions};

/// Result of a lasso fit
#[derive(Debug, Clone)]
pub struct LassoFit {
    /// Coefficients on the original predictor scale
    pub coefficients: Vec<f64>,
    /// Intercept term (if fitted with intercept)
    pub intercept: Option<f64>,
    /// Regularization strength used
    pub lambda: f64,
    /// Number of coefficients that survived shrinkage
    pub n_nonzero: usize,
    /// Coordinate descent convergence info
    pub convergence: ConvergenceInfo,
}

// Predictors standardized to zero mean and unit variance; a zero sd marks a
// constant column whose coefficient stays pinned at zero.
struct Standardized {
    xs: Vec<Vec<f64>>,
    means: Vec<f64>,
    sds: Vec<f64>,
    yc: Vec<f64>,
    y_mean: f64,
    n: usize,
}

fn validate(y: &[f64], x: &[Vec<f64>]) -> StatsResult<Vec<usize>> {
    if y.is_empty() {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    let n_obs = y.len();
    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                y_len: n_obs,
                x_rows: col.len(),
            });
        }
    }

    let valid: Vec<usize> = (0..n_obs)
        .filter(|&i| y[i].is_finite() && x.iter().all(|col| col[i].is_finite()))
        .collect();
    if valid.is_empty() {
        return Err(StatsError::NoValidData);
    }
    if valid.len() < 2 {
        return Err(StatsError::InsufficientDataMsg(
            "lasso requires at least 2 valid observations".into(),
        ));
    }
    Ok(valid)
}

fn standardize(y: &[f64], x: &[Vec<f64>], valid: &[usize], center: bool) -> Standardized {
    let n = valid.len();
    let n_f = n as f64;

    let y_mean = if center {
        valid.iter().map(|&i| y[i]).sum::<f64>() / n_f
    } else {
        0.0
    };
    let yc: Vec<f64> = valid.iter().map(|&i| y[i] - y_mean).collect();

    let mut xs = Vec::with_capacity(x.len());
    let mut means = Vec::with_capacity(x.len());
    let mut sds = Vec::with_capacity(x.len());

    for col in x {
        let mean = if center {
            valid.iter().map(|&i| col[i]).sum::<f64>() / n_f
        } else {
            0.0
        };
        let var = valid.iter().map(|&i| (col[i] - mean).powi(2)).sum::<f64>() / n_f;
        let sd = var.sqrt();
        if sd > 0.0 {
            xs.push(valid.iter().map(|&i| (col[i] - mean) / sd).collect());
        } else {
            xs.push(vec![0.0; n]);
        }
        means.push(mean);
        sds.push(sd);
    }

    Standardized {
        xs,
        means,
        sds,
        yc,
        y_mean,
        n,
    }
}

fn soft_threshold(z: f64, lambda: f64) -> f64 {
    if z > lambda {
        z - lambda
    } else if z < -lambda {
        z + lambda
    } else {
        0.0
    }
}

/// Smallest lambda at which the lasso solution is all-zero
///
/// Anchor of the cross-validation grid: `max_j |x_jᵀ(y − ȳ)| / n` over
/// standardized columns.
pub fn lambda_max(y: &[f64], x: &[Vec<f64>]) -> StatsResult<f64> {
    let valid = validate(y, x)?;
    let stdz = standardize(y, x, &valid, true);
    let n_f = stdz.n as f64;

    let max = stdz
        .xs
        .iter()
        .map(|col| {
            col.iter()
                .zip(&stdz.yc)
                .map(|(a, b)| a * b)
                .sum::<f64>()
                .abs()
                / n_f
        })
        .fold(0.0_f64, f64::max);
    Ok(max)
}

/// Fit the lasso at a single regularization strength
pub fn fit_lasso(y: &[f64], x: &[Vec<f64>], options: &LassoOptions) -> StatsResult<LassoFit> {
    let mut fits = fit_lasso_path(y, x, &[options.lambda], options)?;
    fits.pop()
        .ok_or_else(|| StatsError::EmptyInput { field: "lambdas" })
}

/// Fit the lasso along a lambda path, warm-starting each fit from the last
///
/// Callers should order `lambdas` from largest to smallest so warm starts
/// track the solution path; fits are returned in the given order.
pub fn fit_lasso_path(
    y: &[f64],
    x: &[Vec<f64>],
    lambdas: &[f64],
    options: &LassoOptions,
) -> StatsResult<Vec<LassoFit>> {
    if lambdas.is_empty() {
        return Err(StatsError::EmptyInput { field: "lambdas" });
    }
    if let Some(&bad) = lambdas.iter().find(|&&l| !(l >= 0.0)) {
        return Err(StatsError::InvalidLambda(bad));
    }

    let valid = validate(y, x)?;
    let stdz = standardize(y, x, &valid, options.fit_intercept);
    let n_f = stdz.n as f64;
    let p = stdz.xs.len();

    let mut beta = vec![0.0_f64; p];
    let mut residual = stdz.yc.clone();
    let mut fits = Vec::with_capacity(lambdas.len());

    for &lambda in lambdas {
        let mut iterations = 0;
        let mut max_delta = f64::INFINITY;
        let mut converged = false;

        while iterations < options.max_iterations {
            iterations += 1;
            max_delta = 0.0;

            for j in 0..p {
                if stdz.sds[j] == 0.0 {
                    continue;
                }
                let old = beta[j];
                // Unit-variance columns make the curvature term 1
                let rho = old
                    + stdz.xs[j]
                        .iter()
                        .zip(&residual)
                        .map(|(a, b)| a * b)
                        .sum::<f64>()
                        / n_f;
                let new = soft_threshold(rho, lambda);
                if new != old {
                    let delta = new - old;
                    for (r, xv) in residual.iter_mut().zip(&stdz.xs[j]) {
                        *r -= xv * delta;
                    }
                    beta[j] = new;
                    max_delta = max_delta.max(delta.abs());
                }
            }

            if max_delta < options.tolerance {
                converged = true;
                break;
            }
        }

        // Back to the original scale
        let coefficients: Vec<f64> = (0..p)
            .map(|j| if stdz.sds[j] > 0.0 { beta[j] / stdz.sds[j] } else { 0.0 })
            .collect();
        let intercept = options.fit_intercept.then(|| {
            stdz.y_mean
                - coefficients
                    .iter()
                    .zip(&stdz.means)
                    .map(|(c, m)| c * m)
                    .sum::<f64>()
        });
        let n_nonzero = coefficients.iter().filter(|c| **c != 0.0).count();

        fits.push(LassoFit {
            coefficients,
            intercept,
            lambda,
            n_nonzero,
            convergence: ConvergenceInfo {
                converged,
                iterations,
                final_tolerance: max_delta,
            },
        });
    }

    Ok(fits)
}
