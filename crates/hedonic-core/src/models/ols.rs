//! Ordinary Least Squares (OLS) regression

use crate::errors::{StatsError, StatsResult};
use crate::types::{FitResult, FitResultCore, FitResultInference, OlsOptions};
use faer::prelude::*;
use faer::{Mat, Side};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Fit an OLS regression model
///
/// Coefficients come from a QR least-squares solve; inference statistics
/// (standard errors, t/p-values, confidence intervals, overall F) from the
/// Cholesky inverse of the normal equations.
///
/// # Arguments
/// * `y` - Response variable (n observations)
/// * `x` - Feature matrix (p features, each with n observations)
/// * `options` - Fitting options
pub fn fit_ols(y: &[f64], x: &[Vec<f64>], options: &OlsOptions) -> StatsResult<FitResult> {
    // Validate inputs
    if y.is_empty() {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if x.is_empty() {
        return Err(StatsError::EmptyInput { field: "x" });
    }

    let n_obs = y.len();
    let n_features = x.len();

    for col in x.iter() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatch {
                y_len: n_obs,
                x_rows: col.len(),
            });
        }
    }

    let min_obs = if options.fit_intercept {
        n_features + 1
    } else {
        n_features
    };
    if n_obs <= min_obs {
        return Err(StatsError::InsufficientData {
            rows: n_obs,
            cols: n_features,
        });
    }

    // Filter out rows with NaN/infinite values
    let valid_indices: Vec<usize> = (0..n_obs)
        .filter(|&i| {
            y[i].is_finite() && x.iter().all(|col| col[i].is_finite())
        })
        .collect();

    if valid_indices.is_empty() {
        return Err(StatsError::NoValidData);
    }

    let n_valid = valid_indices.len();
    if n_valid <= min_obs {
        return Err(StatsError::InsufficientData {
            rows: n_valid,
            cols: n_features,
        });
    }

    // Design matrix, intercept column first
    let offset = usize::from(options.fit_intercept);
    let n_cols = n_features + offset;
    let design = Mat::from_fn(n_valid, n_cols, |i, j| {
        if options.fit_intercept && j == 0 {
            1.0
        } else {
            x[j - offset][valid_indices[i]]
        }
    });
    let y_mat = Mat::from_fn(n_valid, 1, |i, _| y[valid_indices[i]]);

    let beta = design.qr().solve_lstsq(y_mat.as_ref());
    for j in 0..n_cols {
        if !beta.read(j, 0).is_finite() {
            return Err(StatsError::SingularMatrix);
        }
    }

    // Residual and total sums of squares
    let fitted = &design * &beta;
    let mut rss = 0.0;
    for i in 0..n_valid {
        let e = y_mat.read(i, 0) - fitted.read(i, 0);
        rss += e * e;
    }
    let y_mean = (0..n_valid).map(|i| y_mat.read(i, 0)).sum::<f64>() / n_valid as f64;
    let tss = if options.fit_intercept {
        (0..n_valid)
            .map(|i| {
                let d = y_mat.read(i, 0) - y_mean;
                d * d
            })
            .sum::<f64>()
    } else {
        (0..n_valid).map(|i| y_mat.read(i, 0).powi(2)).sum::<f64>()
    };

    let df_resid = (n_valid - n_cols) as f64;
    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };
    let adj_r_squared = if tss > 0.0 {
        1.0 - (1.0 - r_squared) * (n_valid as f64 - 1.0) / df_resid
    } else {
        0.0
    };
    let residual_std_error = (rss / df_resid).sqrt();

    let coefficients: Vec<f64> = (0..n_features).map(|j| beta.read(j + offset, 0)).collect();
    let intercept = options.fit_intercept.then(|| beta.read(0, 0));

    let core = FitResultCore {
        coefficients,
        intercept,
        r_squared,
        adj_r_squared,
        residual_std_error,
        n_observations: n_valid,
        n_features,
    };

    let inference = if options.compute_inference {
        Some(compute_inference(
            &design, &core, rss, tss, df_resid, options,
        )?)
    } else {
        None
    };

    Ok(FitResult { core, inference })
}

fn compute_inference(
    design: &Mat<f64>,
    core: &FitResultCore,
    rss: f64,
    tss: f64,
    df_resid: f64,
    options: &OlsOptions,
) -> StatsResult<FitResultInference> {
    let n_cols = design.ncols();
    let offset = usize::from(options.fit_intercept);
    let sigma2 = rss / df_resid;

    let xt = design.transpose().to_owned();
    let xtx = &xt * design;
    let chol = xtx
        .cholesky(Side::Lower)
        .map_err(|_| StatsError::CholeskyFailed)?;
    let xtx_inv = chol.solve(Mat::<f64>::identity(n_cols, n_cols).as_ref());

    let t_dist = StudentsT::new(0.0, 1.0, df_resid)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;
    let t_crit = t_dist.inverse_cdf(1.0 - (1.0 - options.confidence_level) / 2.0);

    let mut std_errors = Vec::with_capacity(core.n_features);
    let mut t_values = Vec::with_capacity(core.n_features);
    let mut p_values = Vec::with_capacity(core.n_features);
    let mut ci_lower = Vec::with_capacity(core.n_features);
    let mut ci_upper = Vec::with_capacity(core.n_features);

    for (j, &coef) in core.coefficients.iter().enumerate() {
        let var = sigma2 * xtx_inv.read(j + offset, j + offset);
        if var < 0.0 {
            return Err(StatsError::SingularMatrix);
        }
        let se = var.sqrt();
        let t = if se > 0.0 { coef / se } else { f64::INFINITY };
        let p = 2.0 * (1.0 - t_dist.cdf(t.abs()));
        std_errors.push(se);
        t_values.push(t);
        p_values.push(p.clamp(0.0, 1.0));
        ci_lower.push(coef - t_crit * se);
        ci_upper.push(coef + t_crit * se);
    }

    // Overall F against the intercept-only model
    let (f_statistic, f_pvalue) = if options.fit_intercept && core.n_features > 0 && rss > 0.0 {
        let q = core.n_features as f64;
        let f = ((tss - rss).max(0.0) / q) / (rss / df_resid);
        let f_dist = FisherSnedecor::new(q, df_resid)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        (Some(f), Some((1.0 - f_dist.cdf(f)).clamp(0.0, 1.0)))
    } else {
        (None, None)
    };

    Ok(FitResultInference {
        std_errors,
        t_values,
        p_values,
        ci_lower,
        ci_upper,
        confidence_level: options.confidence_level,
        f_statistic,
        f_pvalue,
    })
}
