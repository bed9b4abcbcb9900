//! Cross-validation of the lasso regularization strength

use crate::errors::{StatsError, StatsResult};
use crate::models::{fit_lasso_path, lambda_max, predict};
use crate::types::{LassoCvOptions, LassoOptions};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// K-fold cross-validator over row indices
///
/// Rows are shuffled with the given seed, then dealt into `n_splits` folds
/// with the remainder spread over the first folds.
#[derive(Debug, Clone)]
pub struct KFold {
    n_splits: usize,
    seed: u64,
}

impl KFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    /// Generate (train, validation) index pairs for each fold
    pub fn split(&self, n_samples: usize) -> StatsResult<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(StatsError::InvalidFolds(self.n_splits));
        }
        if n_samples < self.n_splits {
            return Err(StatsError::InsufficientDataMsg(format!(
                "{} folds need at least {} samples, got {n_samples}",
                self.n_splits, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut result = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let current = fold_size + usize::from(i < remainder);
            let end = start + current;

            let validation = indices[start..end].to_vec();
            let mut train = Vec::with_capacity(n_samples - current);
            train.extend_from_slice(&indices[..start]);
            train.extend_from_slice(&indices[end..]);

            result.push((train, validation));
            start = end;
        }
        Ok(result)
    }
}

/// Result of cross-validating the lambda path
#[derive(Debug, Clone)]
pub struct LassoCvResult {
    /// Grid values, largest first
    pub lambdas: Vec<f64>,
    /// Mean validation MSE per grid value (across folds)
    pub mean_mse: Vec<f64>,
    /// Standard deviation of fold MSEs per grid value
    pub std_mse: Vec<f64>,
    /// Index of the winning grid value
    pub best_index: usize,
    /// Winning regularization strength
    pub best_lambda: f64,
}

fn subset(y: &[f64], x: &[Vec<f64>], indices: &[usize]) -> (Vec<f64>, Vec<Vec<f64>>) {
    let ys = indices.iter().map(|&i| y[i]).collect();
    let xs = x
        .iter()
        .map(|col| indices.iter().map(|&i| col[i]).collect())
        .collect();
    (ys, xs)
}

/// Cross-validate the lasso regularization strength
///
/// Builds a log-spaced grid anchored at `lambda_max`, fits the warm-started
/// path on each fold's training rows, and picks the grid value minimising
/// mean held-out MSE.
pub fn cross_validate_lambda(
    y: &[f64],
    x: &[Vec<f64>],
    options: &LassoCvOptions,
) -> StatsResult<LassoCvResult> {
    if options.n_lambdas == 0 {
        return Err(StatsError::EmptyInput { field: "n_lambdas" });
    }
    if !(0.0..=1.0).contains(&options.lambda_min_ratio) || options.lambda_min_ratio == 0.0 {
        return Err(StatsError::InvalidInput(format!(
            "lambda_min_ratio must be in (0, 1], got {}",
            options.lambda_min_ratio
        )));
    }

    let lmax = lambda_max(y, x)?;
    if lmax <= 0.0 {
        return Err(StatsError::InvalidInput(
            "response is uncorrelated with every predictor (lambda_max = 0)".into(),
        ));
    }

    let lambdas: Vec<f64> = if options.n_lambdas == 1 {
        vec![lmax]
    } else {
        let ln_max = lmax.ln();
        let ln_min = (lmax * options.lambda_min_ratio).ln();
        (0..options.n_lambdas)
            .map(|k| {
                let t = k as f64 / (options.n_lambdas - 1) as f64;
                (ln_max + t * (ln_min - ln_max)).exp()
            })
            .collect()
    };

    let lasso_options = LassoOptions {
        lambda: 0.0, // per-grid value supplied by the path
        fit_intercept: true,
        max_iterations: options.max_iterations,
        tolerance: options.tolerance,
    };

    let folds = KFold::new(options.n_folds, options.seed).split(y.len())?;
    let mut fold_mse = vec![vec![0.0_f64; lambdas.len()]; folds.len()];

    for (f, (train_idx, val_idx)) in folds.iter().enumerate() {
        let (y_train, x_train) = subset(y, x, train_idx);
        let (y_val, x_val) = subset(y, x, val_idx);

        let fits = fit_lasso_path(&y_train, &x_train, &lambdas, &lasso_options)?;
        for (k, fit) in fits.iter().enumerate() {
            let y_hat = predict(&x_val, &fit.coefficients, fit.intercept)?;
            let sse: f64 = y_val
                .iter()
                .zip(&y_hat)
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            fold_mse[f][k] = sse / y_val.len() as f64;
        }
    }

    let n_folds = folds.len() as f64;
    let mean_mse: Vec<f64> = (0..lambdas.len())
        .map(|k| fold_mse.iter().map(|row| row[k]).sum::<f64>() / n_folds)
        .collect();
    let std_mse: Vec<f64> = (0..lambdas.len())
        .map(|k| {
            let m = mean_mse[k];
            let var = fold_mse
                .iter()
                .map(|row| (row[k] - m).powi(2))
                .sum::<f64>()
                / n_folds;
            var.sqrt()
        })
        .collect();

    // Ties break toward the larger (sparser) lambda
    let best_index = mean_mse
        .iter()
        .enumerate()
        .fold(0, |best, (k, &mse)| if mse < mean_mse[best] { k } else { best });

    Ok(LassoCvResult {
        best_lambda: lambdas[best_index],
        best_index,
        lambdas,
        mean_mse,
        std_mse,
    })
}
