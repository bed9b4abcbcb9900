//! Bootstrap variable selection
//!
//! Resamples the training partition B times; each resample cross-validates
//! a lasso regularization strength, fits at the winner, and records which
//! design columns survived shrinkage. Predictors whose survival frequency
//! clears the threshold form the selected set.

mod cv;

pub use cv::{cross_validate_lambda, KFold, LassoCvResult};

use crate::data::{bootstrap_indices, DesignMatrix};
use crate::errors::{StatsError, StatsResult};
use crate::models::fit_lasso;
use crate::types::{LassoCvOptions, LassoOptions, SelectionOptions};
use rand::SeedableRng;
use rayon::prelude::*;

// Coefficients smaller than this (original scale) count as shrunk to zero.
const NONZERO_TOLERANCE: f64 = 1e-12;

/// Outcome of the bootstrap selection run
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// Design column names
    pub column_names: Vec<String>,
    /// Per design column: resamples in which its coefficient survived
    pub column_counts: Vec<usize>,
    /// Source predictor names, in dataset column order
    pub predictor_names: Vec<String>,
    /// Per predictor: survival frequency over the B resamples
    pub frequencies: Vec<f64>,
    /// Indices of predictors meeting the survival threshold
    pub selected: Vec<usize>,
    /// Names of the selected predictors
    pub selected_names: Vec<String>,
    /// Number of resamples
    pub n_bootstrap: usize,
    /// Cross-validated lambda chosen in each resample
    pub chosen_lambdas: Vec<f64>,
}

/// Run bootstrap variable selection over the training rows of a design
///
/// Resamples are independent and run as a rayon parallel map; iteration b
/// derives its RNG from `seed + b`, so results do not depend on scheduling
/// order.
pub fn select_variables(
    design: &DesignMatrix,
    train_indices: &[usize],
    options: &SelectionOptions,
) -> StatsResult<SelectionResult> {
    if options.n_bootstrap == 0 {
        return Err(StatsError::EmptyInput {
            field: "n_bootstrap",
        });
    }
    if !(options.survival_threshold > 0.0 && options.survival_threshold <= 1.0) {
        return Err(StatsError::InvalidThreshold(options.survival_threshold));
    }
    if train_indices.is_empty() {
        return Err(StatsError::EmptyInput {
            field: "train_indices",
        });
    }

    let train = design.select_rows(train_indices);
    let n_rows = train.n_rows();
    let n_cols = train.n_columns();
    if n_cols == 0 {
        return Err(StatsError::EmptyInput { field: "design" });
    }

    tracing::debug!(
        n_bootstrap = options.n_bootstrap,
        n_rows,
        n_cols,
        "starting bootstrap selection"
    );

    let per_resample: Vec<(Vec<bool>, f64)> = (0..options.n_bootstrap)
        .into_par_iter()
        .map(|b| -> StatsResult<(Vec<bool>, f64)> {
            let iteration_seed = options.seed.wrapping_add(b as u64);
            let mut rng = rand::rngs::StdRng::seed_from_u64(iteration_seed);
            let resample = train.select_rows(&bootstrap_indices(n_rows, &mut rng));

            let cv_options = LassoCvOptions {
                seed: options.cv.seed.wrapping_add(b as u64),
                ..options.cv.clone()
            };
            let cv = cross_validate_lambda(&resample.response, &resample.columns, &cv_options)?;

            let lasso_options = LassoOptions {
                lambda: cv.best_lambda,
                fit_intercept: true,
                max_iterations: options.cv.max_iterations,
                tolerance: options.cv.tolerance,
            };
            let fit = fit_lasso(&resample.response, &resample.columns, &lasso_options)?;

            let mask = fit
                .coefficients
                .iter()
                .map(|c| c.abs() > NONZERO_TOLERANCE)
                .collect();
            Ok((mask, cv.best_lambda))
        })
        .collect::<StatsResult<Vec<_>>>()?;

    let mut column_counts = vec![0usize; n_cols];
    let n_predictors = train.predictor_names.len();
    let mut predictor_counts = vec![0usize; n_predictors];
    let mut chosen_lambdas = Vec::with_capacity(options.n_bootstrap);

    for (mask, lambda) in &per_resample {
        for (j, &hit) in mask.iter().enumerate() {
            if hit {
                column_counts[j] += 1;
            }
        }
        // A predictor survives a resample if any of its design columns does
        for p in 0..n_predictors {
            let survived = mask
                .iter()
                .zip(&train.groups)
                .any(|(&hit, &group)| hit && group == p);
            if survived {
                predictor_counts[p] += 1;
            }
        }
        chosen_lambdas.push(*lambda);
    }

    let b = options.n_bootstrap as f64;
    let frequencies: Vec<f64> = predictor_counts.iter().map(|&c| c as f64 / b).collect();
    let selected: Vec<usize> = (0..n_predictors)
        .filter(|&p| frequencies[p] >= options.survival_threshold)
        .collect();

    if selected.is_empty() {
        return Err(StatsError::EmptySelection {
            threshold: options.survival_threshold,
            n_bootstrap: options.n_bootstrap,
        });
    }

    let selected_names = selected
        .iter()
        .map(|&p| train.predictor_names[p].clone())
        .collect();

    tracing::debug!(?selected_names, "bootstrap selection finished");

    Ok(SelectionResult {
        column_names: train.column_names.clone(),
        column_counts,
        predictor_names: train.predictor_names.clone(),
        frequencies,
        selected,
        selected_names,
        n_bootstrap: options.n_bootstrap,
        chosen_lambdas,
    })
}
