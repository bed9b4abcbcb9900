//! End-to-end analysis pipeline
//!
//! Runs the full workflow in order: train/test split, bootstrap lasso
//! variable selection, OLS with diagnostics, Box-Cox check of the response
//! with an optional log refit, interaction screening, and held-out
//! evaluation of every fitted model.

use crate::data::{train_test_split, Dataset};
use crate::diagnostics::{
    boxcox_profile, compute_aic_bic, compute_residuals, compute_vif, jarque_bera, BoxCoxResult,
    JarqueBeraResult, ResidualsResult,
};
use crate::errors::{StatsError, StatsResult};
use crate::ftest::{interaction_column, screen_interactions, InteractionTest};
use crate::metrics::{mae, r_squared, rmse, rmse_log_model};
use crate::models::{fit_ols, predict};
use crate::selection::{select_variables, SelectionResult};
use crate::types::{AnalysisOptions, FitResult, OlsOptions};

/// Diagnostics bundle for one fitted model
#[derive(Debug, Clone)]
pub struct ModelDiagnostics {
    /// Training residuals (raw, standardized, studentized, leverage)
    pub residuals: ResidualsResult,
    /// Normality check on the raw residuals
    pub jarque_bera: JarqueBeraResult,
    /// Variance inflation factors of the model columns
    pub vif: Vec<f64>,
    pub aic: f64,
    pub bic: f64,
}

/// Held-out performance, always on the original response scale
#[derive(Debug, Clone)]
pub struct ModelEvaluation {
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
}

/// One fitted model with its diagnostics and held-out evaluation
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub name: String,
    pub column_names: Vec<String>,
    /// Whether the model was fit on ln(response)
    pub log_response: bool,
    pub fit: FitResult,
    pub diagnostics: ModelDiagnostics,
    pub evaluation: ModelEvaluation,
}

/// Everything the analysis produces
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub response_name: String,
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub selection: SelectionResult,
    /// Box-Cox profile of the training response (absent if not positive)
    pub boxcox: Option<BoxCoxResult>,
    /// Whether the working model uses ln(response)
    pub log_transformed: bool,
    pub interaction_tests: Vec<InteractionTest>,
    /// Fitted models in order: base, log refit (optional), interactions
    /// (optional)
    pub models: Vec<FittedModel>,
}

#[allow(clippy::too_many_arguments)]
fn fit_and_evaluate(
    name: &str,
    y_train: &[f64],
    x_train: &[Vec<f64>],
    column_names: &[String],
    y_test_raw: &[f64],
    x_test: &[Vec<f64>],
    log_response: bool,
    confidence_level: f64,
) -> StatsResult<FittedModel> {
    let options = OlsOptions {
        fit_intercept: true,
        compute_inference: true,
        confidence_level,
    };
    let fit = fit_ols(y_train, x_train, &options)?;

    let y_hat = predict(x_train, &fit.core.coefficients, fit.core.intercept)?;
    let residuals = compute_residuals(
        y_train,
        &y_hat,
        Some(x_train),
        Some(fit.core.residual_std_error),
        true,
    )?;
    let jb = jarque_bera(&residuals.raw)?;
    let vif = compute_vif(x_train)?;
    let k = fit.core.n_features + 1;
    let (aic, bic) = compute_aic_bic(fit.core.rss(), fit.core.n_observations, k)?;

    let test_pred = predict(x_test, &fit.core.coefficients, fit.core.intercept)?;
    let evaluation = if log_response {
        let back: Vec<f64> = test_pred.iter().map(|p| p.exp()).collect();
        ModelEvaluation {
            rmse: rmse_log_model(y_test_raw, &test_pred)?,
            mae: mae(y_test_raw, &back)?,
            r_squared: r_squared(y_test_raw, &back)?,
        }
    } else {
        ModelEvaluation {
            rmse: rmse(y_test_raw, &test_pred)?,
            mae: mae(y_test_raw, &test_pred)?,
            r_squared: r_squared(y_test_raw, &test_pred)?,
        }
    };

    tracing::info!(
        model = name,
        r_squared = fit.core.r_squared,
        test_rmse = evaluation.rmse,
        "fitted model"
    );

    Ok(FittedModel {
        name: name.to_string(),
        column_names: column_names.to_vec(),
        log_response,
        fit,
        diagnostics: ModelDiagnostics {
            residuals,
            jarque_bera: jb,
            vif,
            aic,
            bic,
        },
        evaluation,
    })
}

/// Run the full analysis over a dataset
pub fn run_analysis(
    dataset: &Dataset,
    options: &AnalysisOptions,
) -> StatsResult<AnalysisReport> {
    if !(options.confidence_level > 0.0 && options.confidence_level < 1.0) {
        return Err(StatsError::InvalidInput(format!(
            "confidence level must be in (0, 1), got {}",
            options.confidence_level
        )));
    }

    let design = dataset.design_matrix()?;
    let n_rows = design.n_rows();

    let (train_idx, test_idx) = train_test_split(n_rows, options.test_fraction, options.seed)?;
    tracing::info!(
        n_rows,
        n_train = train_idx.len(),
        n_test = test_idx.len(),
        "partitioned dataset"
    );

    let selection = select_variables(&design, &train_idx, &options.selection)?;
    tracing::info!(selected = ?selection.selected_names, "bootstrap selection");

    let col_idx = design.columns_for_predictors(&selection.selected);
    let selected = design.select_columns(&col_idx);
    let train = selected.select_rows(&train_idx);
    let test = selected.select_rows(&test_idx);

    let mut models = Vec::new();

    let base = fit_and_evaluate(
        "ols",
        &train.response,
        &train.columns,
        &train.column_names,
        &test.response,
        &test.columns,
        false,
        options.confidence_level,
    )?;
    models.push(base);

    // Box-Cox needs a strictly positive response
    let boxcox = if train.response.iter().all(|v| *v > 0.0) {
        Some(boxcox_profile(&train.response)?)
    } else {
        tracing::warn!("response is not strictly positive; skipping Box-Cox");
        None
    };
    let log_transformed = boxcox.as_ref().is_some_and(|b| b.suggests_log());

    let y_train_log: Option<Vec<f64>> = log_transformed
        .then(|| train.response.iter().map(|v| v.ln()).collect());

    if let Some(y_log) = &y_train_log {
        tracing::info!("Box-Cox profile suggests a log response; refitting");
        let log_model = fit_and_evaluate(
            "log-ols",
            y_log,
            &train.columns,
            &train.column_names,
            &test.response,
            &test.columns,
            true,
            options.confidence_level,
        )?;
        models.push(log_model);
    }

    // Interaction screening happens on the working response scale
    let working_y: &[f64] = y_train_log.as_deref().unwrap_or(&train.response);
    let screen = screen_interactions(
        working_y,
        &train.columns,
        &train.column_names,
        options.interaction_alpha,
        options.confidence_level,
    )?;
    tracing::info!(
        candidates = screen.tests.len(),
        retained = screen.retained.len(),
        "interaction screening"
    );

    if !screen.retained.is_empty() {
        let mut x_train_full = train.columns.clone();
        let mut x_test_full = test.columns.clone();
        for &(i, j) in &screen.retained {
            x_train_full.push(interaction_column(&train.columns[i], &train.columns[j]));
            x_test_full.push(interaction_column(&test.columns[i], &test.columns[j]));
        }

        let name = if log_transformed {
            "log-ols+interactions"
        } else {
            "ols+interactions"
        };
        let interaction_model = fit_and_evaluate(
            name,
            working_y,
            &x_train_full,
            &screen.final_column_names,
            &test.response,
            &x_test_full,
            log_transformed,
            options.confidence_level,
        )?;
        models.push(interaction_model);
    }

    Ok(AnalysisReport {
        response_name: dataset.response_name().to_string(),
        n_rows,
        n_train: train_idx.len(),
        n_test: test_idx.len(),
        selection,
        boxcox,
        log_transformed,
        interaction_tests: screen.tests,
        models,
    })
}
