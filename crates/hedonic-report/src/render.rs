//! Markdown rendering of an analysis report
//!
//! Tables only; plotting is out of scope.

use hedonic_core::pipeline::{AnalysisReport, FittedModel};
use std::fmt::Write as _;

fn num(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let a = v.abs();
    if a >= 1e5 || a < 1e-3 {
        format!("{v:.3e}")
    } else {
        format!("{v:.4}")
    }
}

/// Render the full report as markdown
pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Hedonic price analysis: {}", report.response_name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} rows; {} train / {} test.",
        report.n_rows, report.n_train, report.n_test
    );
    let _ = writeln!(out);

    render_selection(&mut out, report);
    render_boxcox(&mut out, report);
    for model in &report.models {
        render_model(&mut out, model);
    }
    render_interactions(&mut out, report);
    render_evaluation(&mut out, report);

    out
}

fn render_selection(out: &mut String, report: &AnalysisReport) {
    let sel = &report.selection;
    let _ = writeln!(out, "## Variable selection");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} bootstrap resamples; survival frequencies per predictor:",
        sel.n_bootstrap
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| predictor | frequency | selected |");
    let _ = writeln!(out, "|---|---|---|");
    for (p, name) in sel.predictor_names.iter().enumerate() {
        let mark = if sel.selected.contains(&p) { "yes" } else { "" };
        let _ = writeln!(out, "| {} | {} | {} |", name, num(sel.frequencies[p]), mark);
    }
    let _ = writeln!(out);

    let mean_lambda =
        sel.chosen_lambdas.iter().sum::<f64>() / sel.chosen_lambdas.len() as f64;
    let _ = writeln!(
        out,
        "Mean cross-validated lambda across resamples: {}.",
        num(mean_lambda)
    );
    let _ = writeln!(out);
}

fn render_boxcox(out: &mut String, report: &AnalysisReport) {
    let _ = writeln!(out, "## Box-Cox transform");
    let _ = writeln!(out);
    match &report.boxcox {
        Some(result) => {
            let _ = writeln!(
                out,
                "Profile optimum at lambda = {} (log-likelihood {}).",
                num(result.lambda),
                num(result.log_likelihood)
            );
            let _ = writeln!(
                out,
                "{}",
                if report.log_transformed {
                    "The optimum is near zero: the response is modelled as ln(y)."
                } else {
                    "No transform applied."
                }
            );
        }
        None => {
            let _ = writeln!(out, "Skipped: the response is not strictly positive.");
        }
    }
    let _ = writeln!(out);
}

fn render_model(out: &mut String, model: &FittedModel) {
    let core = &model.fit.core;
    let _ = writeln!(out, "## Model: {}", model.name);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "R² = {}, adjusted R² = {}, residual std error = {} ({} observations).",
        num(core.r_squared),
        num(core.adj_r_squared),
        num(core.residual_std_error),
        core.n_observations
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "| term | estimate | std error | t | p | CI |");
    let _ = writeln!(out, "|---|---|---|---|---|---|");
    if let Some(intercept) = core.intercept {
        let _ = writeln!(out, "| (intercept) | {} | | | | |", num(intercept));
    }
    if let Some(inference) = &model.fit.inference {
        for (j, name) in model.column_names.iter().enumerate() {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | [{}, {}] |",
                name,
                num(core.coefficients[j]),
                num(inference.std_errors[j]),
                num(inference.t_values[j]),
                num(inference.p_values[j]),
                num(inference.ci_lower[j]),
                num(inference.ci_upper[j]),
            );
        }
    }
    let _ = writeln!(out);

    if let Some(inference) = &model.fit.inference {
        if let (Some(f), Some(p)) = (inference.f_statistic, inference.f_pvalue) {
            let _ = writeln!(out, "Overall F = {} (p = {}).", num(f), num(p));
        }
    }

    let d = &model.diagnostics;
    let max_vif = d.vif.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let _ = writeln!(
        out,
        "Diagnostics: Jarque-Bera p = {}, AIC = {}, BIC = {}, max VIF = {}.",
        num(d.jarque_bera.p_value),
        num(d.aic),
        num(d.bic),
        num(max_vif)
    );
    let _ = writeln!(out);
}

fn render_interactions(out: &mut String, report: &AnalysisReport) {
    let _ = writeln!(out, "## Interaction tests");
    let _ = writeln!(out);
    if report.interaction_tests.is_empty() {
        let _ = writeln!(out, "No interaction candidates to test.");
        let _ = writeln!(out);
        return;
    }
    let _ = writeln!(out, "| term | F | p | retained |");
    let _ = writeln!(out, "|---|---|---|---|");
    for test in &report.interaction_tests {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            test.name,
            num(test.f_statistic),
            num(test.p_value),
            if test.retained { "yes" } else { "" }
        );
    }
    let _ = writeln!(out);
}

fn render_evaluation(out: &mut String, report: &AnalysisReport) {
    let _ = writeln!(out, "## Held-out evaluation");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Metrics on the original response scale; log-model predictions are"
    );
    let _ = writeln!(out, "exponentiated before scoring.");
    let _ = writeln!(out);
    let _ = writeln!(out, "| model | RMSE | MAE | R² |");
    let _ = writeln!(out, "|---|---|---|---|");
    for model in &report.models {
        let e = &model.evaluation;
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            model.name,
            num(e.rmse),
            num(e.mae),
            num(e.r_squared)
        );
    }
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hedonic_core::data::{Column, ColumnData, Dataset};
    use hedonic_core::pipeline::run_analysis;
    use hedonic_core::{AnalysisOptions, LassoCvOptions, SelectionOptions};

    fn small_report() -> AnalysisReport {
        let area: Vec<f64> = (1..=60).map(|v| v as f64).collect();
        let lot: Vec<f64> = (1..=60).map(|v| ((v * 37) % 61) as f64).collect();
        let price: Vec<f64> = area.iter().map(|v| 5.0 * v).collect();

        let dataset = Dataset::new(
            vec![
                Column {
                    name: "price".into(),
                    data: ColumnData::Numeric(price),
                },
                Column {
                    name: "area".into(),
                    data: ColumnData::Numeric(area),
                },
                Column {
                    name: "lot".into(),
                    data: ColumnData::Numeric(lot),
                },
            ],
            "price",
        )
        .unwrap();

        let options = AnalysisOptions {
            selection: SelectionOptions {
                n_bootstrap: 10,
                survival_threshold: 0.7,
                seed: 42,
                cv: LassoCvOptions {
                    n_folds: 4,
                    n_lambdas: 10,
                    ..Default::default()
                },
            },
            ..Default::default()
        };
        run_analysis(&dataset, &options).unwrap()
    }

    #[test]
    fn test_render_contains_sections() {
        let markdown = render_markdown(&small_report());

        assert!(markdown.contains("# Hedonic price analysis: price"));
        assert!(markdown.contains("## Variable selection"));
        assert!(markdown.contains("| area |"));
        assert!(markdown.contains("## Box-Cox transform"));
        assert!(markdown.contains("## Model: ols"));
        assert!(markdown.contains("(intercept)"));
        assert!(markdown.contains("## Held-out evaluation"));
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(0.0), "0");
        assert_eq!(num(1.5), "1.5000");
        assert!(num(1.0e6).contains('e'));
        assert!(num(2.0e-7).contains('e'));
        assert_eq!(num(f64::INFINITY), "inf");
    }
}
