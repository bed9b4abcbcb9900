//! Nested-model comparison via the partial F-test
//!
//! Used to decide whether interaction terms earn their place in the final
//! regression: each candidate product column is tested one at a time
//! against the base model, and survivors are refit jointly.

use crate::errors::{StatsError, StatsResult};
use crate::models::fit_ols;
use crate::types::{FitResult, FitResultCore, OlsOptions};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Generic result for a statistical test
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test statistic
    pub statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Numerator degrees of freedom
    pub df_numerator: f64,
    /// Denominator degrees of freedom
    pub df_denominator: f64,
    /// Test method/name
    pub method: String,
}

/// Partial F-test comparing nested OLS fits
///
/// `F = ((RSS_r - RSS_f)/q) / (RSS_f/(n - p_f - 1))` where q is the number
/// of added terms. Both fits must come from the same observations.
pub fn partial_f_test(
    reduced: &FitResultCore,
    full: &FitResultCore,
) -> StatsResult<TestResult> {
    if reduced.n_observations != full.n_observations {
        return Err(StatsError::NotNested(format!(
            "reduced model has {} observations, full model has {}",
            reduced.n_observations, full.n_observations
        )));
    }
    if reduced.intercept.is_some() != full.intercept.is_some() {
        return Err(StatsError::NotNested(
            "one model has an intercept, the other does not".into(),
        ));
    }
    if full.n_features <= reduced.n_features {
        return Err(StatsError::NotNested(format!(
            "full model must add terms ({} vs {} predictors)",
            full.n_features, reduced.n_features
        )));
    }

    let n = full.n_observations as f64;
    let q = (full.n_features - reduced.n_features) as f64;
    let p_full = full.n_features as f64 + f64::from(full.intercept.is_some());
    let df_denominator = n - p_full;
    if df_denominator < 1.0 {
        return Err(StatsError::InsufficientDataMsg(
            "no residual degrees of freedom in the full model".into(),
        ));
    }

    let rss_reduced = reduced.rss();
    let rss_full = full.rss();
    let diff = rss_reduced - rss_full;
    if diff < -1e-8 * rss_reduced.max(1.0) {
        return Err(StatsError::NotNested(
            "full model fits worse than the reduced model".into(),
        ));
    }
    let diff = diff.max(0.0);

    let (statistic, p_value) = if rss_full <= 0.0 {
        // Exact fit in the full model: no evidence either way unless the
        // reduced model had residual error left to explain
        if diff <= 0.0 {
            (0.0, 1.0)
        } else {
            (f64::INFINITY, 0.0)
        }
    } else {
        let f = (diff / q) / (rss_full / df_denominator);
        let dist = FisherSnedecor::new(q, df_denominator)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        (f, (1.0 - dist.cdf(f)).clamp(0.0, 1.0))
    };

    Ok(TestResult {
        statistic,
        p_value,
        df_numerator: q,
        df_denominator,
        method: format!(
            "Partial F-test ({} vs {} predictors)",
            reduced.n_features, full.n_features
        ),
    })
}

/// Outcome for a single interaction candidate
#[derive(Debug, Clone)]
pub struct InteractionTest {
    /// Term name, `a:b`
    pub name: String,
    /// Indices of the two base columns forming the product
    pub pair: (usize, usize),
    /// Partial F statistic against the base model
    pub f_statistic: f64,
    /// p-value
    pub p_value: f64,
    /// Whether the term cleared the significance cutoff
    pub retained: bool,
}

/// Result of interaction screening
#[derive(Debug, Clone)]
pub struct InteractionScreen {
    /// One entry per tested candidate (constant products are skipped)
    pub tests: Vec<InteractionTest>,
    /// Pairs retained at the cutoff
    pub retained: Vec<(usize, usize)>,
    /// Joint refit: base columns plus all retained terms, with inference
    pub final_fit: FitResult,
    /// Column names of the joint refit
    pub final_column_names: Vec<String>,
}

/// Elementwise product of two design columns
pub fn interaction_column(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

fn is_constant(col: &[f64]) -> bool {
    col.windows(2).all(|w| w[0] == w[1])
}

/// Screen pairwise interactions of the base columns with partial F-tests
///
/// Each candidate is tested alone against the base model; terms with
/// p < `alpha` are refit jointly to produce the final model.
pub fn screen_interactions(
    y: &[f64],
    x: &[Vec<f64>],
    column_names: &[String],
    alpha: f64,
    confidence_level: f64,
) -> StatsResult<InteractionScreen> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(StatsError::InvalidInput(format!(
            "significance cutoff must be in (0, 1), got {alpha}"
        )));
    }
    if x.len() != column_names.len() {
        return Err(StatsError::DimensionMismatchMsg(format!(
            "{} columns but {} names",
            x.len(),
            column_names.len()
        )));
    }

    let base_options = OlsOptions {
        fit_intercept: true,
        compute_inference: false,
        confidence_level,
    };
    let base = fit_ols(y, x, &base_options)?;

    let mut tests = Vec::new();
    let mut retained = Vec::new();

    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            let term = interaction_column(&x[i], &x[j]);
            // Mutually exclusive dummies multiply to a constant column
            if is_constant(&term) {
                continue;
            }

            let mut augmented = x.to_vec();
            augmented.push(term);
            let full = match fit_ols(y, &augmented, &base_options) {
                Ok(fit) => fit,
                // A collinear product adds no testable information
                Err(StatsError::SingularMatrix) | Err(StatsError::CholeskyFailed) => continue,
                Err(e) => return Err(e),
            };

            let test = partial_f_test(&base.core, &full.core)?;
            let keep = test.p_value < alpha;
            if keep {
                retained.push((i, j));
            }
            tests.push(InteractionTest {
                name: format!("{}:{}", column_names[i], column_names[j]),
                pair: (i, j),
                f_statistic: test.statistic,
                p_value: test.p_value,
                retained: keep,
            });
        }
    }

    let final_options = OlsOptions {
        fit_intercept: true,
        compute_inference: true,
        confidence_level,
    };
    let mut final_columns = x.to_vec();
    let mut final_column_names = column_names.to_vec();
    for &(i, j) in &retained {
        final_columns.push(interaction_column(&x[i], &x[j]));
        final_column_names.push(format!("{}:{}", column_names[i], column_names[j]));
    }
    let final_fit = fit_ols(y, &final_columns, &final_options)?;

    Ok(InteractionScreen {
        tests,
        retained,
        final_fit,
        final_column_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OlsOptions;

    fn fit(y: &[f64], x: &[Vec<f64>]) -> FitResult {
        fit_ols(y, x, &OlsOptions::default()).unwrap()
    }

    #[test]
    fn test_partial_f_detects_added_signal() {
        let x1: Vec<f64> = (1..=20).map(|v| v as f64).collect();
        let x2: Vec<f64> = (1..=20).map(|v| ((v * 7) % 11) as f64).collect();
        let noise = [0.05, -0.03, 0.02, -0.04, 0.01];
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .enumerate()
            .map(|(i, (a, b))| 2.0 * a + 3.0 * b + noise[i % noise.len()])
            .collect();

        let reduced = fit(&y, &[x1.clone()]);
        let full = fit(&y, &[x1, x2]);
        let result = partial_f_test(&reduced.core, &full.core).unwrap();

        assert!(result.statistic > 100.0);
        assert!(result.p_value < 1e-6);
        assert_eq!(result.df_numerator, 1.0);
    }

    #[test]
    fn test_partial_f_rejects_non_nested() {
        let x1: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let y: Vec<f64> = x1.iter().map(|v| 2.0 * v + 1.0).collect();
        let a = fit(&y, &[x1.clone()]);
        let b = fit(&y, &[x1]);

        assert!(matches!(
            partial_f_test(&a.core, &b.core),
            Err(StatsError::NotNested(_))
        ));
    }

    #[test]
    fn test_screen_retains_true_interaction() {
        let x1: Vec<f64> = (1..=30).map(|v| v as f64).collect();
        let x2: Vec<f64> = (0..30).map(|v| f64::from(v % 2 == 0)).collect();
        let noise = [0.3, -0.2, 0.1, -0.4, 0.25, -0.15];
        let y: Vec<f64> = (0..30)
            .map(|i| 1.0 + 2.0 * x1[i] + 3.0 * x2[i] + 1.5 * x1[i] * x2[i] + noise[i % 6])
            .collect();

        let names = vec!["area".to_string(), "prefarea=yes".to_string()];
        let screen = screen_interactions(&y, &[x1, x2], &names, 0.05, 0.95).unwrap();

        assert_eq!(screen.tests.len(), 1);
        assert!(screen.tests[0].retained);
        assert!(screen.tests[0].p_value < 1e-6);
        assert_eq!(screen.retained, vec![(0, 1)]);
        assert_eq!(screen.final_fit.core.n_features, 3);
        assert!(screen
            .final_column_names
            .contains(&"area:prefarea=yes".to_string()));
    }

    #[test]
    fn test_screen_drops_absent_interaction() {
        // Exact additive model: the base fit is already perfect, so the
        // product term cannot improve it
        let x1: Vec<f64> = (1..=25).map(|v| v as f64).collect();
        let x2: Vec<f64> = (1..=25).map(|v| ((v * 3) % 13) as f64).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .map(|(a, b)| 2.0 * a + 3.0 * b)
            .collect();

        let names = vec!["a".to_string(), "b".to_string()];
        let screen = screen_interactions(&y, &[x1, x2], &names, 0.05, 0.95).unwrap();

        assert_eq!(screen.tests.len(), 1);
        assert!(!screen.tests[0].retained);
        assert!(screen.retained.is_empty());
        assert_eq!(screen.final_fit.core.n_features, 2);
    }

    #[test]
    fn test_screen_skips_constant_products() {
        // Two mutually exclusive dummies: their product is identically zero
        let d1: Vec<f64> = (0..24).map(|v| f64::from(v < 8)).collect();
        let d2: Vec<f64> = (0..24).map(|v| f64::from((8..16).contains(&v))).collect();
        let num: Vec<f64> = (1..=24).map(|v| v as f64).collect();
        let noise = [0.2, -0.1, 0.15, -0.25];
        let y: Vec<f64> = (0..24)
            .map(|i| 4.0 * num[i] + 2.0 * d1[i] + noise[i % 4])
            .collect();

        let names = vec!["zone=b".to_string(), "zone=c".to_string(), "area".to_string()];
        let screen = screen_interactions(&y, &[d1, d2, num], &names, 0.05, 0.95).unwrap();

        // (zone=b, zone=c) is skipped; the other two pairs are tested
        assert_eq!(screen.tests.len(), 2);
        assert!(screen
            .tests
            .iter()
            .all(|t| t.p_value >= 0.0 && t.p_value <= 1.0));
    }
}
