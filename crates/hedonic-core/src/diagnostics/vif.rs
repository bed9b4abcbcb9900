//! Variance Inflation Factor (VIF) computation

use crate::errors::{StatsError, StatsResult};
use crate::models::fit_ols;
use crate::types::OlsOptions;

/// Compute the VIF for each feature
///
/// Each feature is regressed on all the others; VIF_j = 1 / (1 - R²_j).
/// Values above ~10 flag serious multicollinearity in the selected set.
pub fn compute_vif(x: &[Vec<f64>]) -> StatsResult<Vec<f64>> {
    let n_features = x.len();
    if n_features == 0 {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    if n_features == 1 {
        // Nothing to be collinear with
        return Ok(vec![1.0]);
    }

    let n_obs = x[0].len();
    for (j, col) in x.iter().enumerate() {
        if col.len() != n_obs {
            return Err(StatsError::DimensionMismatchMsg(format!(
                "feature {j} has {} observations, expected {n_obs}",
                col.len()
            )));
        }
    }

    let options = OlsOptions {
        fit_intercept: true,
        compute_inference: false,
        confidence_level: 0.95,
    };

    let mut vif_values = Vec::with_capacity(n_features);
    for j in 0..n_features {
        let target = &x[j];
        let others: Vec<Vec<f64>> = x
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != j)
            .map(|(_, col)| col.clone())
            .collect();

        match fit_ols(target, &others, &options) {
            Ok(result) => {
                let r_squared = result.core.r_squared;
                let vif = if r_squared >= 0.9999 {
                    f64::INFINITY
                } else if r_squared < 0.0 {
                    1.0
                } else {
                    1.0 / (1.0 - r_squared)
                };
                vif_values.push(vif);
            }
            // A singular auxiliary regression means perfect collinearity
            Err(_) => vif_values.push(f64::INFINITY),
        }
    }

    Ok(vif_values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vif_single_feature() {
        let x = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0]];
        assert_eq!(compute_vif(&x).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_vif_weakly_related_features() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2 = vec![5.0, 3.0, 6.0, 1.0, 4.0, 2.0];
        let vif = compute_vif(&[x1, x2]).unwrap();
        assert!(vif[0] < 3.0);
        assert!(vif[1] < 3.0);
    }

    #[test]
    fn test_vif_detects_collinearity() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v + 1.0).collect();
        let vif = compute_vif(&[x1, x2]).unwrap();
        assert!(vif[0] > 100.0);
        assert!(vif[1] > 100.0);
    }

    #[test]
    fn test_vif_empty_input() {
        assert!(compute_vif(&[]).is_err());
    }
}
