//! Regression model implementations

mod lasso;
mod ols;
mod predict;

pub use lasso::{fit_lasso, fit_lasso_path, lambda_max, LassoFit};
pub use ols::fit_ols;
pub use predict::predict;
