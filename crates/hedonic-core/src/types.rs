/// Core result from model fitting - always computed
#[derive(Debug, Clone)]
pub struct FitResultCore {
    /// Regression coefficients (excluding intercept)
    pub coefficients: Vec<f64>,
    /// Intercept term (if fitted with intercept)
    pub intercept: Option<f64>,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// Number of observations used
    pub n_observations: usize,
    /// Number of features (excluding intercept)
    pub n_features: usize,
}

impl FitResultCore {
    /// Residual sum of squares recovered from the residual standard error
    pub fn rss(&self) -> f64 {
        let k = self.n_features + usize::from(self.intercept.is_some());
        if self.n_observations <= k {
            return 0.0;
        }
        let df = (self.n_observations - k) as f64;
        self.residual_std_error * self.residual_std_error * df
    }
}

/// Inference results - only computed if requested
#[derive(Debug, Clone)]
pub struct FitResultInference {
    /// Standard errors of coefficients
    pub std_errors: Vec<f64>,
    /// t-statistics for coefficients
    pub t_values: Vec<f64>,
    /// p-values for coefficients
    pub p_values: Vec<f64>,
    /// Lower bound of confidence intervals
    pub ci_lower: Vec<f64>,
    /// Upper bound of confidence intervals
    pub ci_upper: Vec<f64>,
    /// Confidence level used (e.g., 0.95)
    pub confidence_level: f64,
    /// F-statistic for overall model significance
    pub f_statistic: Option<f64>,
    /// p-value for F-statistic
    pub f_pvalue: Option<f64>,
}

/// Combined fit result
#[derive(Debug, Clone)]
pub struct FitResult {
    pub core: FitResultCore,
    pub inference: Option<FitResultInference>,
}

/// Options for OLS fitting
#[derive(Debug, Clone)]
pub struct OlsOptions {
    /// Whether to fit an intercept term
    pub fit_intercept: bool,
    /// Whether to compute inference statistics (std errors, p-values, etc.)
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95)
    pub confidence_level: f64,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            compute_inference: false,
            confidence_level: 0.95,
        }
    }
}

/// Convergence information for iterative methods
#[derive(Debug, Clone)]
pub struct ConvergenceInfo {
    /// Whether the algorithm converged
    pub converged: bool,
    /// Number of iterations performed
    pub iterations: u32,
    /// Final tolerance achieved
    pub final_tolerance: f64,
}

/// Options for lasso regression
#[derive(Debug, Clone)]
pub struct LassoOptions {
    /// Regularization strength (must be >= 0)
    pub lambda: f64,
    /// Whether to fit an intercept term
    pub fit_intercept: bool,
    /// Maximum iterations for coordinate descent
    pub max_iterations: u32,
    /// Convergence tolerance (max absolute coefficient change)
    pub tolerance: f64,
}

impl Default for LassoOptions {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            fit_intercept: true,
            max_iterations: 1000,
            tolerance: 1e-7,
        }
    }
}

/// Options for cross-validating the lasso regularization strength
#[derive(Debug, Clone)]
pub struct LassoCvOptions {
    /// Number of folds
    pub n_folds: usize,
    /// Number of grid points on the lambda path
    pub n_lambdas: usize,
    /// Smallest grid value as a fraction of lambda_max
    pub lambda_min_ratio: f64,
    /// Seed for the fold shuffle
    pub seed: u64,
    /// Coordinate descent iteration cap per fit
    pub max_iterations: u32,
    /// Coordinate descent tolerance per fit
    pub tolerance: f64,
}

impl Default for LassoCvOptions {
    fn default() -> Self {
        Self {
            n_folds: 5,
            n_lambdas: 30,
            lambda_min_ratio: 1e-3,
            seed: 42,
            max_iterations: 1000,
            tolerance: 1e-7,
        }
    }
}

/// Options for bootstrap variable selection
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    /// Number of bootstrap resamples
    pub n_bootstrap: usize,
    /// Fraction of resamples a predictor must survive to be selected
    pub survival_threshold: f64,
    /// Base seed; resample b uses seed + b
    pub seed: u64,
    /// Cross-validation settings applied within each resample
    pub cv: LassoCvOptions,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            n_bootstrap: 200,
            survival_threshold: 0.8,
            seed: 42,
            cv: LassoCvOptions::default(),
        }
    }
}

/// Options for the end-to-end analysis
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,
    /// Bootstrap selection settings
    pub selection: SelectionOptions,
    /// Significance cutoff for interaction partial F-tests
    pub interaction_alpha: f64,
    /// Confidence level for coefficient inference
    pub confidence_level: f64,
    /// Seed for the train/test split (selection derives its own from this)
    pub seed: u64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            selection: SelectionOptions::default(),
            interaction_alpha: 0.05,
            confidence_level: 0.95,
            seed: 42,
        }
    }
}
