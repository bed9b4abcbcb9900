use thiserror::Error;

/// Errors that can occur during the analysis
#[derive(Error, Debug)]
pub enum StatsError {
    // Input validation errors
    #[error("Invalid lambda parameter: {0} (must be >= 0)")]
    InvalidLambda(f64),

    #[error("Invalid survival threshold: {0} (must be in (0, 1])")]
    InvalidThreshold(f64),

    #[error("Invalid test fraction: {0} (must be in (0, 1))")]
    InvalidTestFraction(f64),

    #[error("Invalid fold count: {0} (must be >= 2)")]
    InvalidFolds(usize),

    #[error("Insufficient data: {rows} rows, {cols} features (need rows > features)")]
    InsufficientData { rows: usize, cols: usize },

    #[error("Insufficient data: {0}")]
    InsufficientDataMsg(String),

    #[error("All rows filtered due to NaN values")]
    NoValidData,

    #[error("Dimension mismatch: y has {y_len} elements, X has {x_rows} rows")]
    DimensionMismatch { y_len: usize, x_rows: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatchMsg(String),

    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Numerical errors
    #[error("Matrix is singular or near-singular")]
    SingularMatrix,

    #[error("Cholesky decomposition failed: matrix not positive definite")]
    CholeskyFailed,

    // Selection errors
    #[error("No predictor reached the survival threshold {threshold} over {n_bootstrap} resamples")]
    EmptySelection { threshold: f64, n_bootstrap: usize },

    // Transform errors
    #[error("Box-Cox transform requires a strictly positive response (found {0})")]
    NonPositiveResponse(f64),

    #[error("Models are not nested: {0}")]
    NotNested(String),

    // Dataset errors
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
