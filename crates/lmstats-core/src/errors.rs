use thiserror::Error;

/// Errors that can occur during model fitting and comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    // Input validation errors
    #[error("Empty input: {field} cannot be empty")]
    EmptyInput { field: &'static str },

    #[error("Dimension mismatch: y has {y_len} elements, X has {x_rows} rows")]
    DimensionMismatch { y_len: usize, x_rows: usize },

    #[error("Non-finite value in {field} at row {row}")]
    NonFiniteValue { field: String, row: usize },

    #[error("Insufficient data: {rows} rows, {cols} columns (need rows > columns)")]
    InsufficientData { rows: usize, cols: usize },

    #[error("Invalid confidence level: {0} (must be in (0, 1))")]
    InvalidConfidenceLevel(f64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Data and model specification errors
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Level '{level}' not found in factor '{factor}'")]
    UnknownLevel { factor: String, level: String },

    #[error("Factor '{0}' has fewer than two levels")]
    SingleLevel(String),

    #[error("Formula parse error: {0}")]
    FormulaParse(String),

    #[error("Unsupported term '{0}' for this model")]
    UnsupportedTerm(String),

    // Numerical errors
    #[error("Design matrix is rank deficient: column '{column}' is linearly dependent on earlier columns")]
    RankDeficient { column: String },

    #[error("Distribution error: {0}")]
    Distribution(String),

    // Model comparison errors
    #[error("Models are not nested: {0}")]
    NotNested(String),

    #[error("Invalid model comparison: {0}")]
    InvalidComparison(String),
}

/// Result type for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
