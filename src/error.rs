use thiserror::Error;

/// Error types for the simcore library.
#[derive(Error, Debug)]
pub enum SimCoreError {
    /// Unrecognized status token supplied at construction or on a write.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Required construction field absent from a mapping.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A coordinate or name lookup did not resolve to an existing port or parameter.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Residual requested on payloads that do not support subtraction.
    #[error("Non-numeric residual: {0}")]
    NonNumericResidual(String),

    /// Explicit bounds validation failed.
    #[error("Bounds error: {0}")]
    OutOfBounds(String),

    /// A non-callable payload was invoked.
    #[error("Not callable: {0}")]
    NotCallable(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for simcore operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

impl From<String> for SimCoreError {
    fn from(s: String) -> Self {
        SimCoreError::Other(s)
    }
}

impl From<&str> for SimCoreError {
    fn from(s: &str) -> Self {
        SimCoreError::Other(s.to_string())
    }
}
