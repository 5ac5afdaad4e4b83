use thiserror::Error;

use crate::fields::bounds::BoundsError;

/// Error types for the fitparams-rs library.
#[derive(Error, Debug)]
pub enum FitParamsError {
    /// A field was declared to depend on itself.
    #[error("The field '{field}' cannot depend on itself")]
    InvalidDependency { field: String },

    /// A circular dependency between fields. The fields are listed in the
    /// order in which the cycle was found.
    #[error("Circular dependency between fields: {}", fields.join(" -> "))]
    CircularDependency { fields: Vec<String> },

    /// A field kind that is not one of the recognized variants.
    #[error("Unsupported kind '{kind}' for field '{field}'")]
    UnsupportedFieldKind { field: String, kind: String },

    /// An array of the wrong length was passed to a conversion.
    #[error("Shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A field name that is not part of the record layout.
    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    /// A field name declared more than once in a record layout.
    #[error("Field '{name}' is declared more than once")]
    DuplicateField { name: String },

    /// A field value required for a conversion was not provided.
    #[error("No value for field '{name}'")]
    MissingValue { name: String },

    /// Invalid bounds in a field declaration.
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Error raised by a model function while evaluating residuals.
    #[error("Model evaluation error: {0}")]
    ModelEvaluation(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for fitparams-rs operations.
pub type Result<T> = std::result::Result<T, FitParamsError>;

impl From<String> for FitParamsError {
    fn from(s: String) -> Self {
        FitParamsError::Other(s)
    }
}

impl From<&str> for FitParamsError {
    fn from(s: &str) -> Self {
        FitParamsError::Other(s.to_string())
    }
}
