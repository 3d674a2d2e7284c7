//! Error types for croprec

/// Result type alias using croprec's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for croprec operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A column the model expects is absent from the request
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// The request carries a column the model was not trained on
    #[error("unexpected column: {0}")]
    UnexpectedColumn(String),

    /// Columns disagree on the number of rows
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// An indexed column has no value for a row index used by another column
    #[error("column '{column}' has no value for index '{index}'")]
    MissingIndex { column: String, index: String },

    /// Array column sent alongside indexed columns
    #[error("array column '{0}' cannot be combined with indexed columns")]
    MixedLayout(String),

    /// A single cell does not satisfy its column's kind
    #[error("column '{column}' row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    /// The request produced a table without rows
    #[error("request contains no rows")]
    EmptyTable,

    /// Model artifact could not be decoded or failed validation
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Predictor failed on an otherwise valid table
    #[error("prediction error: {0}")]
    Prediction(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new prediction error
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid value error
    pub fn invalid_value(column: impl Into<String>, row: usize, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            column: column.into(),
            row,
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_)
                | Self::UnexpectedColumn(_)
                | Self::RaggedColumn { .. }
                | Self::MissingIndex { .. }
                | Self::MixedLayout(_)
                | Self::InvalidValue { .. }
                | Self::EmptyTable
        )
    }
}
