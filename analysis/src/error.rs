use prodly_core::GraphError;
use thiserror::Error;

/// Errors raised by the analysis layer.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("unknown vendor '{0}'")]
    UnknownVendor(String),

    #[error("unknown migration task '{0}'")]
    UnknownTask(String),

    #[error("vendor '{0}' is already registered")]
    DuplicateVendor(String),

    #[error("invalid vendor id '{0}': must not contain '::'")]
    InvalidVendorId(String),

    #[error("vendor '{vendor}': {field} must be a finite score in 0..=100, got {value}")]
    InvalidMetric {
        vendor: String,
        field: &'static str,
        value: f64,
    },

    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("failed to parse scoring config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
