//! Error types for the apisign core.

/// Core error type for apisign infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Timestamp is not in the expected format.
    #[error("invalid timestamp: {0:?} (must be decimal Unix seconds)")]
    InvalidTimestamp(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
