//! Error types for the diff crate.

use linedelta_types::TypeError;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The caller passed arguments the engine has no defined behavior for,
    /// such as an edit notification that disagrees with the new line count.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The differencing algorithm violated one of its own invariants.
    /// No partial revision is produced when this happens.
    #[error("algorithm failure: {0}")]
    Algorithm(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] TypeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
