//! Error types for the indicator updater.

/// Top-level error type for indicator refresh operations.
///
/// The public lifecycle operations (`start`/`stop`/`pause`/`resume`) never
/// fail; errors only surface from the host-supplied refresh action, and the
/// updater logs and skips them rather than propagating.
#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    /// Refreshing a repository's indicator failed.
    #[error("refresh error: {0}")]
    Refresh(String),

    /// The repository source could not produce the current collection.
    #[error("source error: {0}")]
    Source(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, IndicatorError>;
