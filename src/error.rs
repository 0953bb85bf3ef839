use thiserror::Error;

/// Unified error type for nisse operations
#[derive(Error, Debug)]
pub enum NisseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("At least one naming strategy is required")]
    EmptyStrategyList,

    #[error("Repository has no commits")]
    NoCommits,

    #[error("Invalid version: {0}")]
    InvalidVersionSpec(String),

    #[error("Invalid tag pattern: {0}")]
    InvalidPattern(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in nisse
pub type Result<T> = std::result::Result<T, NisseError>;

impl NisseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        NisseError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        NisseError::InvalidVersionSpec(msg.into())
    }

    /// Create a pattern error with context
    pub fn pattern(msg: impl Into<String>) -> Self {
        NisseError::InvalidPattern(msg.into())
    }
}
