use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid target name {name:?}: {reason}")]
    InvalidTargetName { name: String, reason: String },

    #[error("unknown document format: {0}")]
    UnknownFormat(String),
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
