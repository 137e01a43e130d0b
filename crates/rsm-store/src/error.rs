use std::path::PathBuf;

use rsm_codec::CodecError;

/// Errors from ruleset store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored document exists but cannot be normalized.
    #[error("local document for {target} is malformed: {source}")]
    Malformed {
        target: String,
        #[source]
        source: CodecError,
    },

    /// The document could not be serialized for writing.
    #[error("failed to encode document for {target}: {source}")]
    Encode {
        target: String,
        #[source]
        source: CodecError,
    },

    /// Reading the backing file failed for a reason other than absence.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating directories, writing, or renaming the output failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Whether the failure came from loading an unusable local document.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
