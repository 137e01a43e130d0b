use std::path::PathBuf;

use rsm_fetch::FetchError;
use rsm_store::StoreError;
use rsm_types::TypeError;
use thiserror::Error;

/// Errors that abort one target (or, for construction errors, the run).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read source list {}: {source}", .path.display())]
    SourceList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Loading the local document or writing the result failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Two plans in one batch resolve to the same output document.
    #[error("duplicate target {0}: each output document may be written by one plan only")]
    DuplicateTarget(String),
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TypeError),

    #[error("validation: {0}")]
    Validation(String),
}

/// Errors from invoking a downstream rule-set compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("compiler executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),

    #[error("input document not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("failed to launch {}: {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compiling {} failed ({}): {stderr}", .input.display(), status_label(.status))]
    Failed {
        input: PathBuf,
        status: Option<i32>,
        stderr: String,
    },
}

fn status_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}
