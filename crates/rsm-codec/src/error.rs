use rsm_types::Format;
use thiserror::Error;

/// Errors from decoding, parsing, or serializing rule documents.
///
/// Every parse-side variant names the payload's origin (a URL or a file path)
/// so a log line is enough to find the offending source.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes could not be decoded under the active decode policy.
    #[error("{origin}: payload is not valid UTF-8: {reason}")]
    Decode { origin: String, reason: String },

    /// The text is not valid JSON/YAML.
    #[error("{origin}: invalid {format} syntax: {message}")]
    Syntax {
        origin: String,
        format: Format,
        message: String,
    },

    /// The top-level value is not a mapping.
    #[error("{origin}: top-level value must be a mapping, found {found}")]
    NotAMapping { origin: String, found: &'static str },

    /// The entries field exists but is not a sequence.
    #[error("{origin}: field `{field}` must be a sequence, found {found}")]
    EntriesNotSequence {
        origin: String,
        field: &'static str,
        found: &'static str,
    },

    /// A value that has no representation in the document model.
    #[error("{origin}: unsupported value: {reason}")]
    UnsupportedValue { origin: String, reason: String },

    /// Writing the document out failed.
    #[error("failed to serialize {format} document: {message}")]
    Serialize { format: Format, message: String },
}

impl CodecError {
    /// Whether this error happened while turning bytes into text.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
