//! Target identity and name validation.
//!
//! A target name becomes a file stem on disk, so valid names:
//! - Must be non-empty and not surrounded by whitespace
//! - Must not contain path separators or characters Windows rejects in file
//!   names (`/ \ : * ? " < > |`)
//! - Must not contain control characters
//! - Must not contain `..`
//! - Must not start or end with `.`

use std::fmt;

use serde::Serialize;

use crate::error::{TypeError, TypeResult};
use crate::format::Format;

/// Characters that are forbidden anywhere in a target name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Validate a target name, returning `Ok(())` if it is usable as a file stem.
///
/// # Examples
///
/// ```
/// use rsm_types::validate_target_name;
///
/// assert!(validate_target_name("Proxy").is_ok());
/// assert!(validate_target_name("AIGC-extra").is_ok());
/// assert!(validate_target_name("").is_err());
/// assert!(validate_target_name("../escape").is_err());
/// ```
pub fn validate_target_name(name: &str) -> TypeResult<()> {
    let invalid = |reason: String| TypeError::InvalidTargetName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("target name must not be empty".into()));
    }
    if name.trim() != name {
        return Err(invalid("must not start or end with whitespace".into()));
    }
    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(invalid(format!("contains forbidden character: {ch:?}")));
        }
    }
    if let Some(ch) = name.chars().find(|c| c.is_control()) {
        return Err(invalid(format!("contains control character: {ch:?}")));
    }
    if name.contains("..") {
        return Err(invalid("must not contain '..'".into()));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid("must not start or end with '.'".into()));
    }
    Ok(())
}

/// A named rule-set in one format. Maps to exactly one output document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TargetId {
    name: String,
    format: Format,
}

impl TargetId {
    /// Create a target id after validating the name.
    pub fn new(name: impl Into<String>, format: Format) -> TypeResult<Self> {
        let name = name.into();
        validate_target_name(&name)?;
        Ok(Self { name, format })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// File name of the target's document, e.g. `Proxy.json`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format.extension())
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}
