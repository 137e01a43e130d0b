use rsm_types::{RuleDocument, TargetId};
use serde::Serialize;

use crate::error::StoreResult;

/// What a save did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Human-readable location of the document (a path for file stores).
    pub location: String,
    /// BLAKE3 digest of the saved bytes, hex encoded.
    pub digest: String,
    /// Size of the saved bytes.
    pub bytes: usize,
    /// `false` when the stored bytes were already identical and nothing was
    /// written.
    pub changed: bool,
}

/// Storage backend for target documents.
///
/// Implementations must be thread-safe (`Send + Sync`). Different targets
/// may be loaded and saved concurrently; the same target never is.
pub trait RulesetStore: Send + Sync {
    /// Load a target's document, or an empty one if none is stored.
    fn load(&self, target: &TargetId) -> StoreResult<RuleDocument>;

    /// Serialize and store a target's document, replacing any previous one.
    fn save(&self, target: &TargetId, doc: &RuleDocument) -> StoreResult<SaveOutcome>;

    /// Where `target` lives, for reports and log lines.
    fn location(&self, target: &TargetId) -> String;
}

pub(crate) fn digest_hex(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
