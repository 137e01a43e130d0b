use std::collections::HashMap;
use std::sync::RwLock;

use rsm_codec::{parse_bytes, serialize, DecodePolicy};
use rsm_types::{RuleDocument, TargetId};

use crate::error::{StoreError, StoreResult};
use crate::traits::{digest_hex, RulesetStore, SaveOutcome};

/// In-memory, HashMap-based ruleset store.
///
/// Documents are kept as serialized bytes so loads exercise the same codec
/// path as the filesystem store.
#[derive(Debug, Default)]
pub struct InMemoryRulesetStore {
    documents: RwLock<HashMap<TargetId, Vec<u8>>>,
}

impl InMemoryRulesetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes for a target, bypassing serialization.
    pub fn insert_raw(&self, target: TargetId, bytes: impl Into<Vec<u8>>) {
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(target, bytes.into());
    }

    /// The raw bytes stored for a target.
    pub fn raw(&self, target: &TargetId) -> Option<Vec<u8>> {
        self.documents.read().expect("lock poisoned").get(target).cloned()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RulesetStore for InMemoryRulesetStore {
    fn load(&self, target: &TargetId) -> StoreResult<RuleDocument> {
        let Some(raw) = self.raw(target) else {
            return Ok(RuleDocument::empty(target.format()));
        };
        let parsed = parse_bytes(&raw, target.format(), &self.location(target), DecodePolicy::Lenient)
            .map_err(|source| StoreError::Malformed {
                target: target.to_string(),
                source,
            })?;
        Ok(parsed.document)
    }

    fn save(&self, target: &TargetId, doc: &RuleDocument) -> StoreResult<SaveOutcome> {
        let bytes = serialize(doc, target.format()).map_err(|source| StoreError::Encode {
            target: target.to_string(),
            source,
        })?;
        let digest = digest_hex(&bytes);
        let size = bytes.len();

        let mut documents = self.documents.write().expect("lock poisoned");
        let changed = documents.get(target) != Some(&bytes);
        if changed {
            documents.insert(target.clone(), bytes);
        }

        Ok(SaveOutcome {
            location: self.location(target),
            digest,
            bytes: size,
            changed,
        })
    }

    fn location(&self, target: &TargetId) -> String {
        format!("memory:{target}")
    }
}
