//! Filesystem-backed ruleset store.
//!
//! Layout: `<json_dir>/<name>.json` and `<yaml_dir>/<name>.yaml`. Directories
//! are created on first save.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rsm_codec::{parse_bytes, serialize, DecodePolicy};
use rsm_types::{Format, RuleDocument, TargetId};
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};
use crate::traits::{digest_hex, RulesetStore, SaveOutcome};

/// Stores each target as one file in a per-format directory.
#[derive(Clone, Debug)]
pub struct FsRulesetStore {
    json_dir: PathBuf,
    yaml_dir: PathBuf,
    policy: DecodePolicy,
}

impl FsRulesetStore {
    pub fn new(json_dir: impl Into<PathBuf>, yaml_dir: impl Into<PathBuf>) -> Self {
        Self {
            json_dir: json_dir.into(),
            yaml_dir: yaml_dir.into(),
            policy: DecodePolicy::default(),
        }
    }

    /// Decode policy applied when reading existing documents.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Directory holding documents of `format`.
    pub fn dir_for(&self, format: Format) -> &Path {
        match format {
            Format::Json => &self.json_dir,
            Format::Yaml => &self.yaml_dir,
        }
    }

    /// Full path of a target's document.
    pub fn path_for(&self, target: &TargetId) -> PathBuf {
        self.dir_for(target.format()).join(target.file_name())
    }
}

impl RulesetStore for FsRulesetStore {
    fn load(&self, target: &TargetId) -> StoreResult<RuleDocument> {
        let path = self.path_for(target);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no local document, starting empty");
                return Ok(RuleDocument::empty(target.format()));
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let origin = path.display().to_string();
        let parsed = parse_bytes(&raw, target.format(), &origin, self.policy).map_err(|source| {
            StoreError::Malformed {
                target: target.to_string(),
                source,
            }
        })?;
        if parsed.used_fallback {
            tracing::warn!(path = %origin, "local document is not UTF-8, decoded as Latin-1");
        }
        Ok(parsed.document)
    }

    fn save(&self, target: &TargetId, doc: &RuleDocument) -> StoreResult<SaveOutcome> {
        let path = self.path_for(target);
        let bytes = serialize(doc, target.format()).map_err(|source| StoreError::Encode {
            target: target.to_string(),
            source,
        })?;
        let digest = digest_hex(&bytes);

        let changed = match fs::read(&path) {
            Ok(existing) => digest_hex(&existing) != digest,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        if changed {
            write_atomic(&path, &bytes)?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
        } else {
            tracing::debug!(path = %path.display(), "document unchanged, skipping write");
        }

        Ok(SaveOutcome {
            location: path.display().to_string(),
            digest,
            bytes: bytes.len(),
            changed,
        })
    }

    fn location(&self, target: &TargetId) -> String {
        self.path_for(target).display().to_string()
    }
}

/// Write `bytes` to a temporary file next to `path`, then rename it into
/// place so readers never observe a partial document.
fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsm_types::Entry;

    fn store_in(dir: &Path) -> FsRulesetStore {
        FsRulesetStore::new(dir.join("singbox"), dir.join("mihomo"))
    }

    #[test]
    fn missing_document_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let target = TargetId::new("Proxy", Format::Json).unwrap();
        let doc = store.load(&target).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn save_creates_directories_and_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let target = TargetId::new("Direct", Format::Yaml).unwrap();
        let doc = RuleDocument::with_entries(Format::Yaml, vec![Entry::from("a.com"), Entry::from("b.com")]);

        let outcome = store.save(&target, &doc).unwrap();
        assert!(outcome.changed);
        let path = tmp.path().join("mihomo").join("Direct.yaml");
        assert_eq!(outcome.location, path.display().to_string());
        assert!(path.exists());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(store.load(&target).unwrap().entries(), doc.entries());
    }

    #[test]
    fn identical_save_is_reported_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let target = TargetId::new("Proxy", Format::Json).unwrap();
        let doc = RuleDocument::with_entries(Format::Json, vec![Entry::from("a.com")]);

        let first = store.save(&target, &doc).unwrap();
        let second = store.save(&target, &doc).unwrap();
        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(first.digest, second.digest);
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn malformed_local_document_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let target = TargetId::new("Proxy", Format::Json).unwrap();
        let path = store.path_for(&target);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[\"not\", \"a\", \"mapping\"]").unwrap();

        let err = store.load(&target).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("Proxy.json"));
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        let target = TargetId::new("AIGC", Format::Json).unwrap();
        store.save(&target, &RuleDocument::empty(Format::Json)).unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path().join("singbox"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["AIGC.json".to_string()]);
    }

    #[test]
    fn strict_policy_rejects_latin1_local_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path()).with_decode_policy(DecodePolicy::Strict);
        let target = TargetId::new("Dev", Format::Yaml).unwrap();
        let path = store.path_for(&target);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"payload:\n  - caf\xE9.com\n").unwrap();
        assert!(store.load(&target).unwrap_err().is_malformed());

        let lenient = store_in(tmp.path());
        assert_eq!(lenient.load(&target).unwrap().entries(), &[Entry::from("café.com")]);
    }
}
