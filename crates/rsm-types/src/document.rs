use crate::entry::Entry;
use crate::format::Format;
use crate::value::Value;

/// Version assigned when a document has no usable `version` field.
pub const DEFAULT_VERSION: i64 = 1;

/// One top-level slot of a rule document, in on-disk order.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentField {
    /// Position of the `version` field.
    Version,
    /// Position of the entries field (`rules` or `payload`).
    Entries,
    /// Any other field, passed through untouched.
    Extra(String, Value),
}

/// A versioned, entry-list-bearing rule document.
///
/// The document owns its entries and remembers where each top-level field sat
/// so that re-saving never reorders a hand-edited file. Extra fields are
/// carried verbatim; the merge engine only ever replaces the entries.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleDocument {
    version: i64,
    entries: Vec<Entry>,
    fields: Vec<DocumentField>,
}

impl RuleDocument {
    /// An empty document laid out the way `format` writes new files.
    pub fn empty(format: Format) -> Self {
        Self::with_entries(format, Vec::new())
    }

    /// A fresh document holding `entries`.
    pub fn with_entries(format: Format, entries: Vec<Entry>) -> Self {
        let fields = if format.writes_version() {
            vec![DocumentField::Version, DocumentField::Entries]
        } else {
            vec![DocumentField::Entries]
        };
        Self {
            version: DEFAULT_VERSION,
            entries,
            fields,
        }
    }

    /// Assemble a document from parsed parts.
    ///
    /// An `Entries` slot is appended if `fields` lacks one. Duplicate
    /// `Version`/`Entries` slots are collapsed to their first occurrence.
    pub fn from_parts(version: i64, entries: Vec<Entry>, fields: Vec<DocumentField>) -> Self {
        let mut seen_version = false;
        let mut seen_entries = false;
        let mut kept = Vec::with_capacity(fields.len() + 1);
        for field in fields {
            match field {
                DocumentField::Version if seen_version => continue,
                DocumentField::Entries if seen_entries => continue,
                DocumentField::Version => seen_version = true,
                DocumentField::Entries => seen_entries = true,
                DocumentField::Extra(..) => {}
            }
            kept.push(field);
        }
        if !seen_entries {
            kept.push(DocumentField::Entries);
        }
        Self {
            version,
            entries,
            fields: kept,
        }
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Replace the entry list. Version and extra fields are untouched.
    pub fn set_entries(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    /// Move the entries out, leaving the document empty.
    pub fn take_entries(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.entries)
    }

    pub fn fields(&self) -> &[DocumentField] {
        &self.fields
    }

    /// Whether the document writes an explicit `version` field.
    pub fn has_version_field(&self) -> bool {
        self.fields.contains(&DocumentField::Version)
    }

    /// Look up a pass-through field by name.
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find_map(|f| match f {
            DocumentField::Extra(k, v) if k == name => Some(v),
            _ => None,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
