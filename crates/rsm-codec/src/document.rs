//! Rule documents on top of the raw JSON/YAML value layer.

use rsm_types::{DocumentField, Entry, Format, RuleDocument, Value, DEFAULT_VERSION};

use crate::decode::{decode, DecodePolicy};
use crate::error::{CodecError, CodecResult};
use crate::{json, yaml};

const VERSION_FIELD: &str = "version";

/// A parsed document plus how its bytes were decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    pub document: RuleDocument,
    pub used_fallback: bool,
}

/// Decode and parse raw payload bytes in one step.
pub fn parse_bytes(
    raw: &[u8],
    format: Format,
    origin: &str,
    policy: DecodePolicy,
) -> CodecResult<Parsed> {
    let decoded = decode(raw, origin, policy)?;
    let document = parse(&decoded.text, format, origin)?;
    Ok(Parsed {
        document,
        used_fallback: decoded.used_fallback,
    })
}

/// Parse text into a normalized rule document.
///
/// - the top level must be a mapping (a blank YAML document counts as one)
/// - the entries field must be a sequence; absent or null means empty
/// - a non-integer or missing `version` becomes 1
/// - every other field is kept, in place, untouched
pub fn parse(text: &str, format: Format, origin: &str) -> CodecResult<RuleDocument> {
    let top = match format {
        Format::Json => json::parse_value(text, origin)?,
        Format::Yaml => yaml::parse_value(text, origin)?,
    };
    let pairs = match top {
        Value::Mapping(pairs) => pairs,
        other => {
            return Err(CodecError::NotAMapping {
                origin: origin.to_string(),
                found: other.kind_name(),
            })
        }
    };

    let entries_field = format.entries_field();
    let mut version = DEFAULT_VERSION;
    let mut entries = Vec::new();
    let mut fields = Vec::with_capacity(pairs.len() + 1);

    for (name, value) in pairs {
        if name == VERSION_FIELD {
            version = value.as_i64().unwrap_or(DEFAULT_VERSION);
            fields.push(DocumentField::Version);
        } else if name == entries_field {
            entries = match value {
                Value::Sequence(items) => items.into_iter().map(Entry::from_value).collect(),
                Value::Null => Vec::new(),
                other => {
                    return Err(CodecError::EntriesNotSequence {
                        origin: origin.to_string(),
                        field: entries_field,
                        found: other.kind_name(),
                    })
                }
            };
            fields.push(DocumentField::Entries);
        } else {
            fields.push(DocumentField::Extra(name, value));
        }
    }

    if format.writes_version() && !fields.contains(&DocumentField::Version) {
        fields.insert(0, DocumentField::Version);
    }

    Ok(RuleDocument::from_parts(version, entries, fields))
}

/// Serialize a document in `format`. The output always ends with a newline.
pub fn serialize(doc: &RuleDocument, format: Format) -> CodecResult<Vec<u8>> {
    let pairs = doc
        .fields()
        .iter()
        .map(|field| match field {
            DocumentField::Version => (VERSION_FIELD.to_string(), Value::from(doc.version())),
            DocumentField::Entries => (
                format.entries_field().to_string(),
                Value::Sequence(doc.entries().iter().map(Entry::to_value).collect()),
            ),
            DocumentField::Extra(name, value) => (name.clone(), value.clone()),
        })
        .collect();
    let top = Value::Mapping(pairs);

    let mut text = match format {
        Format::Json => json::write_value(&top)?,
        Format::Yaml => yaml::write_value(&top)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text.into_bytes())
}
