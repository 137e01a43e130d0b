use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Serialization syntax of a rule document.
///
/// The two formats carry the same logical document and differ only in the
/// name of the entries field and in their on-disk syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// sing-box style source rule-set: a JSON object with a `rules` array.
    Json,
    /// mihomo style rule provider: a YAML mapping with a `payload` list.
    Yaml,
}

impl Format {
    /// All supported formats.
    pub const ALL: [Format; 2] = [Format::Json, Format::Yaml];

    /// Name of the field that holds the entry sequence.
    pub fn entries_field(self) -> &'static str {
        match self {
            Self::Json => "rules",
            Self::Yaml => "payload",
        }
    }

    /// File extension used for documents in this format (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Resolve a file extension to a format. Accepts `yml` as well.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Whether a freshly created document writes an explicit `version` field.
    pub fn writes_version(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| TypeError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_field_names() {
        assert_eq!(Format::Json.entries_field(), "rules");
        assert_eq!(Format::Yaml.entries_field(), "payload");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(Format::from_extension("JSON"), Some(Format::Json));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("txt"), None);
    }

    #[test]
    fn parse_from_str() {
        assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!(
            "toml".parse::<Format>(),
            Err(TypeError::UnknownFormat("toml".into()))
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Format::Yaml).unwrap();
        assert_eq!(json, "\"yaml\"");
        let back: Format = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(back, Format::Json);
    }
}
