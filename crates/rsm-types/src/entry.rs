use crate::key::{self, EntryKey};
use crate::value::Value;

/// One atomic rule item in a document's entry list.
///
/// Entries are never interpreted. A plain string rule (`"+.example.com"`) is
/// [`Entry::Text`]; anything else (a sing-box rule object, a nested list, a
/// bare number) is [`Entry::Structured`]. Use [`Entry::from_value`] to build
/// entries from parsed values so that strings always land in `Text`.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Text(String),
    Structured(Value),
}

impl Entry {
    /// Classify a parsed value as a text or structured entry.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            other => Self::Structured(other),
        }
    }

    /// Convert back into a plain value for serialization.
    pub fn into_value(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s),
            Self::Structured(v) => v,
        }
    }

    /// Borrowing variant of [`Entry::into_value`].
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Structured(Value::String(s)) => Some(s),
            Self::Structured(_) => None,
        }
    }

    /// Deduplication identity of this entry.
    pub fn key(&self) -> EntryKey {
        key::entry_key(self)
    }
}

impl From<&str> for Entry {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Entry {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Value> for Entry {
    fn from(v: Value) -> Self {
        Self::from_value(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_become_text_entries() {
        assert_eq!(Entry::from_value(Value::from("a.com")), Entry::Text("a.com".into()));
    }

    #[test]
    fn non_strings_become_structured() {
        let v = Value::mapping([("domain", Value::from("a.com"))]);
        assert_eq!(Entry::from_value(v.clone()), Entry::Structured(v));
        assert!(matches!(Entry::from_value(Value::Null), Entry::Structured(Value::Null)));
    }

    #[test]
    fn value_roundtrip() {
        let e = Entry::from("DOMAIN-SUFFIX,example.com");
        assert_eq!(Entry::from_value(e.to_value()), e);
        assert_eq!(e.as_text(), Some("DOMAIN-SUFFIX,example.com"));
    }
}
