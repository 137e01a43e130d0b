//! Entry identity for deduplication.
//!
//! Text entries are their own key. Structured entries are rendered in a
//! canonical compact form: mapping keys sorted by code point, `,` and `:`
//! separators with no whitespace, sequences in order, strings escaped with
//! JSON rules and non-ASCII characters written as-is. Two structurally equal
//! values produce the same key no matter how their mappings were ordered.

use std::fmt::{self, Write};

use crate::entry::Entry;
use crate::value::Value;

/// Which entry shape produced a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyShape {
    Text,
    Structured,
}

/// Canonical identity of an [`Entry`].
///
/// Equality covers both the shape and the canonical string, so the text entry
/// `"1"` and the number `1` are distinct even though both render as `1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    shape: KeyShape,
    canonical: String,
}

impl EntryKey {
    pub fn shape(&self) -> KeyShape {
        self.shape
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn into_string(self) -> String {
        self.canonical
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Compute the key of an entry. Total and deterministic.
pub fn entry_key(entry: &Entry) -> EntryKey {
    match entry {
        Entry::Text(s) | Entry::Structured(Value::String(s)) => EntryKey {
            shape: KeyShape::Text,
            canonical: s.clone(),
        },
        Entry::Structured(value) => EntryKey {
            shape: KeyShape::Structured,
            canonical: canonical_string(value),
        },
    }
}

/// Canonical compact rendering of a value.
pub fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        // Writing into a String cannot fail.
        Value::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Value::String(s) => write_escaped(s, out),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Mapping(pairs) => {
            let mut sorted: Vec<&(String, Value)> = pairs.iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            out.push('{');
            for (i, (k, v)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_escaped(k, out);
                out.push(':');
                write_canonical(v, out);
            }
            out.push('}');
        }
    }
}

fn write_escaped(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule(pairs: &[(&str, &str)]) -> Entry {
        Entry::Structured(Value::mapping(
            pairs.iter().map(|(k, v)| (*k, Value::from(*v))),
        ))
    }

    #[test]
    fn text_key_is_verbatim() {
        let key = Entry::from("+.example.com").key();
        assert_eq!(key.as_str(), "+.example.com");
        assert_eq!(key.shape(), KeyShape::Text);
    }

    #[test]
    fn map_key_order_does_not_matter() {
        let a = rule(&[("domain", "a.com"), ("type", "full")]);
        let b = rule(&[("type", "full"), ("domain", "a.com")]);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().as_str(), r#"{"domain":"a.com","type":"full"}"#);
        assert_eq!(b.key().into_string(), r#"{"domain":"a.com","type":"full"}"#);
    }

    #[test]
    fn nested_structures_are_canonical() {
        let v = Value::mapping([
            ("z", Value::Sequence(vec![Value::from(2), Value::from(1)])),
            ("a", Value::mapping([("y", Value::Null), ("x", Value::from(true))])),
        ]);
        assert_eq!(canonical_string(&v), r#"{"a":{"x":true,"y":null},"z":[2,1]}"#);
    }

    #[test]
    fn sequence_order_matters() {
        let a = Entry::Structured(Value::Sequence(vec![Value::from("a"), Value::from("b")]));
        let b = Entry::Structured(Value::Sequence(vec![Value::from("b"), Value::from("a")]));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn text_and_structured_never_collide() {
        let text = Entry::from("1");
        let number = Entry::Structured(Value::from(1));
        assert_eq!(text.key().as_str(), number.key().as_str());
        assert_ne!(text.key(), number.key());
    }

    #[test]
    fn structured_string_is_treated_as_text() {
        let a = Entry::Structured(Value::from("a.com"));
        assert_eq!(a.key(), Entry::from("a.com").key());
    }

    #[test]
    fn escaping_is_json_compatible_and_keeps_unicode() {
        let v = Value::mapping([("k", Value::from("quote\" slash\\ tab\t 中文 \u{1}"))]);
        assert_eq!(
            canonical_string(&v),
            "{\"k\":\"quote\\\" slash\\\\ tab\\t 中文 \\u0001\"}"
        );
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z0-9.]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|m| Value::Mapping(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn key_is_deterministic(v in arb_value()) {
            let e = Entry::from_value(v);
            prop_assert_eq!(e.key(), e.clone().key());
        }

        #[test]
        fn key_ignores_mapping_order(pairs in prop::collection::btree_map("[a-z]{1,4}", "[a-z]{0,4}", 0..6)) {
            let forward: Vec<(String, Value)> =
                pairs.iter().map(|(k, v)| (k.clone(), Value::from(v.as_str()))).collect();
            let mut reversed = forward.clone();
            reversed.reverse();
            prop_assert_eq!(
                Entry::Structured(Value::Mapping(forward)).key(),
                Entry::Structured(Value::Mapping(reversed)).key()
            );
        }
    }
}
