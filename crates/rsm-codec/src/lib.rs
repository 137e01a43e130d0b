//! Document codec for the ruleset merge engine.
//!
//! Turns raw payload bytes into a [`RuleDocument`](rsm_types::RuleDocument)
//! and back. Two syntaxes are supported:
//!
//! - JSON (sing-box source rule-sets): an object with a `rules` array
//! - YAML (mihomo rule providers): a mapping with a `payload` list
//!
//! # Pipeline
//!
//! 1. [`decode`] — bytes to text, UTF-8 first, Latin-1 as a tagged fallback
//! 2. [`parse`] — text to a normalized document (`version` defaulted,
//!    entries field checked, extra fields kept in place)
//! 3. [`serialize`] — document to bytes, always newline-terminated
//!
//! Native `serde_json` / `serde_yaml` values never leave this crate; callers
//! only see [`Value`](rsm_types::Value) trees.

pub mod decode;
pub mod document;
pub mod error;
pub mod json;
pub mod yaml;

pub use decode::{decode, DecodePolicy, Decoded};
pub use document::{parse, parse_bytes, serialize, Parsed};
pub use error::{CodecError, CodecResult};
