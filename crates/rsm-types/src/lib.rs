//! Foundation types for the ruleset merge engine.
//!
//! Every other `rsm` crate depends on `rsm-types`. The types here are pure
//! data: no I/O, no network, no format-specific parsing.
//!
//! # Key Types
//!
//! - [`Format`] — the two supported document syntaxes (JSON `rules`, YAML `payload`)
//! - [`Value`] — closed tree for structured entry content
//! - [`Entry`] — one atomic rule item, either text or structured
//! - [`EntryKey`] — canonical identity of an entry used for deduplication
//! - [`RuleDocument`] — versioned container of entries plus pass-through fields
//! - [`TargetId`] — validated name + format of one output rule-set

pub mod document;
pub mod entry;
pub mod error;
pub mod format;
pub mod key;
pub mod target;
pub mod value;

pub use document::{DocumentField, RuleDocument, DEFAULT_VERSION};
pub use entry::Entry;
pub use error::{TypeError, TypeResult};
pub use format::Format;
pub use key::{canonical_string, EntryKey, KeyShape};
pub use target::{validate_target_name, TargetId};
pub use value::Value;
