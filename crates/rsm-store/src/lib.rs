//! Ruleset storage for the ruleset merge engine.
//!
//! A store maps a [`TargetId`](rsm_types::TargetId) to one serialized rule
//! document. All backends implement [`RulesetStore`]:
//!
//! - [`FsRulesetStore`] — one file per target under a per-format directory
//! - [`InMemoryRulesetStore`] — `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Loading a target that was never saved yields an empty document, not an
//!    error.
//! 2. A stored document that cannot be decoded or parsed is
//!    [`StoreError::Malformed`]; it is never silently replaced.
//! 3. Saves are atomic: write to a temporary file in the destination
//!    directory, then rename over the target.
//! 4. Saved bytes always end with a newline.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsRulesetStore;
pub use memory::InMemoryRulesetStore;
pub use traits::{RulesetStore, SaveOutcome};
