//! Merge engine for rule entry lists.
//!
//! Combines a local entry list with any number of incoming lists:
//!
//! 1. Local entries come first, in their original order. Later local
//!    duplicates (by [`EntryKey`](rsm_types::EntryKey)) are dropped.
//! 2. Each incoming list is folded in, in order. An entry is appended only if
//!    its key has not been seen yet.
//! 3. The number of appended entries is reported per incoming list.
//!
//! [`merge`] is the one-shot form; [`MergeSet`] keeps the seen-key set alive
//! across several sources so a multi-source fold does not rebuild it.

pub mod merge;

pub use merge::{dedupe, merge, Absorbed, MergeResult, MergeSet};
