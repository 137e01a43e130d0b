use std::collections::HashSet;

use rsm_types::{Entry, EntryKey};
use serde::Serialize;

/// Outcome of a one-shot [`merge`].
#[derive(Clone, Debug, PartialEq)]
pub struct MergeResult {
    pub merged_entries: Vec<Entry>,
    /// Entries appended from the incoming list.
    pub added: usize,
}

/// Counts for one incoming list folded into a [`MergeSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Absorbed {
    /// Entries in the incoming list.
    pub seen: usize,
    /// Entries that were new and got appended.
    pub added: usize,
}

impl Absorbed {
    /// Incoming entries skipped as duplicates.
    pub fn duplicates(&self) -> usize {
        self.seen - self.added
    }
}

/// Ordered, key-deduplicated accumulator of entries.
///
/// Invariant: no two entries in `entries` share an [`EntryKey`], and `seen`
/// holds exactly the keys of `entries`.
#[derive(Clone, Debug, Default)]
pub struct MergeSet {
    seen: HashSet<EntryKey>,
    entries: Vec<Entry>,
}

impl MergeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the set with local entries. The first occurrence of each key
    /// wins; later duplicates are dropped silently.
    pub fn from_local(local: Vec<Entry>) -> Self {
        let mut set = Self {
            seen: HashSet::with_capacity(local.len()),
            entries: Vec::with_capacity(local.len()),
        };
        let total = local.len();
        set.push_all(local);
        let dropped = total - set.entries.len();
        if dropped > 0 {
            tracing::debug!(dropped, "dropped duplicate local entries");
        }
        set
    }

    /// Fold an incoming list in. Unseen entries are appended in order.
    pub fn absorb<I>(&mut self, incoming: I) -> Absorbed
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut seen = 0;
        let before = self.entries.len();
        for entry in incoming {
            seen += 1;
            self.push(entry);
        }
        Absorbed {
            seen,
            added: self.entries.len() - before,
        }
    }

    /// Whether an entry with the same key is already present.
    pub fn contains(&self, entry: &Entry) -> bool {
        self.seen.contains(&entry.key())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push_all(&mut self, entries: Vec<Entry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    fn push(&mut self, entry: Entry) -> bool {
        if self.seen.insert(entry.key()) {
            self.entries.push(entry);
            true
        } else {
            false
        }
    }
}

/// Merge `incoming` into `local`.
///
/// The result starts with `dedupe(local)` and continues with the entries of
/// `incoming` whose keys were not seen before, in `incoming` order.
pub fn merge(local: &[Entry], incoming: &[Entry]) -> MergeResult {
    let mut set = MergeSet::from_local(local.to_vec());
    let absorbed = set.absorb(incoming.iter().cloned());
    MergeResult {
        merged_entries: set.into_entries(),
        added: absorbed.added,
    }
}

/// Remove later duplicates, keeping first occurrences in order.
pub fn dedupe(entries: &[Entry]) -> Vec<Entry> {
    MergeSet::from_local(entries.to_vec()).into_entries()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rsm_types::Value;

    fn texts(items: &[&str]) -> Vec<Entry> {
        items.iter().map(|s| Entry::from(*s)).collect()
    }

    // -----------------------------------------------------------------------
    // Scenarios
    // -----------------------------------------------------------------------

    #[test]
    fn appends_only_new_incoming_entries() {
        let result = merge(&texts(&["a.com", "b.com"]), &texts(&["b.com", "c.com"]));
        assert_eq!(result.merged_entries, texts(&["a.com", "b.com", "c.com"]));
        assert_eq!(result.added, 1);
    }

    #[test]
    fn empty_local_dedupes_incoming() {
        let result = merge(&[], &texts(&["x.com", "x.com", "y.com"]));
        assert_eq!(result.merged_entries, texts(&["x.com", "y.com"]));
        assert_eq!(result.added, 2);
    }

    #[test]
    fn empty_incoming_dedupes_local() {
        let result = merge(&texts(&["a", "b", "a"]), &[]);
        assert_eq!(result.merged_entries, texts(&["a", "b"]));
        assert_eq!(result.added, 0);
    }

    #[test]
    fn local_duplicates_keep_first_position() {
        let result = merge(&texts(&["b", "a", "b", "c"]), &texts(&["a", "d"]));
        assert_eq!(result.merged_entries, texts(&["b", "a", "c", "d"]));
        assert_eq!(result.added, 1);
    }

    #[test]
    fn structured_entries_dedupe_regardless_of_key_order() {
        let first = Entry::Structured(Value::mapping([
            ("domain", Value::from("a.com")),
            ("type", Value::from("full")),
        ]));
        let second = Entry::Structured(Value::mapping([
            ("type", Value::from("full")),
            ("domain", Value::from("a.com")),
        ]));
        let result = merge(&[], &[first.clone(), second]);
        assert_eq!(result.merged_entries, vec![first]);
        assert_eq!(result.added, 1);
    }

    #[test]
    fn merge_set_folds_sources_in_order() {
        let mut set = MergeSet::from_local(texts(&["a"]));
        let s1 = set.absorb(texts(&["b", "a", "c"]));
        let s2 = set.absorb(texts(&["c", "d", "b"]));
        assert_eq!(s1, Absorbed { seen: 3, added: 2 });
        assert_eq!(s2, Absorbed { seen: 3, added: 1 });
        assert_eq!(s2.duplicates(), 2);
        assert_eq!(set.entries(), texts(&["a", "b", "c", "d"]).as_slice());
        assert!(set.contains(&Entry::from("d")));
        assert!(!set.contains(&Entry::from("e")));
    }

    #[test]
    fn fold_matches_repeated_one_shot_merge() {
        let local = texts(&["a", "b"]);
        let sources = [texts(&["c", "a"]), texts(&["d", "c", "e"])];

        let mut acc = local.clone();
        let mut one_shot_added = Vec::new();
        for source in &sources {
            let r = merge(&acc, source);
            acc = r.merged_entries;
            one_shot_added.push(r.added);
        }

        let mut set = MergeSet::from_local(local);
        let fold_added: Vec<usize> = sources.iter().map(|s| set.absorb(s.clone()).added).collect();

        assert_eq!(set.into_entries(), acc);
        assert_eq!(fold_added, one_shot_added);
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn arb_entries() -> impl Strategy<Value = Vec<Entry>> {
        let entry = prop_oneof![
            "[a-e]\\.com".prop_map(Entry::from),
            ("[a-c]", "[x-z]").prop_map(|(k, v)| {
                Entry::Structured(Value::mapping([("domain", Value::from(k)), ("kind", Value::from(v))]))
            }),
        ];
        prop::collection::vec(entry, 0..20)
    }

    fn has_unique_keys(entries: &[Entry]) -> bool {
        let mut keys = HashSet::new();
        entries.iter().all(|e| keys.insert(e.key()))
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(local in arb_entries(), incoming in arb_entries()) {
            let once = merge(&local, &incoming);
            let twice = merge(&once.merged_entries, &incoming);
            prop_assert_eq!(&twice.merged_entries, &once.merged_entries);
            prop_assert_eq!(twice.added, 0);
        }

        #[test]
        fn result_is_dedupe_local_then_novel_incoming(local in arb_entries(), incoming in arb_entries()) {
            let result = merge(&local, &incoming);
            let deduped_local = dedupe(&local);
            prop_assert_eq!(&result.merged_entries[..deduped_local.len()], deduped_local.as_slice());

            let mut expected_tail = Vec::new();
            let mut set = MergeSet::from_local(local.clone());
            for e in &incoming {
                if !set.contains(e) {
                    expected_tail.push(e.clone());
                    set.absorb([e.clone()]);
                }
            }
            prop_assert_eq!(&result.merged_entries[deduped_local.len()..], expected_tail.as_slice());
            prop_assert_eq!(result.added, expected_tail.len());
        }

        #[test]
        fn result_never_holds_duplicate_keys(local in arb_entries(), incoming in arb_entries()) {
            prop_assert!(has_unique_keys(&merge(&local, &incoming).merged_entries));
        }

        #[test]
        fn empty_boundaries(entries in arb_entries()) {
            let from_empty = merge(&[], &entries);
            prop_assert_eq!(&from_empty.merged_entries, &dedupe(&entries));
            prop_assert_eq!(from_empty.added, dedupe(&entries).len());

            let into_empty = merge(&entries, &[]);
            prop_assert_eq!(&into_empty.merged_entries, &dedupe(&entries));
            prop_assert_eq!(into_empty.added, 0);
        }
    }
}
