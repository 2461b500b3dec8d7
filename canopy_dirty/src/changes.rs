// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change set: keys changed since the last reset, with generation tracking.

use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

/// Keys changed since the last [`reset`](Self::reset), with generation tracking.
///
/// `ChangeSet` keeps two views of the same marks:
///
/// - a **per-frame** view: the set of changed keys and the number of marks
///   since the last reset. This is what "did anything change this frame?"
///   queries read, and it is cleared once per frame.
/// - a **per-key revision**: the generation at which each key was last
///   marked. This is never cleared by [`reset`](Self::reset) and backs
///   [`changed_since`](Self::changed_since).
///
/// The generation counter increments on every mutation.
///
/// # Type Parameters
///
/// - `K`: The key type. Must be `Copy + Eq + Hash`. If your natural key is
///   owned/structured, see [`intern::Interner`](crate::intern::Interner).
///
/// # Example
///
/// ```
/// use canopy_dirty::ChangeSet;
///
/// let mut changes = ChangeSet::<u32>::new();
/// assert!(!changes.has_changes());
///
/// changes.mark(7);
/// changes.mark(7);
/// assert!(changes.is_changed(7));
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes.count(), 2);
///
/// changes.reset();
/// assert!(!changes.has_changes());
/// assert!(!changes.is_changed(7));
/// ```
#[derive(Debug, Clone)]
pub struct ChangeSet<K>
where
    K: Copy + Eq + Hash,
{
    /// Keys marked since the last reset.
    changed: HashSet<K>,
    /// Number of marks since the last reset, duplicates included.
    count: usize,
    /// Generation of the most recent mark per key.
    revisions: HashMap<K, u64>,
    /// Generation counter, incremented on each mutation.
    generation: u64,
}

impl<K> Default for ChangeSet<K>
where
    K: Copy + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ChangeSet<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates a new empty change set at generation 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            changed: HashSet::new(),
            count: 0,
            revisions: HashMap::new(),
            generation: 0,
        }
    }

    /// Returns the current generation.
    ///
    /// A consumer that records this value after computing something can later
    /// pass it to [`changed_since`](Self::changed_since).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Marks a key as changed.
    ///
    /// Returns `true` if the key was not already marked in this frame.
    pub fn mark(&mut self, key: K) -> bool {
        self.generation = self.generation.wrapping_add(1);
        self.count += 1;
        self.revisions.insert(key, self.generation);
        self.changed.insert(key)
    }

    /// Records a new revision for `key` without marking it changed for this frame.
    ///
    /// Used when a value is replaced in a way that per-frame consumers should
    /// not observe (for example the initial seed of a value), while lazily
    /// evaluated consumers must still recompute.
    pub fn touch(&mut self, key: K) {
        self.generation = self.generation.wrapping_add(1);
        self.revisions.insert(key, self.generation);
    }

    /// Returns `true` if anything was marked since the last reset.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.count > 0
    }

    /// Returns `true` if `key` was marked since the last reset.
    #[must_use]
    pub fn is_changed(&self, key: K) -> bool {
        self.changed.contains(&key)
    }

    /// Returns `true` if `key` was marked or touched after `generation`.
    ///
    /// Unlike [`is_changed`](Self::is_changed), this is not affected by
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn changed_since(&self, key: K, generation: u64) -> bool {
        self.revisions
            .get(&key)
            .is_some_and(|&revision| revision > generation)
    }

    /// Returns the number of distinct keys marked since the last reset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changed.len()
    }

    /// Returns `true` if no key was marked since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Returns the number of marks since the last reset, duplicates included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns an iterator over the keys marked since the last reset.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.changed.iter().copied()
    }

    /// Clears the per-frame view: changed keys and the change counter.
    ///
    /// Per-key revisions are kept.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.changed.clear();
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn mark_and_query() {
        let mut changes = ChangeSet::<u32>::new();

        assert!(!changes.is_changed(1));
        assert!(changes.is_empty());

        assert!(changes.mark(1));
        assert!(changes.is_changed(1));
        assert!(changes.has_changes());

        // Marking again returns false but still counts.
        assert!(!changes.mark(1));
        assert_eq!(changes.count(), 2);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn reset_clears_frame_view_only() {
        let mut changes = ChangeSet::<u32>::new();
        let before = changes.generation();

        changes.mark(1);
        changes.mark(2);
        changes.reset();

        assert!(!changes.has_changes());
        assert!(changes.is_empty());
        assert_eq!(changes.count(), 0);
        assert!(changes.changed_since(1, before));
        assert!(changes.changed_since(2, before));
    }

    #[test]
    fn changed_since_respects_generation() {
        let mut changes = ChangeSet::<u32>::new();
        changes.mark(1);
        let seen = changes.generation();

        assert!(!changes.changed_since(1, seen));
        changes.mark(2);
        assert!(!changes.changed_since(1, seen));
        assert!(changes.changed_since(2, seen));

        changes.mark(1);
        assert!(changes.changed_since(1, seen));
    }

    #[test]
    fn touch_records_revision_without_frame_change() {
        let mut changes = ChangeSet::<u32>::new();
        let before = changes.generation();

        changes.touch(5);
        assert!(!changes.has_changes());
        assert!(!changes.is_changed(5));
        assert!(changes.changed_since(5, before));
    }

    #[test]
    fn generation_increments() {
        let mut changes = ChangeSet::<u32>::new();
        let initial = changes.generation();

        changes.mark(1);
        assert_eq!(changes.generation(), initial + 1);
        changes.touch(2);
        assert_eq!(changes.generation(), initial + 2);
        changes.reset();
        assert_eq!(changes.generation(), initial + 3);
    }

    #[test]
    fn iter_yields_frame_keys() {
        let mut changes = ChangeSet::<u32>::new();
        changes.mark(3);
        changes.mark(1);
        changes.mark(3);

        let mut keys: Vec<_> = changes.iter().collect();
        keys.sort_unstable();
        assert_eq!(keys, [1, 3]);
    }
}
