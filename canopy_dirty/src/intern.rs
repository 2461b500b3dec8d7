// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interning helper for non-`Copy` keys.
//!
//! [`ChangeSet`](crate::ChangeSet) is keyed by `K: Copy` so that hot paths
//! never clone or allocate. Natural keys are often strings, so this module
//! maps owned keys to a compact [`InternId`].
//!
//! Lookups accept any borrowed form of the key (`&str` for `&'static str` or
//! `Box<str>` keys), so checking whether a key is already known never
//! allocates.
//!
//! ## Example
//!
//! ```rust
//! use canopy_dirty::{intern::Interner, ChangeSet, InternId};
//!
//! let mut ids = Interner::<&'static str>::new();
//! let color: InternId = ids.intern("color");
//! let width: InternId = ids.intern("width");
//! assert_eq!(ids.lookup("color"), Some(color));
//!
//! let mut changes = ChangeSet::<InternId>::new();
//! changes.mark(color);
//! assert!(changes.is_changed(color));
//! assert!(!changes.is_changed(width));
//!
//! assert_eq!(*ids.get(color).unwrap(), "color");
//! ```

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};

use hashbrown::DefaultHashBuilder;
use hashbrown::HashMap;

/// Index of a key in an [`Interner`].
///
/// Ids are dense and handed out in insertion order, starting at zero.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct InternId(u32);

impl InternId {
    /// Returns the id as a table index.
    #[inline]
    #[must_use]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw numeric id.
    #[inline]
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A table assigning each distinct key one [`InternId`].
///
/// Each key is stored exactly once. The lookup side maps a key hash to the
/// ids sharing that hash, so no second copy of the key is kept for indexing.
#[derive(Debug, Clone)]
pub struct Interner<K> {
    entries: Vec<K>,
    by_hash: HashMap<u64, Vec<InternId>>,
    hasher: DefaultHashBuilder,
}

impl<K: Eq + Hash> Default for Interner<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Interner<K> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_hash: HashMap::new(),
            hasher: DefaultHashBuilder::default(),
        }
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no key was interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the key behind `id`, or `None` for an id this table never
    /// handed out.
    #[must_use]
    pub fn get(&self, id: InternId) -> Option<&K> {
        self.entries.get(id.as_usize())
    }

    /// Finds the id of `key` without interning it.
    #[must_use]
    pub fn lookup<Q>(&self, key: &Q) -> Option<InternId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let candidates = self.by_hash.get(&self.hasher.hash_one(key))?;
        candidates
            .iter()
            .copied()
            .find(|id| Borrow::<Q>::borrow(&self.entries[id.as_usize()]) == key)
    }

    /// Returns the id of `key`, adding it if it is new.
    ///
    /// # Panics
    ///
    /// Panics once the table holds `u32::MAX` keys.
    pub fn intern(&mut self, key: K) -> InternId {
        match self.lookup(&key) {
            Some(id) => id,
            None => self.insert_new(key),
        }
    }

    /// Returns the id of `key`, calling `to_owned` to build the stored key
    /// only when it is new.
    ///
    /// # Panics
    ///
    /// Panics once the table holds `u32::MAX` keys.
    pub fn intern_with<Q>(&mut self, key: &Q, to_owned: impl FnOnce(&Q) -> K) -> InternId
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.lookup(key) {
            Some(id) => id,
            None => self.insert_new(to_owned(key)),
        }
    }

    fn insert_new(&mut self, key: K) -> InternId {
        let Ok(raw) = u32::try_from(self.entries.len()) else {
            panic!("interner is full: InternId is a u32");
        };
        let id = InternId(raw);
        let hash = self.hasher.hash_one(&key);
        self.by_hash.entry(hash).or_default().push(id);
        self.entries.push(key);
        id
    }
}
