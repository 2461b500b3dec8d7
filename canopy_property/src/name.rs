// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Process-wide interned property names.
//!
//! [`PropName`] wraps an [`InternId`] from a single global table. The table
//! is created lazily, guarded by a read/write lock, and never shrinks: the
//! set of property names is small and fixed by the node types compiled into
//! a program, so leaking the text once per distinct name is acceptable.

use core::fmt;
use std::sync::OnceLock;

use canopy_dirty::InternId;
use canopy_dirty::intern::Interner;
use parking_lot::RwLock;

fn table() -> &'static RwLock<Interner<&'static str>> {
    static NAMES: OnceLock<RwLock<Interner<&'static str>>> = OnceLock::new();
    NAMES.get_or_init(|| RwLock::new(Interner::new()))
}

/// An interned property name.
///
/// Two names created from equal text are always the same identifier, so
/// equality and hashing are integer operations.
///
/// # Example
///
/// ```rust
/// use canopy_property::PropName;
///
/// let a = PropName::new("color");
/// let b = PropName::new("color");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "color");
/// assert_ne!(a, PropName::new("colors"));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropName(InternId);

impl PropName {
    /// Interns `name` and returns its identifier.
    #[must_use]
    pub fn new(name: &str) -> Self {
        if let Some(id) = table().read().lookup(name) {
            return Self(id);
        }
        // `intern_with` re-checks under the write lock, so a racing insert of
        // the same name still yields one id.
        let id = table()
            .write()
            .intern_with(name, |text: &str| -> &'static str {
                Box::leak(Box::<str>::from(text))
            });
        Self(id)
    }

    /// Returns the identifier of `name` if it was ever interned.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        table().read().lookup(name).map(Self)
    }

    /// Returns the text of this name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        table().read().get(self.0).copied().unwrap_or("")
    }

    /// Returns the underlying intern id.
    #[must_use]
    #[inline]
    pub const fn id(self) -> InternId {
        self.0
    }
}

impl From<&str> for PropName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for PropName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropName").field(&self.as_str()).finish()
    }
}

impl fmt::Display for PropName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_text_is_same_name() {
        let a = PropName::new("name_test_equal");
        let b = PropName::from("name_test_equal");
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn lookup_does_not_intern() {
        assert_eq!(PropName::lookup("name_test_never_interned"), None);
        let a = PropName::new("name_test_lookup");
        assert_eq!(PropName::lookup("name_test_lookup"), Some(a));
    }

    #[test]
    fn display_and_debug() {
        let a = PropName::new("freqX");
        assert_eq!(format!("{a}"), "freqX");
        assert_eq!(format!("{a:?}"), "PropName(\"freqX\")");
    }

    #[test]
    fn concurrent_interning_agrees() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| PropName::new("name_test_concurrent")))
            .collect();
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }
}
