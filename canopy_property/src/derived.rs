// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived properties: values computed from other properties.
//!
//! A [`DerivedProp`] caches the output of a [`Derive`] implementation and
//! recomputes it only when one of its dependencies got a new value after the
//! last computation. Dependency changes are detected through the store's
//! per-name revisions rather than the per-frame change set, so a derived
//! value that is not read during the frame its input changed still notices
//! the change later.

use core::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::descriptor::NodeProp;
use crate::store::PropertyStore;

/// Computes a native value from a set of properties.
pub trait Derive {
    /// The computed value.
    type Output;

    /// Properties whose change invalidates the computed value.
    fn dependencies(&self) -> &[NodeProp];

    /// Computes the value from the current store contents.
    ///
    /// Returning `None` means "no value" and clears the cache.
    fn derive(&self, store: &PropertyStore) -> Option<Self::Output>;
}

/// A cached derived value.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use canopy_property::{DerivedProp, NodeProp, PropertyStore, Props};
///
/// let w = NodeProp::number("w");
/// let h = NodeProp::number("h");
/// let mut area = DerivedProp::from_fn([w, h], move |store: &PropertyStore| {
///     Some(w.value(store).as_number()? * h.value(store).as_number()?)
/// });
///
/// let mut store = PropertyStore::new(Props::new().with("w", 2.0).with("h", 3.0));
/// w.resolve(&mut store).unwrap();
/// h.resolve(&mut store).unwrap();
///
/// let first = area.get_shared(&store).unwrap();
/// assert_eq!(*first, 6.0);
///
/// // No dependency changed: the identical instance comes back.
/// let again = area.get_shared(&store).unwrap();
/// assert!(Arc::ptr_eq(&first, &again));
///
/// store.stage_transaction(w.name(), 4.0.into());
/// store.commit_transactions();
/// assert!(area.is_dirty(&store));
/// assert_eq!(area.get_derived_value(&store), Some(&12.0));
/// ```
pub struct DerivedProp<D: Derive> {
    derive: D,
    cached: Option<Arc<D::Output>>,
    /// Store generation observed at the last computation.
    computed_at: Option<u64>,
}

impl<D: Derive> DerivedProp<D> {
    /// Wraps `derive`; the first read always computes.
    pub fn new(derive: D) -> Self {
        Self {
            derive,
            cached: None,
            computed_at: None,
        }
    }

    /// Returns the wrapped implementation.
    pub fn inner(&self) -> &D {
        &self.derive
    }

    /// Returns the dependencies of this derived property.
    pub fn dependencies(&self) -> &[NodeProp] {
        self.derive.dependencies()
    }

    /// Returns `true` if the value was never computed or a dependency
    /// changed since it was.
    pub fn is_dirty(&self, store: &PropertyStore) -> bool {
        match self.computed_at {
            None => true,
            Some(generation) => self
                .derive
                .dependencies()
                .iter()
                .any(|dep| store.changed_since(dep.name(), generation)),
        }
    }

    /// Forces the next read to recompute.
    pub fn invalidate(&mut self) {
        self.computed_at = None;
    }

    /// Drops the cached value and forces the next read to recompute.
    pub fn clear(&mut self) {
        self.cached = None;
        self.computed_at = None;
    }

    /// Recomputes the value if dirty. Returns `true` if it recomputed.
    pub fn update(&mut self, store: &PropertyStore) -> bool {
        if !self.is_dirty(store) {
            return false;
        }
        self.cached = self.derive.derive(store).map(Arc::new);
        self.computed_at = Some(store.generation());
        true
    }

    /// Returns the value, recomputing it first if dirty.
    pub fn get_derived_value(&mut self, store: &PropertyStore) -> Option<&D::Output> {
        self.update(store);
        self.cached.as_deref()
    }

    /// Like [`get_derived_value`](Self::get_derived_value) but returns the
    /// shared cached instance.
    pub fn get_shared(&mut self, store: &PropertyStore) -> Option<Arc<D::Output>> {
        self.update(store);
        self.cached.clone()
    }

    /// Returns the cached value without recomputing.
    pub fn cached(&self) -> Option<&Arc<D::Output>> {
        self.cached.as_ref()
    }

    /// Returns `true` if the last computation produced a value.
    pub fn is_set(&self) -> bool {
        self.cached.is_some()
    }
}

impl<D> fmt::Debug for DerivedProp<D>
where
    D: Derive,
    D::Output: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedProp")
            .field("dependencies", &self.derive.dependencies())
            .field("cached", &self.cached)
            .field("computed_at", &self.computed_at)
            .finish_non_exhaustive()
    }
}

/// A [`Derive`] backed by a closure.
pub struct DeriveFn<F> {
    dependencies: SmallVec<[NodeProp; 4]>,
    derive: F,
}

impl<F, T> Derive for DeriveFn<F>
where
    F: Fn(&PropertyStore) -> Option<T>,
{
    type Output = T;

    fn dependencies(&self) -> &[NodeProp] {
        &self.dependencies
    }

    fn derive(&self, store: &PropertyStore) -> Option<T> {
        (self.derive)(store)
    }
}

impl<F> fmt::Debug for DeriveFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeriveFn")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl<F, T> DerivedProp<DeriveFn<F>>
where
    F: Fn(&PropertyStore) -> Option<T>,
{
    /// Creates a derived property from its dependencies and a closure.
    pub fn from_fn(dependencies: impl IntoIterator<Item = NodeProp>, derive: F) -> Self {
        Self::new(DeriveFn {
            dependencies: dependencies.into_iter().collect(),
            derive,
        })
    }
}
