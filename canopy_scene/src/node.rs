// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene nodes and the materialization contract.
//!
//! A [`SceneNode`] pairs a [`PropertyStore`] with a [`NodeBehavior`]. Once
//! per frame the node is asked whether anything changed; if so, the behavior
//! rebuilds its native resource, otherwise the previous one is kept.

use core::fmt;
use std::sync::Arc;

use canopy_property::{PropertyBag, PropertySchema, PropertyStore, StoreOptions};
use peniko::Brush;

use crate::context::DrawingContext;
use crate::error::SceneError;

/// Where a node is in its life.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created but never materialized.
    Unmaterialized,
    /// Materialized at least once.
    Materialized,
    /// Disposed; the node no longer renders.
    Disposed,
}

/// The type-specific part of a node.
///
/// Implementations own their descriptors, derived properties and native
/// resource. The store is passed in on every call.
pub trait NodeBehavior: Send {
    /// Declares the node's properties.
    fn define_properties(&self, schema: &mut PropertySchema);

    /// Setup-time checks beyond types and presence, run after every resolve.
    ///
    /// Errors detected here keep [`materialize`](Self::materialize) infallible.
    fn validate(&self, store: &PropertyStore) -> Result<(), SceneError> {
        let _ = store;
        Ok(())
    }

    /// Returns `true` if a derived property needs recomputing.
    fn has_dirty_derived(&self, store: &PropertyStore) -> bool {
        let _ = store;
        false
    }

    /// Rebuilds the native resource from the current property values.
    fn materialize(&mut self, store: &PropertyStore, ctx: &mut DrawingContext);

    /// Applies the current resource to the render pass.
    fn render(&mut self, store: &PropertyStore, ctx: &mut DrawingContext) {
        let _ = (store, ctx);
    }

    /// Returns the shader this node currently exposes, if any.
    fn shader(&self) -> Option<&Brush> {
        None
    }

    /// Drops the native resource.
    fn release(&mut self) {}
}

/// A node of the scene tree.
pub struct SceneNode {
    tag: &'static str,
    // Dropped before `behavior`: subscriptions go before the native resource.
    store: PropertyStore,
    schema: PropertySchema,
    behavior: Box<dyn NodeBehavior>,
    children: Vec<SceneNode>,
    lifecycle: Lifecycle,
    revision: u64,
}

impl SceneNode {
    /// Creates a node: declares its properties, resolves them against
    /// `props` and validates the result.
    ///
    /// # Errors
    ///
    /// Any resolve or validation error; no node is created in that case.
    pub fn new(
        tag: &'static str,
        behavior: Box<dyn NodeBehavior>,
        props: Arc<dyn PropertyBag>,
        options: StoreOptions,
    ) -> Result<Self, SceneError> {
        let mut schema = PropertySchema::new();
        behavior.define_properties(&mut schema);
        let mut store = PropertyStore::with_options(props, options);
        schema.resolve(&mut store)?;
        behavior.validate(&store)?;
        tracing::debug!(tag, properties = schema.len(), "created node");
        Ok(Self {
            tag,
            store,
            schema,
            behavior,
            children: Vec::new(),
            lifecycle: Lifecycle::Unmaterialized,
            revision: 0,
        })
    }

    /// Returns the type tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Returns the property store.
    #[must_use]
    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    /// Returns the property store for staging or committing.
    pub fn store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }

    /// Returns the declared properties.
    #[must_use]
    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns how many times this node materialized.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the shader this node currently exposes.
    #[must_use]
    pub fn current_shader(&self) -> Option<&Brush> {
        self.behavior.shader()
    }

    /// Returns `true` if the node must rebuild its resource this frame.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        match self.lifecycle {
            Lifecycle::Unmaterialized => true,
            Lifecycle::Materialized => {
                self.store.has_changes() || self.behavior.has_dirty_derived(&self.store)
            }
            Lifecycle::Disposed => false,
        }
    }

    fn materialize_self(&mut self, ctx: &mut DrawingContext) {
        if !self.is_changed() {
            return;
        }
        self.behavior.materialize(&self.store, ctx);
        self.lifecycle = Lifecycle::Materialized;
        self.revision += 1;
        tracing::trace!(tag = self.tag, revision = self.revision, "materialized node");
    }

    /// Rebuilds this node if changed, then materializes the children in order.
    pub fn materialize(&mut self, ctx: &mut DrawingContext) {
        self.materialize_self(ctx);
        for child in &mut self.children {
            child.materialize(ctx);
        }
    }

    /// Materializes this node if changed, applies it, then renders the
    /// children depth first.
    pub fn render(&mut self, ctx: &mut DrawingContext) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.materialize_self(ctx);
        self.behavior.render(&self.store, ctx);
        for child in &mut self.children {
            child.render(ctx);
        }
    }

    /// Commits pending transactions in this subtree. Returns the number of
    /// committed names.
    pub fn commit(&mut self) -> usize {
        let own = self.store.commit_transactions();
        own + self.children.iter_mut().map(Self::commit).sum::<usize>()
    }

    /// Resets the change tracking of every store in this subtree.
    pub fn reset_changes(&mut self) {
        self.store.reset_changes();
        for child in &mut self.children {
            child.reset_changes();
        }
    }

    /// Replaces the authored properties and resolves them again.
    ///
    /// The new properties are resolved and validated in a scratch store
    /// first; the node's own store is only updated once they pass.
    ///
    /// # Errors
    ///
    /// Any resolve or validation error. The node is left unchanged: same
    /// properties, values and subscriptions.
    pub fn set_props(&mut self, props: Arc<dyn PropertyBag>) -> Result<(), SceneError> {
        {
            let mut scratch = PropertyStore::with_options(props.clone(), *self.store.options());
            self.schema.resolve(&mut scratch)?;
            self.behavior.validate(&scratch)?;
        }
        self.store.set_props(props);
        self.schema.resolve(&mut self.store)?;
        Ok(())
    }

    /// Returns the children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the children for modification.
    pub fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    /// Appends `child`.
    pub fn append_child(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Inserts `child` at `index`, or appends it if `index` is past the end.
    pub fn insert_child(&mut self, index: usize, child: Self) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Removes and disposes the child at `index`. Returns `false` if there
    /// is no such child.
    pub fn remove_child(&mut self, index: usize) -> bool {
        if index >= self.children.len() {
            return false;
        }
        let mut child = self.children.remove(index);
        child.dispose();
        true
    }

    /// Releases subscriptions, then the native resource, for this node and
    /// its subtree. Idempotent.
    pub fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.store.unsubscribe();
        self.behavior.release();
        for child in &mut self.children {
            child.dispose();
        }
        self.lifecycle = Lifecycle::Disposed;
        tracing::debug!(tag = self.tag, "disposed node");
    }
}

impl Drop for SceneNode {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("tag", &self.tag)
            .field("lifecycle", &self.lifecycle)
            .field("revision", &self.revision)
            .field("store", &self.store)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
