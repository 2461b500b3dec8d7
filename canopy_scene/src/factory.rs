// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node construction keyed by type tag.

use core::fmt;
use std::sync::Arc;

use canopy_property::{PropertyBag, StoreOptions};
use hashbrown::HashMap;

use crate::error::SceneError;
use crate::node::{NodeBehavior, SceneNode};
use crate::nodes::{ColorShaderNode, GroupNode, LinearGradientNode, PatchNode};

/// Builds the behavior of a node type.
pub type NodeConstructor = fn() -> Box<dyn NodeBehavior>;

/// Creates scene nodes from a type tag and an authored property bag.
///
/// # Example
///
/// ```rust
/// use canopy_property::Props;
/// use canopy_scene::{NodeFactory, SceneError};
///
/// let factory = NodeFactory::new();
/// let shader = factory
///     .create("colorShader", Props::new().with("color", "#00ff00"))
///     .unwrap();
/// assert_eq!(shader.tag(), "colorShader");
///
/// let err = factory.create("spline", Props::new()).unwrap_err();
/// assert!(matches!(err, SceneError::UnknownNodeType { .. }));
/// ```
#[derive(Clone)]
pub struct NodeFactory {
    constructors: HashMap<&'static str, NodeConstructor>,
    options: StoreOptions,
}

impl NodeFactory {
    /// Creates a factory knowing the built-in node types.
    #[must_use]
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register(GroupNode::TAG, || Box::new(GroupNode));
        factory.register(ColorShaderNode::TAG, || Box::new(ColorShaderNode::new()));
        factory.register(LinearGradientNode::TAG, || Box::new(LinearGradientNode::new()));
        factory.register(PatchNode::TAG, || Box::new(PatchNode::new()));
        factory
    }

    /// Creates a factory knowing no node types.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
            options: StoreOptions::default(),
        }
    }

    /// Uses `options` for the store of every node created from now on.
    #[must_use]
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Registers `constructor` for `tag`, replacing any previous one.
    pub fn register(&mut self, tag: &'static str, constructor: NodeConstructor) {
        self.constructors.insert(tag, constructor);
    }

    /// Returns `true` if `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Creates a node of type `tag`.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNodeType`] for an unregistered tag, otherwise any
    /// error of [`SceneNode::new`].
    pub fn create(
        &self,
        tag: &str,
        props: impl PropertyBag + 'static,
    ) -> Result<SceneNode, SceneError> {
        self.create_shared(tag, Arc::new(props))
    }

    /// Like [`create`](Self::create) for a shared property bag.
    ///
    /// # Errors
    ///
    /// See [`create`](Self::create).
    pub fn create_shared(
        &self,
        tag: &str,
        props: Arc<dyn PropertyBag>,
    ) -> Result<SceneNode, SceneError> {
        let Some((&tag, constructor)) = self.constructors.get_key_value(tag) else {
            return Err(SceneError::UnknownNodeType { tag: tag.to_owned() });
        };
        SceneNode::new(tag, constructor(), props, self.options)
    }
}

impl Default for NodeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.constructors.keys().copied().collect();
        tags.sort_unstable();
        f.debug_struct("NodeFactory")
            .field("tags", &tags)
            .field("options", &self.options)
            .finish()
    }
}
