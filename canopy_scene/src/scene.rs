// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame driver.

use crate::context::{DrawOp, DrawingContext};
use crate::node::SceneNode;

/// A scene tree and the context it renders into.
///
/// Each [`frame`](Self::frame) runs the full protocol:
///
/// 1. commit pending transactions in every store
/// 2. render the tree depth first, materializing changed nodes on the way
/// 3. reset the change tracking of every store, exactly once
#[derive(Debug)]
pub struct Scene {
    root: SceneNode,
    context: DrawingContext,
}

impl Scene {
    /// Creates a scene rooted at `root`.
    #[must_use]
    pub fn new(root: SceneNode) -> Self {
        Self {
            root,
            context: DrawingContext::new(),
        }
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Returns the root node for modification.
    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    /// Returns the drawing context of the last frame.
    #[must_use]
    pub fn context(&self) -> &DrawingContext {
        &self.context
    }

    /// Runs one frame and returns the operations it recorded.
    pub fn frame(&mut self) -> &[DrawOp] {
        let committed = self.root.commit();
        self.context.begin_frame();
        self.root.render(&mut self.context);
        self.root.reset_changes();
        tracing::trace!(
            frame = self.context.frame(),
            committed,
            ops = self.context.ops().len(),
            "rendered frame"
        );
        self.context.ops()
    }

    /// Disposes the tree and returns the context.
    pub fn into_context(mut self) -> DrawingContext {
        self.root.dispose();
        core::mem::take(&mut self.context)
    }
}
