// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing context threaded through a render pass.

use std::sync::Arc;

use kurbo::Point;
use peniko::Brush;

/// Paint state shared by the nodes of one render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paint {
    /// The current shader, `None` for the renderer's default.
    pub shader: Option<Brush>,
}

/// A recorded drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A Coons patch.
    Patch {
        /// The twelve control points, clockwise from the top-left corner.
        points: Arc<[Point; 12]>,
        /// The shader active when the patch was drawn.
        shader: Option<Brush>,
    },
}

/// Mutable state of a render pass: the current paint and the operations
/// recorded so far.
///
/// # Example
///
/// ```rust
/// use canopy_scene::DrawingContext;
/// use peniko::{Brush, Color};
///
/// let mut ctx = DrawingContext::new();
/// ctx.begin_frame();
/// ctx.set_shader(Some(Brush::Solid(Color::from_rgba8(255, 0, 0, 255))));
/// assert!(ctx.shader().is_some());
///
/// ctx.begin_frame();
/// assert_eq!(ctx.frame(), 2);
/// assert!(ctx.shader().is_none());
/// ```
#[derive(Debug, Default)]
pub struct DrawingContext {
    paint: Paint,
    ops: Vec<DrawOp>,
    frame: u64,
}

impl DrawingContext {
    /// Creates a context before its first frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame: resets the paint and drops recorded operations.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.paint = Paint::default();
        self.ops.clear();
    }

    /// Returns the number of frames begun so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Returns the current paint.
    #[must_use]
    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    /// Returns the current paint for modification.
    pub fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    /// Returns the current shader.
    #[must_use]
    pub fn shader(&self) -> Option<&Brush> {
        self.paint.shader.as_ref()
    }

    /// Replaces the current shader.
    pub fn set_shader(&mut self, shader: Option<Brush>) {
        self.paint.shader = shader;
    }

    /// Appends a drawing operation.
    pub fn record(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Returns the operations recorded in the current frame.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Takes the operations recorded in the current frame.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        core::mem::take(&mut self.ops)
    }
}
