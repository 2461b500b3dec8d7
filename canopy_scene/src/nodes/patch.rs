// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_property::{DerivedProp, NodeProp, PropertySchema, PropertyStore};

use crate::context::{DrawOp, DrawingContext};
use crate::error::SceneError;
use crate::node::NodeBehavior;
use crate::props::BezierProp;

/// Draws a Coons patch with the current shader. Requires `patch`.
#[derive(Debug)]
pub struct PatchNode {
    patch: DerivedProp<BezierProp>,
}

impl PatchNode {
    /// Type tag.
    pub const TAG: &'static str = "patch";

    /// Creates the node behavior.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patch: DerivedProp::new(BezierProp::new(NodeProp::array("patch").require())),
        }
    }
}

impl Default for PatchNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBehavior for PatchNode {
    fn define_properties(&self, schema: &mut PropertySchema) {
        schema.define_derived(&self.patch);
    }

    fn validate(&self, store: &PropertyStore) -> Result<(), SceneError> {
        let prop = self.patch.inner().prop();
        let corners = prop.value(store).as_array().map_or(0, <[_]>::len);
        if corners < 4 {
            return Err(SceneError::InvalidValue {
                name: prop.name(),
                value: format!("{corners} corners"),
                kind: "patch of four corners",
            });
        }
        Ok(())
    }

    fn has_dirty_derived(&self, store: &PropertyStore) -> bool {
        self.patch.is_dirty(store)
    }

    fn materialize(&mut self, store: &PropertyStore, _ctx: &mut DrawingContext) {
        self.patch.update(store);
    }

    fn render(&mut self, _store: &PropertyStore, ctx: &mut DrawingContext) {
        let Some(points) = self.patch.cached() else {
            return;
        };
        let shader = ctx.shader().cloned();
        ctx.record(DrawOp::Patch {
            points: points.clone(),
            shader,
        });
    }

    fn release(&mut self) {
        self.patch.clear();
    }
}
