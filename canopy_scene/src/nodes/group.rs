// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_property::{PropertySchema, PropertyStore};

use crate::context::DrawingContext;
use crate::node::NodeBehavior;

/// A node without properties whose only job is to hold children.
///
/// Materializing or rendering a group is materializing or rendering its
/// children in order, which [`SceneNode`](crate::SceneNode) already does for
/// every node.
#[derive(Debug, Default)]
pub struct GroupNode;

impl GroupNode {
    /// Type tag.
    pub const TAG: &'static str = "group";
}

impl NodeBehavior for GroupNode {
    fn define_properties(&self, _schema: &mut PropertySchema) {}

    fn materialize(&mut self, _store: &PropertyStore, _ctx: &mut DrawingContext) {}
}
