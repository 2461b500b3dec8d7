// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shader declaration nodes.
//!
//! A shader node rebuilds its brush only when changed and applies the
//! current brush to the paint every time it renders.

use canopy_property::{DerivedProp, NodeProp, PropertySchema, PropertyStore};
use peniko::color::Srgb;
use peniko::{Brush, Extend, Gradient, GradientKind, LinearGradientPosition};

use crate::context::DrawingContext;
use crate::error::SceneError;
use crate::node::NodeBehavior;
use crate::props::{ColorProp, ColorStopsProp, PointProp, parse_color, parse_point};

/// Maps a tile mode name to a gradient extend mode.
///
/// `clamp`, `repeat` and `mirror` are supported.
pub fn parse_tile_mode(text: &str) -> Option<Extend> {
    match text {
        "clamp" => Some(Extend::Pad),
        "repeat" => Some(Extend::Repeat),
        "mirror" => Some(Extend::Reflect),
        _ => None,
    }
}

/// A solid color shader. Requires `color`.
#[derive(Debug)]
pub struct ColorShaderNode {
    color: DerivedProp<ColorProp>,
    current: Option<Brush>,
}

impl ColorShaderNode {
    /// Type tag.
    pub const TAG: &'static str = "colorShader";

    /// Creates the node behavior.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: DerivedProp::new(ColorProp::new(NodeProp::new("color").require())),
            current: None,
        }
    }
}

impl Default for ColorShaderNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBehavior for ColorShaderNode {
    fn define_properties(&self, schema: &mut PropertySchema) {
        schema.define_derived(&self.color);
    }

    fn validate(&self, store: &PropertyStore) -> Result<(), SceneError> {
        let prop = self.color.inner().prop();
        let value = prop.value(store);
        if parse_color(value).is_none() {
            return Err(SceneError::InvalidValue {
                name: prop.name(),
                value: format!("{value:?}"),
                kind: "color",
            });
        }
        Ok(())
    }

    fn has_dirty_derived(&self, store: &PropertyStore) -> bool {
        self.color.is_dirty(store)
    }

    fn materialize(&mut self, store: &PropertyStore, _ctx: &mut DrawingContext) {
        self.current = self
            .color
            .get_derived_value(store)
            .map(|color| Brush::Solid(*color));
    }

    fn render(&mut self, _store: &PropertyStore, ctx: &mut DrawingContext) {
        ctx.set_shader(self.current.clone());
    }

    fn shader(&self) -> Option<&Brush> {
        self.current.as_ref()
    }

    fn release(&mut self) {
        self.current = None;
    }
}

/// A linear gradient shader.
///
/// Requires `start`, `end` and `colors`; `positions` and `mode` are optional.
#[derive(Debug)]
pub struct LinearGradientNode {
    start: DerivedProp<PointProp>,
    end: DerivedProp<PointProp>,
    stops: DerivedProp<ColorStopsProp>,
    mode: NodeProp,
    current: Option<Brush>,
}

impl LinearGradientNode {
    /// Type tag.
    pub const TAG: &'static str = "linearGradient";

    /// Creates the node behavior.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: DerivedProp::new(PointProp::new(NodeProp::new("start").require())),
            end: DerivedProp::new(PointProp::new(NodeProp::new("end").require())),
            stops: DerivedProp::new(ColorStopsProp::new(
                NodeProp::array("colors").require(),
                NodeProp::array("positions"),
            )),
            mode: NodeProp::string("mode"),
            current: None,
        }
    }

    fn extend(&self, store: &PropertyStore) -> Extend {
        let Some(text) = self.mode.value(store).as_str() else {
            return Extend::Pad;
        };
        parse_tile_mode(text).unwrap_or_else(|| {
            tracing::warn!(mode = text, "unknown tile mode, using clamp");
            Extend::Pad
        })
    }
}

impl Default for LinearGradientNode {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(prop: NodeProp, store: &PropertyStore, kind: &'static str) -> SceneError {
    SceneError::InvalidValue {
        name: prop.name(),
        value: format!("{:?}", prop.value(store)),
        kind,
    }
}

impl NodeBehavior for LinearGradientNode {
    fn define_properties(&self, schema: &mut PropertySchema) {
        schema.define(self.start.inner().prop());
        schema.define(self.end.inner().prop());
        schema.define(self.stops.inner().colors());
        schema.define(self.stops.inner().positions());
        schema.define(self.mode);
    }

    fn validate(&self, store: &PropertyStore) -> Result<(), SceneError> {
        for point in [self.start.inner().prop(), self.end.inner().prop()] {
            if parse_point(point.value(store)).is_none() {
                return Err(invalid(point, store, "point"));
            }
        }
        let colors = self.stops.inner().colors();
        let all_colors = colors
            .value(store)
            .as_array()
            .is_some_and(|items| !items.is_empty() && items.iter().all(|c| parse_color(c).is_some()));
        if !all_colors {
            return Err(invalid(colors, store, "color list"));
        }
        if let Some(text) = self.mode.value(store).as_str()
            && parse_tile_mode(text).is_none()
        {
            return Err(SceneError::InvalidValue {
                name: self.mode.name(),
                value: text.to_owned(),
                kind: "tile mode",
            });
        }
        Ok(())
    }

    fn has_dirty_derived(&self, store: &PropertyStore) -> bool {
        self.start.is_dirty(store) || self.end.is_dirty(store) || self.stops.is_dirty(store)
    }

    fn materialize(&mut self, store: &PropertyStore, _ctx: &mut DrawingContext) {
        let extend = self.extend(store);
        let start = self.start.get_derived_value(store).copied();
        let end = self.end.get_derived_value(store).copied();
        let stops = self.stops.get_shared(store);

        self.current = match (start, end, stops) {
            (_, _, Some(stops)) if stops.len() == 1 => {
                Some(Brush::Solid(stops[0].color.to_alpha_color::<Srgb>()))
            }
            (Some(start), Some(end), Some(stops)) => Some(Brush::Gradient(Gradient {
                kind: GradientKind::Linear(LinearGradientPosition::new(start, end)),
                extend,
                stops: (*stops).clone(),
                ..Gradient::default()
            })),
            _ => None,
        };
    }

    fn render(&mut self, _store: &PropertyStore, ctx: &mut DrawingContext) {
        ctx.set_shader(self.current.clone());
    }

    fn shader(&self) -> Option<&Brush> {
        self.current.as_ref()
    }

    fn release(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_modes() {
        assert_eq!(parse_tile_mode("clamp"), Some(Extend::Pad));
        assert_eq!(parse_tile_mode("repeat"), Some(Extend::Repeat));
        assert_eq!(parse_tile_mode("mirror"), Some(Extend::Reflect));
        assert_eq!(parse_tile_mode("decal"), None);
    }

    #[test]
    fn color_shader_declares_required_color() {
        let node = ColorShaderNode::new();
        let mut schema = PropertySchema::new();
        node.define_properties(&mut schema);
        assert_eq!(schema.len(), 1);
        assert!(schema.props()[0].is_required());
    }

    #[test]
    fn gradient_declares_all_properties() {
        let node = LinearGradientNode::new();
        let mut schema = PropertySchema::new();
        node.define_properties(&mut schema);
        let required: Vec<&str> = schema
            .props()
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name().as_str())
            .collect();
        assert_eq!(required, ["start", "end", "colors"]);
        assert_eq!(schema.len(), 5);
    }
}
