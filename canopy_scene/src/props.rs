// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived properties producing native drawing values.
//!
//! Each type here implements [`Derive`] and is meant to be wrapped in a
//! [`DerivedProp`](canopy_property::DerivedProp) by the node that declares it.

use canopy_property::{Derive, NodeProp, PropertyStore, PropertyValue};
use kurbo::Point;
use peniko::color::Srgb;
use peniko::{Color, ColorStop, ColorStops};

/// Converts an authored color.
///
/// Accepts a `0xAARRGGBB` number, a CSS color string (hex notation, named
/// colors, `rgb()`), or an `[r, g, b, a]` array with components in `0..=1`.
pub fn parse_color(value: &PropertyValue) -> Option<Color> {
    match value {
        PropertyValue::Number(n) => {
            if !n.is_finite() || *n < 0.0 || *n > f64::from(u32::MAX) {
                return None;
            }
            #[expect(clippy::cast_possible_truncation, reason = "range checked above")]
            let [a, r, g, b] = (*n as u32).to_be_bytes();
            Some(Color::from_rgba8(r, g, b, a))
        }
        PropertyValue::String(text) => peniko::color::parse_color(text)
            .ok()
            .map(|color| color.to_alpha_color::<Srgb>()),
        PropertyValue::Array(items) if items.len() == 4 => {
            let mut components = [0.0_f32; 4];
            for (slot, item) in components.iter_mut().zip(items.iter()) {
                #[expect(clippy::cast_possible_truncation, reason = "color components are f32")]
                let component = item.as_number()?.clamp(0.0, 1.0) as f32;
                *slot = component;
            }
            Some(Color::new(components))
        }
        _ => None,
    }
}

/// Converts an authored point: `{x, y}` or `[x, y]`.
pub fn parse_point(value: &PropertyValue) -> Option<Point> {
    match value {
        PropertyValue::Object(_) => Some(Point::new(
            value.field("x")?.as_number()?,
            value.field("y")?.as_number()?,
        )),
        PropertyValue::Array(items) if items.len() == 2 => {
            Some(Point::new(items[0].as_number()?, items[1].as_number()?))
        }
        _ => None,
    }
}

/// A color.
#[derive(Clone, Debug)]
pub struct ColorProp {
    deps: [NodeProp; 1],
}

impl ColorProp {
    /// Derives a color from `prop`.
    #[must_use]
    pub fn new(prop: NodeProp) -> Self {
        Self { deps: [prop] }
    }

    /// Returns the source descriptor.
    #[must_use]
    pub fn prop(&self) -> NodeProp {
        self.deps[0]
    }
}

impl Derive for ColorProp {
    type Output = Color;

    fn dependencies(&self) -> &[NodeProp] {
        &self.deps
    }

    fn derive(&self, store: &PropertyStore) -> Option<Color> {
        parse_color(self.deps[0].value(store))
    }
}

/// A point.
#[derive(Clone, Debug)]
pub struct PointProp {
    deps: [NodeProp; 1],
}

impl PointProp {
    /// Derives a point from `prop`.
    #[must_use]
    pub fn new(prop: NodeProp) -> Self {
        Self { deps: [prop] }
    }

    /// Returns the source descriptor.
    #[must_use]
    pub fn prop(&self) -> NodeProp {
        self.deps[0]
    }
}

impl Derive for PointProp {
    type Output = Point;

    fn dependencies(&self) -> &[NodeProp] {
        &self.deps
    }

    fn derive(&self, store: &PropertyStore) -> Option<Point> {
        parse_point(self.deps[0].value(store))
    }
}

/// Gradient stops from a `colors` list and an optional `positions` list.
///
/// Without positions, or when the two lists differ in length, the colors are
/// spread evenly over `0..=1`.
#[derive(Clone, Debug)]
pub struct ColorStopsProp {
    deps: [NodeProp; 2],
}

impl ColorStopsProp {
    /// Derives stops from the `colors` and `positions` descriptors.
    #[must_use]
    pub fn new(colors: NodeProp, positions: NodeProp) -> Self {
        Self {
            deps: [colors, positions],
        }
    }

    /// Returns the colors descriptor.
    #[must_use]
    pub fn colors(&self) -> NodeProp {
        self.deps[0]
    }

    /// Returns the positions descriptor.
    #[must_use]
    pub fn positions(&self) -> NodeProp {
        self.deps[1]
    }
}

impl Derive for ColorStopsProp {
    type Output = ColorStops;

    fn dependencies(&self) -> &[NodeProp] {
        &self.deps
    }

    fn derive(&self, store: &PropertyStore) -> Option<ColorStops> {
        let colors = self.deps[0].value(store).as_array()?;
        if colors.is_empty() {
            return None;
        }
        let positions: Option<Vec<f64>> = self.deps[1]
            .value(store)
            .as_array()
            .filter(|positions| positions.len() == colors.len())
            .and_then(|positions| positions.iter().map(PropertyValue::as_number).collect());

        let last = colors.len().saturating_sub(1).max(1) as f64;
        let mut stops = Vec::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            let offset = match &positions {
                Some(positions) => positions[i],
                None => i as f64 / last,
            };
            #[expect(clippy::cast_possible_truncation, reason = "stop offsets are f32")]
            let offset = offset.clamp(0.0, 1.0) as f32;
            stops.push(ColorStop::from((offset, parse_color(color)?)));
        }
        Some(ColorStops::from(stops.as_slice()))
    }
}

/// The twelve control points of a Coons patch.
///
/// The source is an array of four corner objects `{pos, c1, c2}` in
/// clockwise order starting at the top left. The points follow the patch
/// outline: each corner's position, then its outgoing control point, then
/// the next corner's incoming control point.
#[derive(Clone, Debug)]
pub struct BezierProp {
    deps: [NodeProp; 1],
}

impl BezierProp {
    /// Derives the patch points from `prop`.
    #[must_use]
    pub fn new(prop: NodeProp) -> Self {
        Self { deps: [prop] }
    }

    /// Returns the source descriptor.
    #[must_use]
    pub fn prop(&self) -> NodeProp {
        self.deps[0]
    }
}

impl Derive for BezierProp {
    type Output = [Point; 12];

    fn dependencies(&self) -> &[NodeProp] {
        &self.deps
    }

    fn derive(&self, store: &PropertyStore) -> Option<[Point; 12]> {
        let corners = self.deps[0].value(store).as_array()?;
        if corners.len() < 4 {
            return None;
        }
        let at = |corner: usize, field: &str| parse_point(corners[corner].field(field)?);
        Some([
            at(0, "pos")?,
            at(0, "c2")?,
            at(1, "c1")?,
            at(1, "pos")?,
            at(1, "c2")?,
            at(2, "c1")?,
            at(2, "pos")?,
            at(2, "c2")?,
            at(3, "c1")?,
            at(3, "pos")?,
            at(3, "c2")?,
            at(0, "c1")?,
        ])
    }
}
