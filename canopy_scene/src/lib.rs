// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Scene: scene nodes materialized from bound properties.
//!
//! This crate builds a small scene graph on top of `canopy_property`. Every
//! [`SceneNode`] owns a property store and a type-specific [`NodeBehavior`].
//! Nodes are created by a [`NodeFactory`] from a type tag and an authored
//! property bag, and driven once per frame by a [`Scene`].
//!
//! ## Materialization
//!
//! A node is *changed* when it was never materialized, when its store has
//! changes, or when one of its derived properties is dirty. Only changed
//! nodes rebuild their native resource (a brush, patch geometry); unchanged
//! nodes keep exposing the previous one.
//!
//! ## Built-in node types
//!
//! | Tag | Properties | Resource |
//! |-----|------------|----------|
//! | `group` | none | renders its children |
//! | `colorShader` | `color` (required) | [`peniko::Brush::Solid`] |
//! | `linearGradient` | `start`, `end`, `colors` (required), `positions`, `mode` | [`peniko::Brush::Gradient`] |
//! | `patch` | `patch` (required) | a recorded [`DrawOp::Patch`] |
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_property::{Props, SharedValue};
//! use canopy_scene::{NodeFactory, Scene};
//! use peniko::{Brush, Color};
//!
//! let factory = NodeFactory::new();
//! let color = SharedValue::new("red");
//!
//! let mut root = factory.create("group", Props::new()).unwrap();
//! root.append_child(
//!     factory
//!         .create("colorShader", Props::new().with("color", color.clone().into_dynamic()))
//!         .unwrap(),
//! );
//! let mut scene = Scene::new(root);
//!
//! scene.frame();
//! let shader = scene.root().children()[0].current_shader().cloned();
//! assert_eq!(shader, Some(Brush::Solid(Color::from_rgba8(255, 0, 0, 255))));
//!
//! color.set("blue");
//! scene.frame();
//! let shader = scene.root().children()[0].current_shader().cloned();
//! assert_eq!(shader, Some(Brush::Solid(Color::from_rgba8(0, 0, 255, 255))));
//! ```

mod context;
mod error;
mod factory;
mod node;
pub mod nodes;
pub mod props;
mod scene;

pub use context::{DrawOp, DrawingContext, Paint};
pub use error::SceneError;
pub use factory::{NodeConstructor, NodeFactory};
pub use node::{Lifecycle, NodeBehavior, SceneNode};
pub use scene::Scene;
