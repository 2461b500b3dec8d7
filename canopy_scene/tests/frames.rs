// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-level tests for the `canopy_scene` crate.
//!
//! These build small trees through the factory and drive them with
//! `Scene::frame`, checking which nodes rebuild and what gets recorded.

use std::sync::Arc;

use canopy_property::{PropName, PropertyError, Props, SharedValue, SourceValue};
use canopy_scene::{DrawOp, Lifecycle, NodeFactory, Scene, SceneError};
use peniko::{Brush, Color, Extend};

fn point(x: f64, y: f64) -> SourceValue {
    SourceValue::object([("x", x.into()), ("y", y.into())])
}

fn square_patch(size: f64) -> SourceValue {
    let corner = |x: f64, y: f64| {
        SourceValue::object([("pos", point(x, y)), ("c1", point(x, y)), ("c2", point(x, y))])
    };
    SourceValue::Array(vec![
        corner(0.0, 0.0),
        corner(size, 0.0),
        corner(size, size),
        corner(0.0, size),
    ])
}

fn solid(r: u8, g: u8, b: u8) -> Brush {
    Brush::Solid(Color::from_rgba8(r, g, b, 255))
}

#[test]
fn patch_is_drawn_with_the_declared_shader() {
    let factory = NodeFactory::new();
    let mut root = factory.create("group", Props::new()).unwrap();
    root.append_child(
        factory
            .create("colorShader", Props::new().with("color", "#ff0000"))
            .unwrap(),
    );
    root.append_child(
        factory
            .create("patch", Props::new().with("patch", square_patch(10.0)))
            .unwrap(),
    );
    let mut scene = Scene::new(root);

    let ops = scene.frame();
    assert_eq!(ops.len(), 1);
    let DrawOp::Patch { points, shader } = &ops[0];
    assert_eq!(points[6], kurbo::Point::new(10.0, 10.0));
    assert_eq!(shader.as_ref(), Some(&solid(255, 0, 0)));
}

#[test]
fn only_changed_nodes_rebuild() {
    let factory = NodeFactory::new();
    let color = SharedValue::new("red");
    let mut root = factory.create("group", Props::new()).unwrap();
    root.append_child(
        factory
            .create("colorShader", Props::new().with("color", color.clone().into_dynamic()))
            .unwrap(),
    );
    root.append_child(
        factory
            .create("patch", Props::new().with("patch", square_patch(4.0)))
            .unwrap(),
    );
    let mut scene = Scene::new(root);

    let first_points = match &scene.frame()[0] {
        DrawOp::Patch { points, .. } => points.clone(),
    };
    let revisions = |scene: &Scene| -> Vec<u64> {
        scene.root().children().iter().map(|c| c.revision()).collect()
    };
    assert_eq!(revisions(&scene), [1, 1]);

    // Nothing happened: nothing rebuilds, the shader is still applied.
    let ops = scene.frame();
    let DrawOp::Patch { points, shader } = &ops[0];
    assert!(Arc::ptr_eq(points, &first_points));
    assert_eq!(shader.as_ref(), Some(&solid(255, 0, 0)));
    assert_eq!(revisions(&scene), [1, 1]);

    color.set("blue");
    let ops = scene.frame();
    let DrawOp::Patch { points, shader } = &ops[0];
    assert!(Arc::ptr_eq(points, &first_points));
    assert_eq!(shader.as_ref(), Some(&solid(0, 0, 255)));
    assert_eq!(revisions(&scene), [2, 1]);
}

#[test]
fn linear_gradient_brush() {
    let factory = NodeFactory::new();
    let props = Props::new()
        .with("start", point(0.0, 0.0))
        .with("end", SourceValue::Array(vec![100.0.into(), 0.0.into()]))
        .with(
            "colors",
            SourceValue::Array(vec!["red".into(), "blue".into()]),
        )
        .with("mode", "mirror");
    let mut scene = Scene::new(factory.create("linearGradient", props).unwrap());
    scene.frame();

    let Some(Brush::Gradient(gradient)) = scene.root().current_shader() else {
        panic!("expected a gradient brush");
    };
    assert_eq!(gradient.extend, Extend::Reflect);
    assert_eq!(gradient.stops.len(), 2);
    assert_eq!(gradient.stops[1].offset, 1.0);
}

#[test]
fn single_color_gradient_is_solid() {
    let factory = NodeFactory::new();
    let props = Props::new()
        .with("start", point(0.0, 0.0))
        .with("end", point(1.0, 1.0))
        .with("colors", SourceValue::Array(vec!["lime".into()]));
    let mut scene = Scene::new(factory.create("linearGradient", props).unwrap());
    scene.frame();
    assert_eq!(scene.root().current_shader(), Some(&solid(0, 255, 0)));
}

#[test]
fn setup_errors_fail_creation() {
    let factory = NodeFactory::new();
    let gradient = |mode: &str| {
        Props::new()
            .with("start", point(0.0, 0.0))
            .with("end", point(1.0, 0.0))
            .with("colors", SourceValue::Array(vec!["red".into(), "blue".into()]))
            .with("mode", mode)
    };

    assert!(matches!(
        factory.create("linearGradient", gradient("decal")),
        Err(SceneError::InvalidValue { kind: "tile mode", .. })
    ));
    assert!(factory.create("linearGradient", gradient("repeat")).is_ok());

    assert_eq!(
        factory
            .create("linearGradient", Props::new().with("start", point(0.0, 0.0)))
            .unwrap_err(),
        SceneError::Property(PropertyError::Schema {
            name: PropName::new("end"),
        })
    );
    assert!(matches!(
        factory.create("colorShader", Props::new().with("color", true)),
        Err(SceneError::InvalidValue { kind: "color", .. })
    ));
    assert!(matches!(
        factory.create("patch", Props::new().with("patch", SourceValue::Array(vec![]))),
        Err(SceneError::InvalidValue { .. })
    ));
    assert_eq!(
        factory.create("image", Props::new()).unwrap_err(),
        SceneError::UnknownNodeType {
            tag: "image".into()
        }
    );
}

#[test]
fn dropped_node_ignores_late_notifications() {
    let factory = NodeFactory::new();
    let color = SharedValue::new("red");
    let mut root = factory.create("group", Props::new()).unwrap();
    root.append_child(
        factory
            .create("colorShader", Props::new().with("color", color.clone().into_dynamic()))
            .unwrap(),
    );
    let mut scene = Scene::new(root);
    scene.frame();
    assert_eq!(color.listener_count(), 1);

    assert!(scene.root_mut().remove_child(0));
    assert_eq!(color.listener_count(), 0);
    color.set("blue");
    assert!(scene.frame().is_empty());
}

#[test]
fn into_context_disposes_the_tree() {
    let factory = NodeFactory::new();
    let color = SharedValue::new("red");
    let root = factory
        .create("colorShader", Props::new().with("color", color.clone().into_dynamic()))
        .unwrap();
    let mut scene = Scene::new(root);
    scene.frame();
    assert_eq!(scene.root().lifecycle(), Lifecycle::Materialized);

    let ctx = scene.into_context();
    assert_eq!(ctx.frame(), 1);
    assert_eq!(color.listener_count(), 0);
}

#[test]
fn rejected_update_keeps_the_bound_color() {
    let factory = NodeFactory::new();
    let color = SharedValue::new("red");
    let root = factory
        .create("colorShader", Props::new().with("color", color.clone().into_dynamic()))
        .unwrap();
    let mut scene = Scene::new(root);
    scene.frame();

    let err = scene
        .root_mut()
        .set_props(Arc::new(Props::new().with("color", "not-a-color")))
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidValue { kind: "color", .. }));
    assert_eq!(color.listener_count(), 1);

    color.set("blue");
    scene.frame();
    assert_eq!(scene.root().current_shader(), Some(&solid(0, 0, 255)));
}
