// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `canopy_scene`: whole frames over a small tree.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use canopy_property::{Props, SharedValue, SourceValue};
use canopy_scene::{NodeFactory, Scene};

fn point(x: f64, y: f64) -> SourceValue {
    SourceValue::object([("x", x.into()), ("y", y.into())])
}

fn patch(offset: f64) -> SourceValue {
    let corner = |x: f64, y: f64| {
        SourceValue::object([("pos", point(x, y)), ("c1", point(x, y)), ("c2", point(x, y))])
    };
    SourceValue::Array(vec![
        corner(offset, offset),
        corner(offset + 10.0, offset),
        corner(offset + 10.0, offset + 10.0),
        corner(offset, offset + 10.0),
    ])
}

fn build_scene(patches: usize, color: &SharedValue) -> Scene {
    let factory = NodeFactory::new();
    let mut root = factory.create("group", Props::new()).unwrap();
    root.append_child(
        factory
            .create(
                "colorShader",
                Props::new().with("color", color.clone().into_dynamic()),
            )
            .unwrap(),
    );
    for i in 0..patches {
        root.append_child(
            factory
                .create("patch", Props::new().with("patch", patch(i as f64)))
                .unwrap(),
        );
    }
    Scene::new(root)
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/frame");

    for patches in [8_usize, 64] {
        let color = SharedValue::new("red");
        let mut scene = build_scene(patches, &color);
        scene.frame();
        group.bench_function(format!("unchanged_{patches}"), |b| {
            b.iter(|| black_box(scene.frame().len()));
        });

        let mut flip = false;
        group.bench_function(format!("color_changed_{patches}"), |b| {
            b.iter(|| {
                flip = !flip;
                color.set(if flip { "blue" } else { "red" });
                black_box(scene.frame().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
