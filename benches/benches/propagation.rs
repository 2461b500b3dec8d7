// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `canopy_property`: resolve, stage/commit and derived reads.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use canopy_property::{
    DerivedProp, NodeProp, PropName, PropertySchema, PropertyStore, PropertyValue, Props,
    SharedValue, SourceValue,
};

fn wide_props(n: usize) -> (Props, Vec<NodeProp>) {
    let mut props = Props::new();
    let mut descriptors = Vec::with_capacity(n);
    for i in 0..n {
        let name = format!("p{i}");
        props.set(&name, i as f64);
        descriptors.push(NodeProp::number(&name));
    }
    (props, descriptors)
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("property/resolve");

    for n in [4_usize, 16, 64] {
        let (props, descriptors) = wide_props(n);
        let mut schema = PropertySchema::new();
        for prop in &descriptors {
            schema.define(*prop);
        }
        group.bench_function(BenchmarkId::new("plain", n), |b| {
            b.iter_batched(
                || PropertyStore::new(props.clone()),
                |mut store| {
                    schema.resolve(&mut store).unwrap();
                    black_box(store)
                },
                BatchSize::SmallInput,
            );
        });
    }

    let shared = SharedValue::new(1.0);
    let selector = SourceValue::selector(shared.clone().into_dynamic(), |v| {
        PropertyValue::Number(v.as_number().unwrap_or(0.0) * 2.0)
    });
    let props = Props::new()
        .with("dynamic", shared.into_dynamic())
        .with("selector", selector);
    group.bench_function("dynamic_and_selector", |b| {
        b.iter_batched(
            || PropertyStore::new(props.clone()),
            |mut store| {
                store.resolve_number(PropName::new("dynamic")).unwrap();
                store.resolve_number(PropName::new("selector")).unwrap();
                black_box(store)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("property/commit");

    for n in [1_usize, 16, 256] {
        let names: Vec<PropName> = (0..n).map(|i| PropName::new(&format!("c{i}"))).collect();
        group.bench_function(BenchmarkId::new("stage_commit_reset", n), |b| {
            let mut store = PropertyStore::new(Props::new());
            let mut tick = 0.0;
            b.iter(|| {
                tick += 1.0;
                for &name in &names {
                    store.stage_transaction(name, PropertyValue::Number(tick));
                }
                black_box(store.commit_transactions());
                store.reset_changes();
            });
        });
    }

    group.bench_function("notify_commit", |b| {
        let shared = SharedValue::new(0.0);
        let mut store = PropertyStore::new(Props::new().with("v", shared.clone().into_dynamic()));
        store.resolve_number(PropName::new("v")).unwrap();
        let mut tick = 0.0;
        b.iter(|| {
            tick += 1.0;
            shared.set(tick);
            black_box(store.commit_transactions());
            store.reset_changes();
        });
    });

    group.bench_function("empty_commit", |b| {
        let mut store = PropertyStore::new(Props::new());
        b.iter(|| black_box(store.commit_transactions()));
    });

    group.finish();
}

fn bench_derived(c: &mut Criterion) {
    let mut group = c.benchmark_group("property/derived");

    let (props, descriptors) = wide_props(8);
    let mut store = PropertyStore::new(props);
    for prop in &descriptors {
        prop.resolve(&mut store).unwrap();
    }
    let deps = descriptors.clone();
    let mut sum = DerivedProp::from_fn(descriptors.clone(), move |store: &PropertyStore| {
        Some(deps.iter().filter_map(|d| d.value(store).as_number()).sum::<f64>())
    });

    group.bench_function("clean_read", |b| {
        sum.update(&store);
        b.iter(|| black_box(sum.get_derived_value(&store).copied()));
    });

    let first = descriptors[0].name();
    group.bench_function("dirty_read", |b| {
        let mut tick = 0.0;
        b.iter(|| {
            tick += 1.0;
            store.stage_transaction(first, PropertyValue::Number(tick));
            store.commit_transactions();
            store.reset_changes();
            black_box(sum.get_derived_value(&store).copied())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_commit, bench_derived);
criterion_main!(benches);
