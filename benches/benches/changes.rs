// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use canopy_dirty::ChangeSet;
use canopy_dirty::intern::Interner;

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

fn bench_change_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("dirty/change_set");

    for n in [16_u32, 256, 4096] {
        let mut rng = Lcg::new(0x5eed);
        let keys: Vec<u32> = (0..n).map(|_| rng.next_u32() % n).collect();

        group.bench_function(BenchmarkId::new("mark_reset", n), |b| {
            let mut changes = ChangeSet::<u32>::new();
            b.iter(|| {
                for &key in &keys {
                    changes.mark(key);
                }
                black_box(changes.len());
                changes.reset();
            });
        });

        group.bench_function(BenchmarkId::new("changed_since", n), |b| {
            let mut changes = ChangeSet::<u32>::new();
            for &key in &keys {
                changes.mark(key);
            }
            let half = changes.generation() / 2;
            b.iter(|| {
                let stale = keys
                    .iter()
                    .filter(|&&key| changes.changed_since(key, half))
                    .count();
                black_box(stale)
            });
        });
    }

    group.finish();
}

fn bench_interner(c: &mut Criterion) {
    let mut group = c.benchmark_group("dirty/intern");
    let names: Vec<String> = (0..256).map(|i| format!("property_{i}")).collect();

    group.bench_function("lookup_hit", |b| {
        let mut interner = Interner::<String>::new();
        for name in &names {
            interner.intern(name.clone());
        }
        b.iter(|| {
            for name in &names {
                black_box(interner.lookup(name.as_str()));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_change_set, bench_interner);
criterion_main!(benches);
