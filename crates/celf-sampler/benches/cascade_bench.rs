use celf_core::GraphIndex;
use celf_sampler::{IndependentCascade, SpreadEstimator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Ring lattice with `k` neighbors on each side.
fn ring_lattice(n: i64, k: i64) -> GraphIndex {
    let mut edges = Vec::with_capacity((n * k) as usize);
    for u in 0..n {
        for j in 1..=k {
            edges.push((u, (u + j) % n));
        }
    }
    GraphIndex::build(&edges).unwrap()
}

fn bench_estimate(c: &mut Criterion) {
    let graph = ring_lattice(10_000, 4);
    let mut group = c.benchmark_group("spread_estimate");

    for &p in &[0.05, 0.1, 0.2] {
        let ic = IndependentCascade::new(&graph, p).unwrap();
        let par = SpreadEstimator::new(ic);
        let seq = SpreadEstimator::new(ic).with_parallel(false);

        group.bench_with_input(BenchmarkId::new("sequential", p), &p, |b, _| {
            b.iter(|| seq.estimate(black_box(&[0, 5000]), 100, 42).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", p), &p, |b, _| {
            b.iter(|| par.estimate(black_box(&[0, 5000]), 100, 42).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_estimate);
criterion_main!(benches);
