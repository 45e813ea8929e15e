//! Dispatch resolution benchmarks using criterion.
//!
//! Run with: cargo bench --bench resolve_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyresolve::{Dispatcher, TyId, TypeGraph};

/// A linear chain T0 <- T1 <- ... <- T(n-1).
fn chain(n: usize) -> (TypeGraph, Vec<TyId>) {
    let mut graph = TypeGraph::new();
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let name = format!("T{i}");
        let parent = i.checked_sub(1).map(|p| format!("T{p}"));
        let parents: Vec<&str> = parent.iter().map(String::as_str).collect();
        ids.push(graph.declare(name, &parents).unwrap());
    }
    (graph, ids)
}

fn bench_resolve_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_chain");

    for depth in [4usize, 16, 64] {
        let (graph, ids) = chain(depth);
        let mut dispatch = Dispatcher::new(graph);
        for (i, id) in ids.iter().enumerate() {
            dispatch.register([*id], i);
        }
        let leaf = *ids.last().unwrap();

        // Every registered method applies to the leaf: worst case for the
        // pairwise dominance check.
        group.bench_with_input(BenchmarkId::new("leaf", depth), &leaf, |b, leaf| {
            b.iter(|| black_box(dispatch.resolve(black_box(&[*leaf]))).is_ok())
        });
    }

    group.finish();
}

fn bench_resolve_diamond(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_diamond");

    let mut graph = TypeGraph::new();
    let a = graph.declare("A", &[]).unwrap();
    let b = graph.declare("B", &["A"]).unwrap();
    let c_ty = graph.declare("C", &["A"]).unwrap();
    let d = graph.declare("D", &["B", "C"]).unwrap();

    let mut dispatch = Dispatcher::new(graph);
    dispatch.register([a], "a");
    dispatch.register([b], "b");
    dispatch.register([c_ty], "c");

    group.bench_function("ambiguous", |bench| {
        bench.iter(|| black_box(dispatch.resolve(black_box(&[d]))).is_err())
    });

    group.bench_function("unique", |bench| {
        bench.iter(|| black_box(dispatch.resolve(black_box(&[b]))).is_ok())
    });

    group.finish();
}

criterion_group!(benches, bench_resolve_chain, bench_resolve_diamond);
criterion_main!(benches);
