//! Benchmark for PersistentVector vs standard Vec.
//!
//! Compares the persistent operations against Rust's standard Vec for the
//! same workloads.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use trie_vector::persistent::PersistentVector;

// =============================================================================
// push_back Benchmark
// =============================================================================

fn benchmark_push_back(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("push_back");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("PersistentVector", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut vector = PersistentVector::new();
                    for index in 0..size {
                        vector = vector.push_back(black_box(index));
                    }
                    black_box(vector)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut vector = Vec::new();
                for index in 0..size {
                    vector.push(black_box(index));
                }
                black_box(vector)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark (Random Access)
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100_usize, 1_000, 10_000, 100_000] {
        let persistent_vector: PersistentVector<usize> = (0..size).collect();
        let standard_vector: Vec<usize> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentVector", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for index in 0..size {
                        if let Some(&value) = persistent_vector.get(black_box(index)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0;
                for index in 0..size {
                    if let Some(&value) = standard_vector.get(black_box(index)) {
                        sum += value;
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// set Benchmark
// =============================================================================

fn benchmark_set(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("set");

    for size in [1_000_usize, 10_000, 100_000] {
        let persistent_vector: PersistentVector<usize> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentVector", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut vector = persistent_vector.clone();
                    for index in (0..size).step_by(97) {
                        if let Ok(updated) = vector.set(black_box(index), 0) {
                            vector = updated;
                        }
                    }
                    black_box(vector)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// pop_back Benchmark
// =============================================================================

fn benchmark_pop_back(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("pop_back");

    for size in [1_000_usize, 10_000] {
        let persistent_vector: PersistentVector<usize> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentVector", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut vector = persistent_vector.clone();
                    while let Ok((remaining, element)) = vector.pop_back() {
                        black_box(element);
                        vector = remaining;
                    }
                    black_box(vector)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in [1_000_usize, 100_000] {
        let persistent_vector: PersistentVector<usize> = (0..size).collect();
        let standard_vector: Vec<usize> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentVector", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(persistent_vector.iter().sum::<usize>()));
            },
        );

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, _| {
            bencher.iter(|| black_box(standard_vector.iter().sum::<usize>()));
        });
    }

    group.finish();
}

// =============================================================================
// map Benchmark
// =============================================================================

fn benchmark_map(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("map");

    for size in [1_000_u64, 10_000] {
        let persistent_vector: PersistentVector<u64> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("PersistentVector", size),
            &size,
            |bencher, _| {
                bencher.iter(|| black_box(persistent_vector.map(|element| element * element)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_push_back,
    benchmark_get,
    benchmark_set,
    benchmark_pop_back,
    benchmark_iteration,
    benchmark_map
);
criterion_main!(benches);
