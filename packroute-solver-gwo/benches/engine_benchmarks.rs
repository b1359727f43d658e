//! Criterion benchmarks for the GWO engine.
//!
//! Measures full runs over clustered synthetic instances of 25, 50 and 100
//! customers, plus the cost of a single decode-and-score pass.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package packroute-solver-gwo
//! ```

#![expect(missing_docs, reason = "criterion_group! expands to undocumented functions")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use packroute_core::synthetic::{ClusteredSpec, clustered};
use packroute_core::{OptimizationConfig, Optimizer, RandomKeyCodec};
use packroute_solver_gwo::{GwoSolver, Wolf};

/// Seed shared by instance generation and the optimizer.
const BENCHMARK_SEED: u64 = 42;

/// Customer counts to benchmark.
const PROBLEM_SIZES: &[usize] = &[25, 50, 100];

fn bench_full_runs(c: &mut Criterion) {
    let mut group = c.benchmark_group("gwo_run");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let config = OptimizationConfig::default()
        .with_population_size(30)
        .with_max_iterations(100)
        .with_seed(BENCHMARK_SEED);
    let solver = GwoSolver::new();

    for &size in PROBLEM_SIZES {
        let Ok(instance) = clustered(&ClusteredSpec {
            customers: size,
            clusters: 4,
            seed: BENCHMARK_SEED,
            ..ClusteredSpec::default()
        }) else {
            continue;
        };
        group.throughput(Throughput::Elements(
            u64::try_from(size).unwrap_or(u64::MAX),
        ));
        group.bench_with_input(BenchmarkId::from_parameter(size), &instance, |b, inst| {
            b.iter(|| solver.optimize(inst, &config));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_and_score");
    for &size in PROBLEM_SIZES {
        let Ok(instance) = clustered(&ClusteredSpec {
            customers: size,
            seed: BENCHMARK_SEED,
            ..ClusteredSpec::default()
        }) else {
            continue;
        };
        let keys = u32::try_from(size).unwrap_or(u32::MAX);
        let position: Vec<f64> = (0..keys).rev().map(f64::from).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &instance, |b, inst| {
            b.iter(|| Wolf::new(position.clone(), &RandomKeyCodec, inst));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_runs, bench_decode);
criterion_main!(benches);
