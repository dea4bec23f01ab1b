//! Criterion benchmarks for CAPM Lab hot paths.
//!
//! Benchmarks:
//! 1. Single evaluation
//! 2. SML sampling at several resolutions
//! 3. Full calculation pipeline (evaluate + format + curve + comparison)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use capmlab_core::{calculate, evaluate, generate_curve_with, BetaDomain, CapmInputs, Settings};

fn bench_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate", |b| {
        b.iter(|| evaluate(black_box(0.02), black_box(1.3), black_box(0.08)))
    });
}

fn bench_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("sml_curve");
    for n in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| generate_curve_with(0.02, 0.08, BetaDomain::default(), black_box(n)))
        });
    }
    group.finish();
}

fn bench_calculate(c: &mut Criterion) {
    let inputs = CapmInputs::default();
    let settings = Settings::default();
    c.bench_function("calculate_default", |b| {
        b.iter(|| calculate(black_box(&inputs), black_box(&settings)))
    });
}

criterion_group!(benches, bench_evaluate, bench_curve, bench_calculate);
criterion_main!(benches);
