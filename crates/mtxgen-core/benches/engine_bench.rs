// ─────────────────────────────────────────────────────────────────────
// MtxGen — Engine Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for descriptor extraction, condition estimation,
//! expansion, perturbation and scoring on a banded test matrix.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mtxgen_core::{
    compute_descriptors, estimate_condition_1, perturb_with, ExpansionEngine, SimilarityScorer,
};
use mtxgen_types::{ExpansionParams, Matrix};

// ── Helpers ───────────────────────────────────────────────────────────

/// Diagonally dominant tridiagonal matrix with a few far off-diagonals.
fn make_banded(n: usize) -> Matrix {
    let mut m = Matrix::zeros(n, n);
    for i in 0..n {
        m.set(i, i, 4.0 + (i % 5) as f64);
        if i + 1 < n {
            m.set(i, i + 1, -1.0);
            m.set(i + 1, i, -1.0);
        }
        if i % 7 == 0 && i + 9 < n {
            m.set(i, i + 9, 0.5);
        }
    }
    m
}

// ── Descriptors ───────────────────────────────────────────────────────

fn bench_descriptors_64(c: &mut Criterion) {
    let m = make_banded(64);
    c.bench_function("descriptors_64", |b| b.iter(|| compute_descriptors(black_box(&m))));
}

fn bench_descriptors_256(c: &mut Criterion) {
    let m = make_banded(256);
    c.bench_function("descriptors_256", |b| b.iter(|| compute_descriptors(black_box(&m))));
}

fn bench_condition_256(c: &mut Criterion) {
    let m = make_banded(256);
    c.bench_function("condition_estimate_256", |b| {
        b.iter(|| estimate_condition_1(black_box(&m)))
    });
}

// ── Generation ────────────────────────────────────────────────────────

fn bench_expand_64_to_256(c: &mut Criterion) {
    let m = make_banded(64);
    let params = ExpansionParams::new(256, 256, 4);
    let engine = ExpansionEngine::default();
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("expand_64_to_256_d4", |b| {
        b.iter(|| engine.expand_with(black_box(&m), &params, &mut rng))
    });
}

fn bench_perturb_256(c: &mut Criterion) {
    let m = make_banded(256);
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("perturb_256", |b| b.iter(|| perturb_with(black_box(&m), &mut rng)));
}

// ── Scoring ───────────────────────────────────────────────────────────

fn bench_scorer_loss(c: &mut Criterion) {
    let a = compute_descriptors(&make_banded(64));
    let b_set = compute_descriptors(&make_banded(96));
    let scorer = SimilarityScorer::default();
    c.bench_function("scorer_loss", |b| {
        b.iter(|| scorer.loss(black_box(&a), black_box(&b_set)))
    });
}

criterion_group!(
    benches,
    bench_descriptors_64,
    bench_descriptors_256,
    bench_condition_256,
    bench_expand_64_to_256,
    bench_perturb_256,
    bench_scorer_loss,
);
criterion_main!(benches);
