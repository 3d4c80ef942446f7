// ─────────────────────────────────────────────────────────────────────
// MtxGen — Sequence Statistics
// ─────────────────────────────────────────────────────────────────────
//! Small descriptive-statistics kernels shared by the descriptor engine.
//!
//! Standard deviations are sample deviations (divisor `n - 1`).

use mtxgen_types::Summary;

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation; `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mu = values.iter().sum::<f64>() / n as f64;
    let ss: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Median; even-length input averages the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(0.5 * (sorted[mid - 1] + sorted[mid]))
    } else {
        Some(sorted[mid])
    }
}

/// min/max/mean/std with `std` undefined below two values.
pub fn summarize(values: &[f64]) -> Summary {
    Summary {
        min: min(values),
        max: max(values),
        mean: mean(values),
        std: sample_std(values),
    }
}

/// Like [`summarize`], but a single value has `std = 0.0`.
pub fn summarize_zero_single(values: &[f64]) -> Summary {
    let mut s = summarize(values);
    if values.len() == 1 {
        s.std = Some(0.0);
    }
    s
}
