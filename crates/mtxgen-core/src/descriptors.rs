// ─────────────────────────────────────────────────────────────────────
// MtxGen — Descriptor Engine
// ─────────────────────────────────────────────────────────────────────
//! Single deterministic pass from a matrix to its [`DescriptorSet`].
//!
//! Pattern and value statistics cost O(nnz); per-line statistics and
//! norms walk the dense buffer, O(rows × cols). Nothing is cached
//! between calls.

use std::collections::HashSet;

use mtxgen_types::{
    AxisStatistics, DescriptorSet, GeneratorConfig, Matrix, Summary, STRICT_SYMMETRY_TOLERANCE,
};

use crate::condition::{estimate_condition_1, matrix_norm_1};
use crate::stats;

/// Computes descriptor sets with a fixed symmetry tolerance.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorEngine {
    symmetry_tolerance: f64,
}

impl Default for DescriptorEngine {
    fn default() -> Self {
        Self {
            symmetry_tolerance: STRICT_SYMMETRY_TOLERANCE,
        }
    }
}

impl DescriptorEngine {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            symmetry_tolerance: config.symmetry_tolerance,
        }
    }

    pub fn with_tolerance(symmetry_tolerance: f64) -> Self {
        Self { symmetry_tolerance }
    }

    pub fn symmetry_tolerance(&self) -> f64 {
        self.symmetry_tolerance
    }

    pub fn compute(&self, m: &Matrix) -> DescriptorSet {
        let (rows, cols) = m.shape();
        let nnz = m.nnz();
        let total = rows * cols;
        let density_percent = if total > 0 {
            100.0 * nnz as f64 / total as f64
        } else {
            0.0
        };

        let unmatched = unmatched_mirror_count(m);
        let (avg_distance_to_diagonal, num_diagonals_with_nonzeros, bandwidth) =
            diagonal_locality(m);

        let nonzero_values: Vec<f64> = m.nonzeros().map(|(_, _, v)| v).collect();

        let set = DescriptorSet {
            num_rows: rows,
            num_cols: cols,
            num_nonzeros: nnz,
            density_percent,
            pattern_symmetry: unmatched == 0,
            numerical_symmetry: is_numerically_symmetric(m, self.symmetry_tolerance),
            nonzeros_per_row: stats::summarize(&row_counts(m)),
            nonzeros_per_col: stats::summarize(&col_counts(m)),
            values: stats::summarize_zero_single(&nonzero_values),
            row_stats: axis_statistics((0..rows).map(|r| m.row(r).to_vec()), rows, cols),
            col_stats: axis_statistics((0..cols).map(|c| m.column(c)), cols, rows),
            avg_distance_to_diagonal,
            num_diagonals_with_nonzeros,
            bandwidth,
            // |S \ Sᵀ| == |Sᵀ \ S| because transposition is a bijection.
            num_structurally_unsymmetric_elements: 2 * unmatched,
            norm_1: (total > 0).then(|| matrix_norm_1(m)),
            norm_inf: (total > 0).then(|| norm_inf(m)),
            frobenius_norm: m.as_slice().iter().map(|v| v * v).sum::<f64>().sqrt(),
            estimated_condition_number: estimate_condition_1(m),
        };

        log::debug!(
            "descriptors: {rows}x{cols}, nnz={nnz}, bandwidth={}, pattern_symmetric={}",
            set.bandwidth,
            set.pattern_symmetry
        );
        set
    }
}

/// Descriptors with the strict symmetry tolerance.
pub fn compute_descriptors(m: &Matrix) -> DescriptorSet {
    DescriptorEngine::default().compute(m)
}

/// Nonzero positions whose mirror position holds no nonzero.
fn unmatched_mirror_count(m: &Matrix) -> usize {
    let (rows, cols) = m.shape();
    m.nonzeros()
        .filter(|&(r, c, _)| !(c < rows && r < cols && m.get(c, r) != 0.0))
        .count()
}

fn is_numerically_symmetric(m: &Matrix, tol: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    let n = m.rows();
    (0..n).all(|r| ((r + 1)..n).all(|c| (m.get(r, c) - m.get(c, r)).abs() <= tol))
}

/// (mean |r - c|, distinct |r - c| count, max |r - c|) over nonzeros.
fn diagonal_locality(m: &Matrix) -> (Option<f64>, usize, usize) {
    let distances: Vec<usize> = m.nonzeros().map(|(r, c, _)| r.abs_diff(c)).collect();
    if distances.is_empty() {
        return (None, 0, 0);
    }
    let avg = distances.iter().sum::<usize>() as f64 / distances.len() as f64;
    let distinct = distances.iter().collect::<HashSet<_>>().len();
    let bandwidth = distances.iter().copied().max().unwrap_or(0);
    (Some(avg), distinct, bandwidth)
}

fn row_counts(m: &Matrix) -> Vec<f64> {
    (0..m.rows())
        .map(|r| m.row(r).iter().filter(|&&v| v != 0.0).count() as f64)
        .collect()
}

fn col_counts(m: &Matrix) -> Vec<f64> {
    let mut counts = vec![0.0; m.cols()];
    for (_, c, _) in m.nonzeros() {
        counts[c] += 1.0;
    }
    counts
}

fn norm_inf(m: &Matrix) -> f64 {
    (0..m.rows())
        .map(|r| m.row(r).iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Per-line min/max/mean/std/median over every entry (zeros included),
/// each aggregated again across lines. `line_len` is the entry count of
/// one line.
fn axis_statistics<I>(lines: I, line_count: usize, line_len: usize) -> AxisStatistics
where
    I: Iterator<Item = Vec<f64>>,
{
    if line_count == 0 || line_len == 0 {
        return AxisStatistics::UNDEFINED;
    }

    let mut mins = Vec::with_capacity(line_count);
    let mut maxs = Vec::with_capacity(line_count);
    let mut means = Vec::with_capacity(line_count);
    let mut stds = Vec::with_capacity(line_count);
    let mut medians = Vec::with_capacity(line_count);

    for line in lines {
        // Non-empty lines: every per-line statistic is defined.
        mins.push(stats::min(&line).unwrap_or(0.0));
        maxs.push(stats::max(&line).unwrap_or(0.0));
        means.push(stats::mean(&line).unwrap_or(0.0));
        stds.push(stats::sample_std(&line).unwrap_or(0.0));
        medians.push(stats::median(&line).unwrap_or(0.0));
    }

    let agg = |v: &[f64]| -> Summary { stats::summarize_zero_single(v) };
    AxisStatistics {
        min: agg(&mins),
        max: agg(&maxs),
        mean: agg(&means),
        std: agg(&stds),
        median: agg(&medians),
    }
}
