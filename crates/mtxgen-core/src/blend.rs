// ─────────────────────────────────────────────────────────────────────
// MtxGen — Multi-Seed Blending
// ─────────────────────────────────────────────────────────────────────
//! Convex combination of several seed matrices scaled to one shape.
//!
//! Every seed is scaled with the same position mapping as the expansion
//! engine (no jitter). One weight per seed is drawn uniformly from
//! `[0, 1)` and the weights are normalised to sum to 1.

use rand::Rng;

use mtxgen_types::{Matrix, MtxGenError, MtxGenResult};

use crate::expansion::PositionScaler;

/// Scale `source` to `rows × cols` without adding density.
pub fn scale(source: &Matrix, rows: usize, cols: usize) -> MtxGenResult<Matrix> {
    if rows == 0 || cols == 0 {
        return Err(MtxGenError::Shape(format!(
            "target shape must be at least 1x1, got {rows}x{cols}"
        )));
    }
    let scaler = PositionScaler::new(source, rows, cols)?;
    let mut out = Matrix::zeros(rows, cols);
    for (r, c, v) in source.nonzeros() {
        let (nr, nc) = scaler.scale(r, c);
        out.set(nr, nc, v);
    }
    Ok(out)
}

/// Blend `seeds` into one `rows × cols` matrix with random convex weights.
pub fn blend_with<R: Rng + ?Sized>(
    seeds: &[Matrix],
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> MtxGenResult<Matrix> {
    if seeds.is_empty() {
        return Err(MtxGenError::Config("blend needs at least one seed matrix".into()));
    }
    let scaled = seeds
        .iter()
        .map(|s| scale(s, rows, cols))
        .collect::<MtxGenResult<Vec<_>>>()?;

    let mut factors: Vec<f64> = (0..seeds.len()).map(|_| rng.gen::<f64>()).collect();
    let total: f64 = factors.iter().sum();
    if total > 0.0 {
        factors.iter_mut().for_each(|f| *f /= total);
    } else {
        factors.fill(1.0 / seeds.len() as f64);
    }

    let mut out = Matrix::zeros(rows, cols);
    for (factor, m) in factors.iter().zip(&scaled) {
        for (r, c, v) in m.nonzeros() {
            out.set(r, c, out.get(r, c) + factor * v);
        }
    }
    log::debug!("blend: {} seeds -> {rows}x{cols}, weights {factors:?}", seeds.len());
    Ok(out)
}

/// Blend using the process-wide generator.
pub fn blend(seeds: &[Matrix], rows: usize, cols: usize) -> MtxGenResult<Matrix> {
    blend_with(seeds, rows, cols, &mut rand::thread_rng())
}
