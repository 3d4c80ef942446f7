// ─────────────────────────────────────────────────────────────────────
// MtxGen — Expansion Engine
// ─────────────────────────────────────────────────────────────────────
//! Pattern-preserving matrix expansion.
//!
//! Source nonzeros are visited in row-major order. Each one is written to
//! its proportionally scaled position in the target shape, then
//! `additional_density` jittered cells around that position are filled
//! with values uniform in the source's nonzero range, skipping cells
//! that already hold a nonzero. A later placement overwrites whatever an
//! earlier one (or its jitter) left in that cell. Extra density thus
//! clusters near real structure instead of being spread uniformly.

use rand::Rng;

use mtxgen_types::{ExpansionParams, GeneratorConfig, Matrix, MtxGenError, MtxGenResult};

/// Proportional position scaling from one shape to another.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PositionScaler {
    row_scale: f64,
    col_scale: f64,
    target_rows: usize,
    target_cols: usize,
}

impl PositionScaler {
    pub(crate) fn new(source: &Matrix, target_rows: usize, target_cols: usize) -> MtxGenResult<Self> {
        let (rows, cols) = source.shape();
        if rows == 0 || cols == 0 {
            return Err(MtxGenError::EmptySource { rows, cols });
        }
        Ok(Self {
            row_scale: target_rows as f64 / rows as f64,
            col_scale: target_cols as f64 / cols as f64,
            target_rows,
            target_cols,
        })
    }

    /// `floor(index × scale)`, clamped into the target bounds.
    #[inline]
    pub(crate) fn scale(&self, row: usize, col: usize) -> (usize, usize) {
        let r = (row as f64 * self.row_scale).floor() as usize;
        let c = (col as f64 * self.col_scale).floor() as usize;
        (r.min(self.target_rows - 1), c.min(self.target_cols - 1))
    }
}

/// `center + offset` with `offset` uniform in `-radius..=radius`, clamped
/// into `0..len`.
#[inline]
fn jitter<R: Rng + ?Sized>(rng: &mut R, center: usize, radius: i64, len: usize) -> usize {
    let offset = rng.gen_range(-radius..=radius);
    let center = i64::try_from(center).unwrap_or(i64::MAX);
    let last = i64::try_from(len.saturating_sub(1)).unwrap_or(i64::MAX);
    center.saturating_add(offset).clamp(0, last) as usize
}

/// Uniform draw in `[min, max]` that never forms `max - min`, which
/// overflows for finite ranges wider than `f64::MAX`.
#[inline]
fn draw_value<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    let u: f64 = rng.gen();
    (min * (1.0 - u) + max * u).clamp(min, max)
}

/// Expansion with a configurable jitter radius.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionEngine {
    jitter_radius: usize,
}

impl Default for ExpansionEngine {
    fn default() -> Self {
        Self { jitter_radius: 3 }
    }
}

impl ExpansionEngine {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            jitter_radius: config.jitter_radius,
        }
    }

    /// Expand using the process-wide generator.
    pub fn expand(&self, source: &Matrix, params: &ExpansionParams) -> MtxGenResult<Matrix> {
        self.expand_with(source, params, &mut rand::thread_rng())
    }

    /// Expand drawing from `rng`.
    ///
    /// Fails on a zero target dimension or a source with a zero
    /// dimension. A source without nonzeros yields an all-zero target.
    pub fn expand_with<R: Rng + ?Sized>(
        &self,
        source: &Matrix,
        params: &ExpansionParams,
        rng: &mut R,
    ) -> MtxGenResult<Matrix> {
        params.validate()?;
        let scaler = PositionScaler::new(source, params.target_rows, params.target_cols)?;
        let mut target = Matrix::zeros(params.target_rows, params.target_cols);

        let Some((min_value, max_value)) = source.nonzero_range() else {
            log::debug!("expansion: source has no nonzeros, returning all-zero target");
            return Ok(target);
        };

        let radius = i64::try_from(self.jitter_radius).unwrap_or(i64::MAX);
        let mut placed = 0usize;
        let mut inserted = 0usize;
        for (r, c, v) in source.nonzeros() {
            let (nr, nc) = scaler.scale(r, c);
            target.set(nr, nc, v);
            placed += 1;

            for _ in 0..params.additional_density {
                let jr = jitter(rng, nr, radius, params.target_rows);
                let jc = jitter(rng, nc, radius, params.target_cols);
                if target.get(jr, jc) == 0.0 {
                    target.set(jr, jc, draw_value(rng, min_value, max_value));
                    inserted += 1;
                }
            }
        }

        log::debug!(
            "expansion: {}x{} -> {}x{}, {placed} placed, {inserted} jittered in",
            source.rows(),
            source.cols(),
            params.target_rows,
            params.target_cols,
        );
        Ok(target)
    }
}

/// Expand with the default jitter radius and the process-wide generator.
pub fn expand(source: &Matrix, params: &ExpansionParams) -> MtxGenResult<Matrix> {
    ExpansionEngine::default().expand(source, params)
}
