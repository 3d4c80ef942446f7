// ─────────────────────────────────────────────────────────────────────
// MtxGen — Perturbation Engine
// ─────────────────────────────────────────────────────────────────────
//! Per-row value randomization around one anchor.
//!
//! In every row with nonzeros, the nonzero at index `count / 2` among
//! the row's nonzero positions (column order) keeps its value. Every
//! other nonzero is replaced by a random integer from
//! `[ceil(min), floor(max)]` of the global nonzero range. Zero is never
//! drawn, so the nonzero pattern is unchanged; when that integer range
//! holds no nonzero value the draw is real-valued in `[min, max]`.

use rand::Rng;

use mtxgen_types::Matrix;

/// Replacement-value sampler over the global nonzero range.
#[derive(Debug, Clone, Copy)]
struct ValueSampler {
    min: f64,
    max: f64,
    int_range: Option<(i64, i64)>,
}

impl ValueSampler {
    fn new(min: f64, max: f64) -> Self {
        let (lo, hi) = (min.ceil(), max.floor());
        let has_nonzero_int = lo <= hi && !(lo == 0.0 && hi == 0.0);
        Self {
            min,
            max,
            int_range: has_nonzero_int.then_some((lo as i64, hi as i64)),
        }
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self.int_range {
            Some((lo, hi)) => loop {
                let v = rng.gen_range(lo..=hi);
                if v != 0 {
                    break v as f64;
                }
            },
            None => {
                let v = rng.gen_range(self.min..=self.max);
                if v == 0.0 {
                    self.max
                } else {
                    v
                }
            }
        }
    }
}

/// Perturb drawing from `rng`. An all-zero input is returned unchanged.
pub fn perturb_with<R: Rng + ?Sized>(matrix: &Matrix, rng: &mut R) -> Matrix {
    let mut out = matrix.clone();
    let Some((min, max)) = matrix.nonzero_range() else {
        return out;
    };
    let sampler = ValueSampler::new(min, max);

    let mut changed = 0usize;
    for r in 0..matrix.rows() {
        let positions: Vec<usize> = matrix
            .row(r)
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(|(c, _)| c)
            .collect();
        if positions.is_empty() {
            continue;
        }
        let anchor = positions[positions.len() / 2];
        for &c in positions.iter().filter(|&&c| c != anchor) {
            out.set(r, c, sampler.draw(rng));
            changed += 1;
        }
    }
    log::debug!("perturbation: {changed} values redrawn in [{min}, {max}]");
    out
}

/// Perturb using the process-wide generator.
pub fn perturb(matrix: &Matrix) -> Matrix {
    perturb_with(matrix, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> Matrix {
        Matrix::from_rows(&[
            vec![1.0, 0.0, 3.0, 5.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 9.0, 0.0, 0.0],
            vec![2.0, 4.0, 6.0, 8.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_all_zero_unchanged() {
        let m = Matrix::zeros(3, 3);
        assert_eq!(perturb_with(&m, &mut StdRng::seed_from_u64(1)), m);
    }

    #[test]
    fn test_anchor_preserved() {
        let m = sample();
        let p = perturb_with(&m, &mut StdRng::seed_from_u64(2));
        // Row 0 nonzeros at [0, 2, 3] -> anchor column 2.
        assert_eq!(p.get(0, 2), 3.0);
        // Row 2 single nonzero is its own anchor.
        assert_eq!(p.get(2, 1), 9.0);
        // Row 3 nonzeros at [0, 1, 2, 3] -> anchor column 2.
        assert_eq!(p.get(3, 2), 6.0);
    }

    #[test]
    fn test_pattern_and_shape_preserved() {
        let m = sample();
        for seed in 0..20 {
            let p = perturb_with(&m, &mut StdRng::seed_from_u64(seed));
            assert_eq!(p.shape(), m.shape());
            let a: Vec<_> = m.nonzeros().map(|(r, c, _)| (r, c)).collect();
            let b: Vec<_> = p.nonzeros().map(|(r, c, _)| (r, c)).collect();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_replacements_are_integers_in_range() {
        let m = sample();
        let p = perturb_with(&m, &mut StdRng::seed_from_u64(3));
        for (_, _, v) in p.nonzeros() {
            assert_eq!(v.fract(), 0.0);
            assert!((1.0..=9.0).contains(&v));
        }
    }

    #[test]
    fn test_range_spanning_zero_never_draws_zero() {
        let m = Matrix::from_rows(&[vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0]]).unwrap();
        for seed in 0..50 {
            let p = perturb_with(&m, &mut StdRng::seed_from_u64(seed));
            assert_eq!(p.nnz(), 6);
        }
    }

    #[test]
    fn test_fractional_range_falls_back_to_real() {
        let m = Matrix::from_rows(&[vec![0.2, 0.5, 0.7]]).unwrap();
        let p = perturb_with(&m, &mut StdRng::seed_from_u64(4));
        assert_eq!(p.get(0, 1), 0.5);
        for (_, _, v) in p.nonzeros() {
            assert!((0.2..=0.7).contains(&v));
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let m = sample();
        let copy = m.clone();
        let _ = perturb(&m);
        assert_eq!(m, copy);
    }
}
