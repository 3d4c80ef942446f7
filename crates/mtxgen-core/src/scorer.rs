// ─────────────────────────────────────────────────────────────────────
// MtxGen — Similarity Scorer (Weighted Descriptor Loss)
// ─────────────────────────────────────────────────────────────────────
//! Weighted L1 distance between two descriptor sets:
//!
//! `loss = Σ_k w_k · |A_k − B_k|` over the keys of the weight table.
//!
//! Terms are independent; no cross-descriptor interaction is modelled.
//! A weighted key unknown to either side is an error, never a silent 0.

use mtxgen_types::{DescriptorSource, MtxGenError, MtxGenResult, WeightTable};

/// One weighted term of the loss.
#[derive(Debug, Clone, PartialEq)]
pub struct LossTerm {
    pub key: String,
    pub weight: f64,
    /// `|A − B|`; 0 when the descriptor is undefined on both sides.
    pub difference: f64,
    pub contribution: f64,
}

pub struct SimilarityScorer {
    weights: WeightTable,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(WeightTable::default())
    }
}

impl SimilarityScorer {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Per-key breakdown in weight-table order.
    pub fn breakdown<A, B>(&self, original: &A, candidate: &B) -> MtxGenResult<Vec<LossTerm>>
    where
        A: DescriptorSource + ?Sized,
        B: DescriptorSource + ?Sized,
    {
        let lhs = original.entries();
        let rhs = candidate.entries();
        let lookup = |entries: &[(&'static str, Option<f64>)], key: &str, side: &'static str| {
            entries
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .ok_or_else(|| MtxGenError::MissingDescriptor {
                    key: key.to_string(),
                    side,
                })
        };

        let mut terms = Vec::with_capacity(self.weights.len());
        for (key, weight) in self.weights.iter() {
            let a = lookup(&lhs, key, "original")?;
            let b = lookup(&rhs, key, "candidate")?;
            let difference = match (a, b) {
                (Some(a), Some(b)) => (a - b).abs(),
                (None, None) => 0.0,
                _ => {
                    return Err(MtxGenError::UndefinedDescriptor {
                        key: key.to_string(),
                    })
                }
            };
            terms.push(LossTerm {
                key: key.to_string(),
                weight,
                difference,
                contribution: weight * difference,
            });
        }
        Ok(terms)
    }

    /// Total weighted loss; 0 for identical descriptor sets.
    pub fn loss<A, B>(&self, original: &A, candidate: &B) -> MtxGenResult<f64>
    where
        A: DescriptorSource + ?Sized,
        B: DescriptorSource + ?Sized,
    {
        let total = total_loss(&self.breakdown(original, candidate)?)?;
        log::debug!("similarity loss over {} keys: {total:.6}", self.weights.len());
        Ok(total)
    }
}

/// Sum of the term contributions; fails if the sum is not finite.
pub fn total_loss(terms: &[LossTerm]) -> MtxGenResult<f64> {
    let total: f64 = terms.iter().map(|t| t.contribution).sum();
    if !total.is_finite() {
        return Err(MtxGenError::Numerical(format!(
            "similarity loss is not finite: {total}"
        )));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::compute_descriptors;
    use mtxgen_types::Matrix;

    fn diag4() -> Matrix {
        Matrix::from_triplets(4, 4, &[(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0), (3, 3, 4.0)])
            .unwrap()
    }

    #[test]
    fn test_identical_sets_score_zero() {
        let d = compute_descriptors(&diag4());
        let scorer = SimilarityScorer::default();
        assert_eq!(scorer.loss(&d, &d).unwrap(), 0.0);
    }

    #[test]
    fn test_weighted_l1() {
        let a = compute_descriptors(&diag4());
        let mut m = diag4();
        m.set(0, 3, 2.0);
        let b = compute_descriptors(&m);
        let weights = WeightTable::from_pairs([
            ("bandwidth", 0.5),
            ("num_structurally_unsymmetric_elements", 2.0),
        ])
        .unwrap();
        let loss = SimilarityScorer::new(weights).loss(&a, &b).unwrap();
        // bandwidth 0 -> 3, unsymmetric 0 -> 2: 0.5 * 3 + 2.0 * 2 = 5.5
        assert!((loss - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_unweighted_keys_ignored() {
        let a = compute_descriptors(&diag4());
        let b = compute_descriptors(&Matrix::identity(7));
        let weights = WeightTable::from_pairs([("pattern_symmetry", 1.0)]).unwrap();
        assert_eq!(SimilarityScorer::new(weights).loss(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_key_is_error() {
        let d = compute_descriptors(&diag4());
        let weights = WeightTable::from_pairs([("spectral_radius", 1.0)]).unwrap();
        let err = SimilarityScorer::new(weights).loss(&d, &d).unwrap_err();
        assert!(matches!(
            err,
            MtxGenError::MissingDescriptor { side: "original", .. }
        ));
    }

    #[test]
    fn test_one_sided_undefined_is_error() {
        let a = compute_descriptors(&diag4());
        let b = compute_descriptors(&Matrix::zeros(4, 4));
        let weights = WeightTable::from_pairs([("value_min", 1.0)]).unwrap();
        let err = SimilarityScorer::new(weights).loss(&a, &b).unwrap_err();
        assert!(matches!(err, MtxGenError::UndefinedDescriptor { .. }));
    }

    #[test]
    fn test_both_undefined_contributes_zero() {
        let a = compute_descriptors(&Matrix::zeros(4, 4));
        let b = compute_descriptors(&Matrix::zeros(5, 5));
        let weights = WeightTable::from_pairs([("value_min", 1.0), ("num_rows", 1.0)]).unwrap();
        let terms = SimilarityScorer::new(weights).breakdown(&a, &b).unwrap();
        assert_eq!(terms.len(), 2);
        let num_rows = terms.iter().find(|t| t.key == "num_rows").unwrap();
        assert_eq!(num_rows.contribution, 1.0);
        let value_min = terms.iter().find(|t| t.key == "value_min").unwrap();
        assert_eq!(value_min.contribution, 0.0);
    }

    #[test]
    fn test_total_matches_loss_and_rejects_overflow() {
        let a = compute_descriptors(&diag4());
        let b = compute_descriptors(&Matrix::identity(4));
        let scorer = SimilarityScorer::default();
        let terms = scorer.breakdown(&a, &b).unwrap();
        assert_eq!(total_loss(&terms).unwrap(), scorer.loss(&a, &b).unwrap());

        let huge = |key: &str| LossTerm {
            key: key.to_string(),
            weight: 1.0,
            difference: f64::MAX,
            contribution: f64::MAX,
        };
        let err = total_loss(&[huge("norm_1"), huge("norm_inf")]).unwrap_err();
        assert!(matches!(err, MtxGenError::Numerical(_)));
    }

    #[test]
    fn test_scores_averaged_descriptors() {
        let d = compute_descriptors(&diag4());
        let avg = mtxgen_types::DescriptorSet::average(&[d.clone(), d.clone()]).unwrap();
        let weights = WeightTable::from_pairs([("frobenius_norm", 1.0), ("norm_1", 1.0)]).unwrap();
        let loss = SimilarityScorer::new(weights).loss(&d, &avg).unwrap();
        assert!(loss.abs() < 1e-12);
    }
}
