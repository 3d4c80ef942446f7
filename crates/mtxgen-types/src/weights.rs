// ─────────────────────────────────────────────────────────────────────
// MtxGen — Descriptor Weight Table
// ─────────────────────────────────────────────────────────────────────
//! Per-descriptor weights for the similarity loss.
//!
//! Keys absent from the table contribute nothing to the loss. The default
//! table weights value and row statistics at 1, column statistics at 0.1,
//! and the unbounded structural counts (bandwidth, norms, condition
//! number) at 1e-4..1e-2 so that no single descriptor dominates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MtxGenError, MtxGenResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: BTreeMap<String, f64>,
}

const STAT_NAMES: [&str; 5] = ["min", "max", "mean", "std", "median"];
const AGG_NAMES: [&str; 4] = ["min", "max", "mean", "std"];

impl Default for WeightTable {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        let mut put = |key: &str, w: f64| {
            weights.insert(key.to_string(), w);
        };

        put("pattern_symmetry", 1.0);
        put("numerical_symmetry", 1.0);

        for axis in ["row", "col"] {
            for agg in ["min", "max", "avg", "std"] {
                put(&format!("nonzeros_per_{axis}_{agg}"), 0.001);
            }
        }
        for agg in ["min", "max", "avg", "std"] {
            put(&format!("value_{agg}"), 1.0);
        }
        for stat in STAT_NAMES {
            for agg in AGG_NAMES {
                put(&format!("row_{stat}_{agg}"), 1.0);
                put(&format!("col_{stat}_{agg}"), 0.1);
            }
        }
        // Reference table zeroes this one out.
        put("col_max_mean", 0.0);

        put("avg_distance_to_diagonal", 0.001);
        put("num_diagonals_with_nonzeros", 0.0001);
        put("bandwidth", 0.001);
        put("num_structurally_unsymmetric_elements", 0.001);
        put("norm_1", 0.0001);
        put("norm_inf", 0.0001);
        put("frobenius_norm", 0.01);
        put("estimated_condition_number", 0.001);

        Self { weights }
    }
}

impl WeightTable {
    /// Table with no weighted keys (scores everything as 0).
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, K>(pairs: I) -> MtxGenResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let table = Self {
            weights: pairs.into_iter().map(|(k, w)| (k.into(), w)).collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Weights must be finite and non-negative.
    pub fn validate(&self) -> MtxGenResult<()> {
        for (key, &w) in &self.weights {
            if !w.is_finite() || w < 0.0 {
                return Err(MtxGenError::Config(format!(
                    "weight for '{key}' must be finite and >= 0, got {w}"
                )));
            }
        }
        Ok(())
    }

    /// Load a `{"key": weight, ...}` JSON object.
    pub fn from_json(json: &str) -> MtxGenResult<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| MtxGenError::Config(format!("weight table JSON parse error: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    pub fn set(&mut self, key: impl Into<String>, weight: f64) -> MtxGenResult<()> {
        let key = key.into();
        if !weight.is_finite() || weight < 0.0 {
            return Err(MtxGenError::Config(format!(
                "weight for '{key}' must be finite and >= 0, got {weight}"
            )));
        }
        self.weights.insert(key, weight);
        Ok(())
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &w)| (k.as_str(), w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
