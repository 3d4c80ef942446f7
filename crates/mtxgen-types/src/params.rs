// ─────────────────────────────────────────────────────────────────────
// MtxGen — Expansion Parameters
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{MtxGenError, MtxGenResult};

/// Target shape and density factor for one expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionParams {
    pub target_rows: usize,
    pub target_cols: usize,
    /// Extra nonzero insertion attempts per source nonzero, not a
    /// density percentage.
    pub additional_density: usize,
}

impl ExpansionParams {
    pub fn new(target_rows: usize, target_cols: usize, additional_density: usize) -> Self {
        Self {
            target_rows,
            target_cols,
            additional_density,
        }
    }

    /// Target dimensions must both be >= 1.
    pub fn validate(&self) -> MtxGenResult<()> {
        if self.target_rows == 0 || self.target_cols == 0 {
            return Err(MtxGenError::Shape(format!(
                "target shape must be at least 1x1, got {}x{}",
                self.target_rows, self.target_cols
            )));
        }
        Ok(())
    }
}
