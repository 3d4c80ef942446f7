// ─────────────────────────────────────────────────────────────────────
// MtxGen — Generator Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{MtxGenError, MtxGenResult};

/// Absolute tolerance for numerical symmetry (canonical).
pub const STRICT_SYMMETRY_TOLERANCE: f64 = 1e-14;

/// Lighter-weight tolerance used by quick inspection passes.
pub const LENIENT_SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Largest accepted jitter radius.
pub const MAX_JITTER_RADIUS: usize = i32::MAX as usize;

/// Runtime configuration for descriptor extraction and generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Absolute tolerance when comparing an entry to its mirror.
    /// Default: 1e-14.
    pub symmetry_tolerance: f64,

    /// Jitter offsets per axis are drawn from `-radius..=radius`.
    /// Default: 3.
    pub jitter_radius: usize,

    /// Base seed for batch runs; matrix `i` uses `seed + i`.
    /// Default: None (process-wide generator).
    pub seed: Option<u64>,

    /// Worker threads for batch expansion.
    /// Default: 1 (sequential).
    pub workers: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            symmetry_tolerance: STRICT_SYMMETRY_TOLERANCE,
            jitter_radius: 3,
            seed: None,
            workers: 1,
        }
    }
}

impl GeneratorConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> MtxGenResult<()> {
        if !self.symmetry_tolerance.is_finite() || self.symmetry_tolerance < 0.0 {
            return Err(MtxGenError::Config(format!(
                "symmetry_tolerance must be finite and >= 0, got {}",
                self.symmetry_tolerance
            )));
        }
        if self.jitter_radius > MAX_JITTER_RADIUS {
            return Err(MtxGenError::Config(format!(
                "jitter_radius must be <= {MAX_JITTER_RADIUS}, got {}",
                self.jitter_radius
            )));
        }
        if self.workers < 1 {
            return Err(MtxGenError::Config(format!(
                "workers must be >= 1, got {}",
                self.workers
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> MtxGenResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MtxGenError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
