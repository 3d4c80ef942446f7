// ─────────────────────────────────────────────────────────────────────
// MtxGen — Sparse Matrix Generator Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Matrix, descriptor, weight-table and configuration types shared by
//! the descriptor engine, the expansion engines and the I/O layer.

pub mod config;
pub mod descriptors;
pub mod error;
pub mod matrix;
pub mod params;
pub mod weights;

pub use config::{
    GeneratorConfig, LENIENT_SYMMETRY_TOLERANCE, MAX_JITTER_RADIUS, STRICT_SYMMETRY_TOLERANCE,
};
pub use descriptors::{
    AveragedDescriptors, AxisStatistics, DescriptorSet, DescriptorSource, Summary,
};
pub use error::{MtxGenError, MtxGenResult};
pub use matrix::Matrix;
pub use params::ExpansionParams;
pub use weights::WeightTable;
