// ─────────────────────────────────────────────────────────────────────
// MtxGen — Sparse Matrix Generator Core Engines
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Descriptor extraction, similarity scoring, pattern-preserving
//! expansion and value perturbation for sparse matrices.
//!
//! # Invariants
//!
//! 1. **Inputs are never mutated**: every engine takes `&Matrix` and
//!    returns a fresh value.
//!
//! 2. **Expansion preserves the requested shape**: a successful
//!    expansion to `R × C` always yields exactly `R × C`, whatever the
//!    density factor.
//!
//! 3. **Perturbation keeps the sparsity pattern**: only values change,
//!    and one anchor nonzero per row keeps its original value.
//!
//! 4. **Identical descriptors score 0**: the similarity loss is a
//!    weighted L1 distance and is never negative.
//!
//! Randomised operations come in two flavours: a plain one drawing from
//! `rand::thread_rng()` and a `*_with` one taking any `Rng`, so that
//! seeded `StdRng` runs are reproducible.

pub mod blend;
pub mod condition;
pub mod descriptors;
pub mod expansion;
pub mod perturbation;
pub mod scorer;
pub mod stats;

pub use blend::{blend, blend_with, scale};
pub use condition::{estimate_condition_1, matrix_norm_1};
pub use descriptors::{compute_descriptors, DescriptorEngine};
pub use expansion::{expand, ExpansionEngine};
pub use perturbation::{perturb, perturb_with};
pub use scorer::{total_loss, LossTerm, SimilarityScorer};
