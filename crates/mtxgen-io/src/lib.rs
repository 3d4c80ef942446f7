// ─────────────────────────────────────────────────────────────────────
// MtxGen — Sparse Matrix Generator I/O
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Matrix Market reader/writer, descriptor reports and the batch
//! generation driver.
//!
//! Load failures abort before anything is written: the batch driver
//! reads and validates its source before creating the output
//! directory.

pub mod batch;
pub mod market;
pub mod report;

pub use batch::{output_path, run_batch, BatchRequest};
pub use market::{
    read_matrix, to_market_string, write_matrix, Field, MarketFile, MarketHeader, MarketParser,
    Metadata, StorageFormat, Symmetry,
};
pub use report::{format_value, label, render_descriptors, render_metadata};
