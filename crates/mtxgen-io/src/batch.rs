// ─────────────────────────────────────────────────────────────────────
// MtxGen — Batch Driver
// ─────────────────────────────────────────────────────────────────────
//! Generate N expanded matrices from one source file.
//!
//! The source is loaded and validated before the output directory is
//! touched, so a load failure leaves no partial output. Matrix `i` is
//! written to `expanded_matrix_{i + 1}.mtx`. With a configured seed,
//! matrix `i` draws from `StdRng::seed_from_u64(seed + i)`, making the
//! output independent of the worker count.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use mtxgen_core::ExpansionEngine;
use mtxgen_types::{ExpansionParams, GeneratorConfig, Matrix, MtxGenError, MtxGenResult};

use crate::market::{read_matrix, write_matrix, Metadata};

/// One batch generation job.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub params: ExpansionParams,
    pub count: usize,
}

/// File name of the `index`-th (0-based) generated matrix.
pub fn output_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("expanded_matrix_{}.mtx", index + 1))
}

fn rng_for(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

fn generate_one(
    engine: &ExpansionEngine,
    source: &Matrix,
    metadata: &Metadata,
    request: &BatchRequest,
    seed: Option<u64>,
    index: usize,
) -> MtxGenResult<PathBuf> {
    let mut rng = rng_for(seed, index);
    let expanded = engine.expand_with(source, &request.params, &mut rng)?;
    let path = output_path(&request.output_dir, index);
    write_matrix(&path, &expanded, Some(metadata))?;
    log::info!(
        "generated {}/{}: {}",
        index + 1,
        request.count,
        path.display()
    );
    Ok(path)
}

/// Run `request`, returning the written paths in index order.
pub fn run_batch(request: &BatchRequest, config: &GeneratorConfig) -> MtxGenResult<Vec<PathBuf>> {
    config.validate()?;
    request.params.validate()?;

    let source = read_matrix(&request.source)?.matrix;
    if source.rows() == 0 || source.cols() == 0 {
        return Err(MtxGenError::EmptySource {
            rows: source.rows(),
            cols: source.cols(),
        });
    }

    std::fs::create_dir_all(&request.output_dir)?;

    let mut metadata = Metadata::new();
    metadata.insert("name", "Generated Matrix");
    metadata.insert("kind", "synthetic expansion");
    metadata.insert(
        "source",
        request.source.file_name().map_or_else(
            || request.source.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        ),
    );

    let engine = ExpansionEngine::new(config);
    let workers = config.workers.min(request.count.max(1));
    log::info!(
        "batch: {} matrices of {}x{} (density {}) from {} on {workers} worker(s)",
        request.count,
        request.params.target_rows,
        request.params.target_cols,
        request.params.additional_density,
        request.source.display()
    );

    if workers <= 1 {
        return (0..request.count)
            .map(|i| generate_one(&engine, &source, &metadata, request, config.seed, i))
            .collect();
    }

    let next = AtomicUsize::new(0);
    let results: Mutex<Vec<(usize, MtxGenResult<PathBuf>)>> =
        Mutex::new(Vec::with_capacity(request.count));
    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let i = next.fetch_add(1, Ordering::Relaxed);
                if i >= request.count {
                    break;
                }
                let result = generate_one(&engine, &source, &metadata, request, config.seed, i);
                let failed = result.is_err();
                results.lock().push((i, result));
                if failed {
                    // Stop handing out further indices.
                    next.store(request.count, Ordering::Relaxed);
                    break;
                }
            });
        }
    });

    let mut results = results.into_inner();
    results.sort_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, r)| r).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_is_one_based() {
        let p = output_path(Path::new("/tmp/out"), 0);
        assert_eq!(p, PathBuf::from("/tmp/out/expanded_matrix_1.mtx"));
        assert!(output_path(Path::new("o"), 9).ends_with("expanded_matrix_10.mtx"));
    }

    #[test]
    fn test_seeded_rng_depends_on_index_only() {
        use rand::Rng;
        let a: u64 = rng_for(Some(10), 2).gen();
        let b: u64 = rng_for(Some(11), 1).gen();
        let c: u64 = rng_for(Some(10), 3).gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_missing_source_reports_error() {
        let request = BatchRequest {
            source: PathBuf::from("/nonexistent/definitely_missing.mtx"),
            output_dir: std::env::temp_dir().join("mtxgen_never_created"),
            params: ExpansionParams::new(4, 4, 1),
            count: 2,
        };
        let err = run_batch(&request, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, MtxGenError::Io(_)));
        assert!(!request.output_dir.exists());
    }
}
