//! End-to-end tests: read a seed file, generate, read the output back.

use std::fs;

use mtxgen_core::{compute_descriptors, DescriptorEngine, SimilarityScorer};
use mtxgen_io::{output_path, read_matrix, run_batch, write_matrix, BatchRequest, Metadata};
use mtxgen_types::{
    DescriptorSet, ExpansionParams, GeneratorConfig, Matrix, MtxGenError,
    WeightTable, LENIENT_SYMMETRY_TOLERANCE,
};
use tempfile::TempDir;

const SEED_MATRIX: &str = "%%MatrixMarket matrix coordinate real general
% name: tridiag5
% author: test suite
5 5 13
1 1 4.0
1 2 -1.0
2 1 -1.0
2 2 4.0
2 3 -1.0
3 2 -1.0
3 3 4.0
3 4 -1.0
4 3 -1.0
4 4 4.0
4 5 -1.0
5 4 -1.0
5 5 4.0
";

fn write_seed(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("tridiag5.mtx");
    fs::write(&path, SEED_MATRIX).unwrap();
    path
}

fn request(dir: &TempDir, count: usize) -> BatchRequest {
    BatchRequest {
        source: write_seed(dir),
        output_dir: dir.path().join("out"),
        params: ExpansionParams::new(20, 20, 2),
        count,
    }
}

#[test]
fn test_seed_file_descriptors() {
    let dir = TempDir::new().unwrap();
    let file = read_matrix(write_seed(&dir)).unwrap();
    assert_eq!(file.header.metadata.name(), "tridiag5");
    assert_eq!(file.header.metadata.id(), "-");

    let d = compute_descriptors(&file.matrix);
    assert_eq!(d.num_nonzeros, 13);
    assert!(d.pattern_symmetry);
    assert!(d.numerical_symmetry);
    assert_eq!(d.bandwidth, 1);
    assert_eq!(d.num_diagonals_with_nonzeros, 2);
    assert!((d.norm_1.unwrap() - 6.0).abs() < 1e-12);
    assert!(d.estimated_condition_number.unwrap() >= 1.0);
}

#[test]
fn test_batch_writes_numbered_files() {
    let dir = TempDir::new().unwrap();
    let req = request(&dir, 3);
    let config = GeneratorConfig {
        seed: Some(11),
        ..Default::default()
    };
    let written = run_batch(&req, &config).unwrap();
    assert_eq!(written.len(), 3);
    for (i, path) in written.iter().enumerate() {
        assert_eq!(path, &output_path(&req.output_dir, i));
        let file = read_matrix(path).unwrap();
        assert_eq!(file.matrix.shape(), (20, 20));
        assert!(file.matrix.nnz() >= 5);
        assert_eq!(file.header.metadata.name(), "Generated Matrix");
    }
}

#[test]
fn test_batch_seeded_output_independent_of_workers() {
    let sequential_dir = TempDir::new().unwrap();
    let parallel_dir = TempDir::new().unwrap();
    let seq = run_batch(
        &request(&sequential_dir, 4),
        &GeneratorConfig {
            seed: Some(99),
            workers: 1,
            ..Default::default()
        },
    )
    .unwrap();
    let par = run_batch(
        &request(&parallel_dir, 4),
        &GeneratorConfig {
            seed: Some(99),
            workers: 3,
            ..Default::default()
        },
    )
    .unwrap();
    for (a, b) in seq.iter().zip(&par) {
        assert_eq!(fs::read_to_string(a).unwrap(), fs::read_to_string(b).unwrap());
    }
}

#[test]
fn test_batch_malformed_source_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("broken.mtx");
    fs::write(&source, "%%MatrixMarket matrix coordinate real general\n2 2 1\n1 x 3.0\n").unwrap();
    let req = BatchRequest {
        source,
        output_dir: dir.path().join("out"),
        params: ExpansionParams::new(4, 4, 1),
        count: 2,
    };
    let err = run_batch(&req, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, MtxGenError::Parse { line: Some(3), .. }));
    assert!(!req.output_dir.exists());
}

#[test]
fn test_batch_zero_target_rejected() {
    let dir = TempDir::new().unwrap();
    let mut req = request(&dir, 1);
    req.params = ExpansionParams::new(0, 10, 1);
    assert!(matches!(
        run_batch(&req, &GeneratorConfig::default()),
        Err(MtxGenError::Shape(_))
    ));
    assert!(!req.output_dir.exists());
}

#[test]
fn test_expanded_matrices_score_against_average() {
    let dir = TempDir::new().unwrap();
    let req = request(&dir, 2);
    let config = GeneratorConfig {
        seed: Some(5),
        ..Default::default()
    };
    let written = run_batch(&req, &config).unwrap();
    let engine = DescriptorEngine::with_tolerance(LENIENT_SYMMETRY_TOLERANCE);
    let sets: Vec<DescriptorSet> = written
        .iter()
        .map(|p| engine.compute(&read_matrix(p).unwrap().matrix))
        .collect();
    let average = DescriptorSet::average(&sets).unwrap();
    // Keys that stay defined for any non-empty matrix.
    let weights = WeightTable::from_pairs([
        ("num_nonzeros", 0.01),
        ("density_percent", 1.0),
        ("bandwidth", 0.001),
        ("frobenius_norm", 0.01),
    ])
    .unwrap();
    let scorer = SimilarityScorer::new(weights);
    assert_eq!(scorer.loss(&average, &average).unwrap(), 0.0);
    let loss = scorer.loss(&sets[0], &average).unwrap();
    assert!(loss.is_finite() && loss >= 0.0);
}

#[test]
fn test_write_then_read_keeps_metadata() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.mtx");
    let m = Matrix::from_triplets(3, 2, &[(2, 1, 0.125)]).unwrap();
    let mut meta = Metadata::new();
    meta.insert("name", "tiny");
    meta.insert("ed", "2");
    write_matrix(&path, &m, Some(&meta)).unwrap();
    let file = read_matrix(&path).unwrap();
    assert_eq!(file.matrix, m);
    assert_eq!(file.header.metadata.ed(), "2");
    assert_eq!(file.header.metadata.kind(), "-");
}
