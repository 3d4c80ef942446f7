// ─────────────────────────────────────────────────────────────────────
// MtxGen — Command-Line Front End
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! mtxgen CLI: inspect, expand, perturb, blend and compare sparse matrices.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use mtxgen_core::{blend_with, perturb_with, total_loss, DescriptorEngine, SimilarityScorer};
use mtxgen_io::{
    read_matrix, render_descriptors, render_metadata, run_batch, write_matrix, BatchRequest,
    Metadata,
};
use mtxgen_types::{
    DescriptorSet, DescriptorSource, ExpansionParams, GeneratorConfig, MtxGenError, MtxGenResult,
    WeightTable, LENIENT_SYMMETRY_TOLERANCE,
};

#[derive(Parser)]
#[command(name = "mtxgen")]
#[command(about = "Inspect sparse matrices and generate structurally similar ones")]
#[command(version)]
struct Cli {
    /// Generator configuration file (JSON); flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the descriptors of one or more Matrix Market files
    Inspect {
        /// Matrix Market files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of a text report
        #[arg(long)]
        json: bool,

        /// Use the 1e-8 symmetry tolerance
        #[arg(long)]
        lenient: bool,
    },

    /// Write expanded copies of a source matrix into a directory
    Expand {
        /// Source Matrix Market file
        source: PathBuf,

        /// Output directory (created if absent)
        output_dir: PathBuf,

        /// Target row count
        #[arg(long)]
        rows: usize,

        /// Target column count
        #[arg(long)]
        cols: usize,

        /// Extra insertion attempts per source nonzero
        #[arg(short, long, default_value = "1")]
        density: usize,

        /// Number of matrices to generate
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Base seed; matrix i uses seed + i
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Randomize every non-anchor nonzero value per row
    Perturb {
        /// Source Matrix Market file
        source: PathBuf,

        /// Output file
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Blend several seed matrices into one of the given shape
    Blend {
        /// Seed Matrix Market files
        #[arg(required = true)]
        seeds: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Target row count
        #[arg(long)]
        rows: usize,

        /// Target column count
        #[arg(long)]
        cols: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Weighted descriptor loss between two matrices
    Compare {
        /// Reference matrix
        original: PathBuf,

        /// Candidate matrix
        candidate: PathBuf,

        /// Weight table (JSON object key -> weight); defaults to the reference table
        #[arg(long)]
        weights: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Inspect {
            files,
            json,
            lenient,
        } => cmd_inspect(&files, json, lenient, &config),
        Commands::Expand {
            source,
            output_dir,
            rows,
            cols,
            density,
            count,
            seed,
            workers,
        } => {
            let config = GeneratorConfig {
                seed: seed.or(config.seed),
                workers: workers.unwrap_or(config.workers),
                ..config
            };
            let request = BatchRequest {
                source,
                output_dir,
                params: ExpansionParams::new(rows, cols, density),
                count,
            };
            cmd_expand(&request, &config)
        }
        Commands::Perturb {
            source,
            output,
            seed,
        } => cmd_perturb(&source, &output, seed.or(config.seed)),
        Commands::Blend {
            seeds,
            output,
            rows,
            cols,
            seed,
        } => cmd_blend(&seeds, &output, rows, cols, seed.or(config.seed)),
        Commands::Compare {
            original,
            candidate,
            weights,
        } => cmd_compare(&original, &candidate, weights.as_deref(), &config),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> MtxGenResult<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::from_json(&std::fs::read_to_string(path)?),
        None => Ok(GeneratorConfig::default()),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn to_json_map<D: DescriptorSource + ?Sized>(d: &D) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = d
        .entries()
        .into_iter()
        .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
        .collect();
    serde_json::Value::Object(map)
}

fn cmd_inspect(
    files: &[PathBuf],
    json: bool,
    lenient: bool,
    config: &GeneratorConfig,
) -> MtxGenResult<()> {
    let engine = if lenient {
        DescriptorEngine::with_tolerance(LENIENT_SYMMETRY_TOLERANCE)
    } else {
        DescriptorEngine::new(config)
    };

    log::info!(
        "inspect: {} file(s), symmetry tolerance {:e}",
        files.len(),
        engine.symmetry_tolerance()
    );
    let mut loaded = Vec::with_capacity(files.len());
    for path in files {
        let file = read_matrix(path)?;
        let descriptors = engine.compute(&file.matrix);
        loaded.push((path, file.header.metadata, descriptors));
    }
    let sets: Vec<DescriptorSet> = loaded.iter().map(|(_, _, d)| d.clone()).collect();
    let average = if sets.len() > 1 {
        Some(DescriptorSet::average(&sets)?)
    } else {
        None
    };

    if json {
        let matrices: Vec<serde_json::Value> = loaded
            .iter()
            .map(|(path, meta, d)| {
                let meta: serde_json::Map<String, serde_json::Value> = meta
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::json!(v)))
                    .collect();
                serde_json::json!({
                    "file": path.display().to_string(),
                    "metadata": meta,
                    "descriptors": to_json_map(d),
                })
            })
            .collect();
        let mut doc = serde_json::json!({ "matrices": matrices });
        if let Some(avg) = &average {
            doc["average"] = to_json_map(avg);
        }
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| MtxGenError::Config(format!("JSON encode error: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    for (path, meta, d) in &loaded {
        println!("== {} ==", path.display());
        print!("{}", render_metadata(meta));
        println!();
        print!("{}", render_descriptors(d));
        println!();
    }
    if let Some(avg) = &average {
        println!("== Average over {} matrices ==", avg.sample_count);
        print!("{}", render_descriptors(avg));
    }
    Ok(())
}

fn cmd_expand(request: &BatchRequest, config: &GeneratorConfig) -> MtxGenResult<()> {
    let written = run_batch(request, config)?;
    log::info!(
        "expand: {} matrices written to {}",
        written.len(),
        request.output_dir.display()
    );
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_perturb(source: &Path, output: &Path, seed: Option<u64>) -> MtxGenResult<()> {
    let file = read_matrix(source)?;
    let perturbed = perturb_with(&file.matrix, &mut seeded_rng(seed));
    log::info!(
        "perturb: {} ({} nonzeros), seed {seed:?}",
        source.display(),
        file.matrix.nnz()
    );
    let mut meta = file.header.metadata;
    meta.insert("kind", "perturbed");
    write_matrix(output, &perturbed, Some(&meta))?;
    println!("{}", output.display());
    Ok(())
}

fn cmd_blend(
    seeds: &[PathBuf],
    output: &Path,
    rows: usize,
    cols: usize,
    seed: Option<u64>,
) -> MtxGenResult<()> {
    let matrices = seeds
        .iter()
        .map(|p| read_matrix(p).map(|f| f.matrix))
        .collect::<MtxGenResult<Vec<_>>>()?;
    let blended = blend_with(&matrices, rows, cols, &mut seeded_rng(seed))?;
    log::info!(
        "blend: {} seeds -> {rows}x{cols}, {} nonzeros",
        matrices.len(),
        blended.nnz()
    );
    let mut meta = Metadata::new();
    meta.insert("name", "Generated Matrix");
    meta.insert("kind", "blend");
    write_matrix(output, &blended, Some(&meta))?;
    println!("{}", output.display());
    Ok(())
}

fn cmd_compare(
    original: &Path,
    candidate: &Path,
    weights: Option<&Path>,
    config: &GeneratorConfig,
) -> MtxGenResult<()> {
    let weights = match weights {
        Some(path) => WeightTable::from_json(&std::fs::read_to_string(path)?)?,
        None => WeightTable::default(),
    };
    let engine = DescriptorEngine::new(config);
    let a = engine.compute(&read_matrix(original)?.matrix);
    let b = engine.compute(&read_matrix(candidate)?.matrix);

    let scorer = SimilarityScorer::new(weights);
    let mut terms = scorer.breakdown(&a, &b)?;
    let loss = total_loss(&terms)?;
    log::info!(
        "compare: {} vs {} over {} weighted keys",
        original.display(),
        candidate.display(),
        terms.len()
    );
    terms.sort_by(|x, y| y.contribution.total_cmp(&x.contribution));

    println!("Loss: {loss:.6}");
    println!();
    println!("Top contributions:");
    for term in terms.iter().filter(|t| t.contribution > 0.0).take(10) {
        println!(
            "  {:<40} {:>12.6}  (w={}, |diff|={:.4})",
            term.key, term.contribution, term.weight, term.difference
        );
    }
    Ok(())
}
