//! NeuroSim command line front end.
//!
//! Every command prints a JSON document on stdout; logs go to stderr.
//!
//! # Commands
//!
//! - `neurosim-cli segment <CASE_DIR>` - Labelled brain mesh for a case
//! - `neurosim-cli simulate <CASE_DIR>` - Deformation after removing a region
//! - `neurosim-cli export-regions <CASE_DIR> <OUT_DIR>` - One STL per region
//! - `neurosim-cli artifacts <DIR>` - List exported STL files
//!
//! Pipeline parameters load from `--config <FILE>` (JSON, any subset of
//! fields); `--preview` then swaps in a coarser surface grid and a smaller
//! vertex budget. Log level follows `RUST_LOG`, default `info`; `--verbose`
//! raises it to `debug`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use neurosim::{
    list_artifacts, segment_case, simulate_case, ExportRequest, JobRegistry, JobStatus,
    PipelineParams, SegmentationOutput, SimulationOutput,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// NeuroSim surgical planning pipeline
#[derive(Parser)]
#[command(name = "neurosim-cli")]
#[command(about = "Brain surface reconstruction and resection simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with pipeline parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Coarser surface grid and smaller vertex budget
    #[arg(long, global = true)]
    preview: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a labelled mesh, falling back to the phantom
    Segment {
        /// Directory holding a NIfTI volume, DICOM slices or an image
        #[arg(name = "CASE_DIR")]
        case_dir: PathBuf,

        /// Override the vertex budget
        #[arg(long)]
        target_vertices: Option<usize>,

        /// Seed for the phantom's noise
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Simulate brain shift after removing a tissue region
    Simulate {
        /// Directory holding a NIfTI volume, DICOM slices or an image
        #[arg(name = "CASE_DIR")]
        case_dir: PathBuf,

        /// Tissue class to remove
        #[arg(long, default_value = "tumor")]
        remove_region: String,

        /// Craniotomy opening size
        #[arg(long, default_value_t = 5.0)]
        opening_size: f64,

        /// Seed for the phantom's noise
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write one STL surface per labelled region
    ExportRegions {
        /// Directory holding a NIfTI volume, DICOM slices or an image
        #[arg(name = "CASE_DIR")]
        case_dir: PathBuf,

        /// Directory receiving the STL files
        #[arg(name = "OUT_DIR")]
        out_dir: PathBuf,
    },

    /// List exported STL files
    Artifacts {
        /// Directory to list
        #[arg(name = "DIR")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut params = load_params(cli.config.as_deref())?;
    if cli.preview {
        params = params.with_preview_resolution();
    }

    match cli.command {
        Commands::Segment {
            case_dir,
            target_vertices,
            seed,
        } => {
            if let Some(count) = target_vertices {
                params = params.with_target_vertices(count);
            }
            if let Some(seed) = seed {
                params = params.with_phantom_seed(seed);
            }
            let reconstruction = segment_case(&case_dir, &params);
            info!(
                source = reconstruction.source.kind(),
                counts = ?reconstruction.class_counts(),
                "Segmentation done"
            );
            emit(&SegmentationOutput::from(&reconstruction), cli.pretty)
        }
        Commands::Simulate {
            case_dir,
            remove_region,
            opening_size,
            seed,
        } => {
            if let Some(seed) = seed {
                params = params.with_phantom_seed(seed);
            }
            let result = simulate_case(&case_dir, &remove_region, opening_size, &params)?;
            info!(metrics = %result.metrics, "Simulation done");
            emit(&SimulationOutput::from(&result), cli.pretty)
        }
        Commands::ExportRegions { case_dir, out_dir } => {
            let status = export_regions(case_dir, out_dir, params)?;
            emit(&status, cli.pretty)
        }
        Commands::Artifacts { dir } => emit(&list_artifacts(&dir)?, cli.pretty),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_params(path: Option<&Path>) -> Result<PipelineParams> {
    let Some(path) = path else {
        return Ok(PipelineParams::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let params = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    debug!(config = %path.display(), "Loaded pipeline parameters");
    Ok(params)
}

fn export_regions(case_dir: PathBuf, out_dir: PathBuf, params: PipelineParams) -> Result<JobStatus> {
    let case_id = case_dir
        .file_name()
        .map_or_else(|| "case".to_string(), |name| name.to_string_lossy().into_owned());

    let registry = JobRegistry::new();
    registry.spawn_region_export(
        ExportRequest {
            case_id: case_id.clone(),
            case_dir,
            out_dir,
        },
        params,
    );

    match registry.wait(&case_id) {
        Some(JobStatus::Failed { reason }) => bail!("region export failed: {reason}"),
        Some(status) => Ok(status),
        None => bail!("region export for {case_id} was never started"),
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}
