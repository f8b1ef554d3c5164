//! wirecap CLI.
//!
//! Reads a JSON structure file of round conductors and reports charges,
//! capacitance/inductance matrices or a sampled potential map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use wirecap_core::{GroundPlane, MeshConfig, Structure, StructureError, StructureFile};
use wirecap_solver::SolverConfig;

mod analysis;
mod output;

#[derive(Parser)]
#[command(name = "wirecap")]
#[command(about = "Per-unit-length capacitance and inductance of round conductors above ground")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalOpts {
    /// Solve in free space (no ground plane)
    #[arg(long, global = true)]
    free_space: bool,

    /// Height of the horizontal ground plane (m)
    #[arg(long, global = true, value_name = "METERS", allow_hyphen_values = true)]
    ground_y: Option<f64>,

    /// Override mesh.min-div from the structure file
    #[arg(long, global = true, value_name = "N")]
    min_div: Option<usize>,

    /// Run assembly and extraction on a single thread
    #[arg(long, global = true)]
    serial: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for conductor charges under one set of voltages
    Solve {
        /// Path to the structure file
        file: PathBuf,

        /// Conductor voltages, comma separated (default: 1 V on the first conductor)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        voltages: Option<Vec<f64>>,

        /// Print the segment coefficient matrix
        #[arg(long)]
        print_y: bool,

        /// Compare the first conductor with the analytic wire-over-ground charge
        #[arg(long)]
        compare_ideal: bool,
    },

    /// Extract capacitance and inductance matrices
    Matrices {
        /// Path to the structure file
        file: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sample the potential around the conductors and write it as CSV
    Field {
        /// Path to the structure file
        file: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Conductor voltages, comma separated (default: 1 V on the first conductor)
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        voltages: Option<Vec<f64>>,

        /// Grid points per axis
        #[arg(long, default_value_t = 101)]
        resolution: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = solver_config(&cli.global);
    log::debug!("Solver configuration: {}", config.describe());

    match cli.command {
        Commands::Solve {
            file,
            voltages,
            print_y,
            compare_ideal,
        } => {
            let structure = load_structure(&file, cli.global.min_div)?;
            analysis::run_solve(&structure, &config, voltages, print_y, compare_ideal)
        }
        Commands::Matrices { file, json } => {
            let structure = load_structure(&file, cli.global.min_div)?;
            analysis::run_matrices(&structure, &config, json)
        }
        Commands::Field {
            file,
            output,
            voltages,
            resolution,
        } => {
            let structure = load_structure(&file, cli.global.min_div)?;
            analysis::run_field(&structure, &config, voltages, &output, resolution)
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn solver_config(global: &GlobalOpts) -> SolverConfig {
    let ground = if global.free_space {
        None
    } else {
        Some(GroundPlane::horizontal(global.ground_y.unwrap_or(0.0)))
    };
    SolverConfig::default()
        .with_ground(ground)
        .with_parallel(!global.serial)
}

/// Read a structure file, applying a `--min-div` override before validation.
fn load_structure(path: &Path, min_div: Option<usize>) -> Result<Structure> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read structure file {}", path.display()))?;
    let mut file: StructureFile = serde_json::from_str(&text)
        .map_err(StructureError::from)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    if let Some(n) = min_div {
        file.mesh = MeshConfig::new(n);
    }

    let structure = Structure::from_file(file)
        .with_context(|| format!("invalid structure in {}", path.display()))?;
    log::info!(
        "Loaded {} conductors ({} segments) from {}",
        structure.num_conductors(),
        structure.num_segments(),
        path.display()
    );
    Ok(structure)
}
