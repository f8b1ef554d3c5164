//! Potential map sampling.

use std::path::Path;

use anyhow::{Context, Result};
use wirecap_core::Structure;
use wirecap_solver::{MapWindow, PotentialMap, SolverConfig, assemble, kernel_for};

use super::conductor_voltages;

/// Solve once, sample the potential around the structure and write it as CSV.
pub fn run_field(
    structure: &Structure,
    config: &SolverConfig,
    voltages: Option<Vec<f64>>,
    output: &Path,
    resolution: usize,
) -> Result<()> {
    let volts = conductor_voltages(structure, voltages)?;
    let system = assemble(structure, config).context("failed to assemble coefficient matrix")?;
    let charge = system.solve_charge(&volts)?;

    let kernel = kernel_for(config);
    let window = MapWindow::around(structure);
    let map = PotentialMap::sample(
        &charge,
        system.index(),
        kernel.as_ref(),
        &window,
        resolution,
        config.parallel,
    )?;

    std::fs::write(output, map.to_csv())
        .with_context(|| format!("failed to write {}", output.display()))?;

    let (min, max) = map.range();
    println!(
        "Wrote {}x{} potential map to {}",
        resolution,
        resolution,
        output.display()
    );
    println!(
        "  x: [{:.4e}, {:.4e}] m, y: [{:.4e}, {:.4e}] m",
        window.x_min, window.x_max, window.y_min, window.y_max
    );
    println!("  potential: [{:.4}, {:.4}] V", min, max);
    Ok(())
}
