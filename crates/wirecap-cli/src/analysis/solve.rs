//! Single charge solve.

use anyhow::{Context, Result, bail};
use wirecap_core::Structure;
use wirecap_solver::{SolverConfig, assemble, ideal_wire_over_ground_charge};

use super::conductor_voltages;
use crate::output::{print_conductor_charges, print_matrix};

/// Run one charge solve and print the per-conductor charges.
pub fn run_solve(
    structure: &Structure,
    config: &SolverConfig,
    voltages: Option<Vec<f64>>,
    print_y: bool,
    compare_ideal: bool,
) -> Result<()> {
    let volts = conductor_voltages(structure, voltages)?;

    println!("Charge Solution");
    println!("===============");
    println!();

    let system = assemble(structure, config).context("failed to assemble coefficient matrix")?;
    let charges = system.conductor_charge(&volts)?;

    println!(
        "{} conductors, {} segments, {}",
        system.num_conductors(),
        system.num_segments(),
        config.describe()
    );
    println!();

    if print_y {
        let labels: Vec<String> = system
            .index()
            .iter()
            .map(|seg| format!("{}.{}", structure.label(seg.conductor), seg.local))
            .collect();
        print_matrix("Coefficient Matrix Y", &labels, system.y(), "V·m/C");
    }

    print_conductor_charges(structure, &volts, &charges);

    if compare_ideal {
        let Some(plane) = config.ground else {
            bail!("--compare-ideal needs a ground plane");
        };
        if volts[0] == 0.0 {
            bail!("--compare-ideal needs a non-zero voltage on the first conductor");
        }
        let wire = &structure.conductors()[0];
        let height = plane.signed_distance(&wire.center());
        let ideal = ideal_wire_over_ground_charge(height, wire.radius(), &config.constants)?
            * volts[0];
        let error = (charges[0] - ideal).abs() / ideal.abs();

        if structure.num_conductors() > 1 {
            log::warn!("Analytic reference ignores all but the first conductor");
        }
        println!("Analytic Reference ({}):", structure.label(0));
        println!("  Q(ideal)    = {:.6e} C/m", ideal);
        println!("  Q(computed) = {:.6e} C/m", charges[0]);
        println!("  Rel. error  = {:.3e}", error);
        println!();
    }

    println!("Analysis complete.");
    Ok(())
}
