//! Capacitance and inductance matrix extraction.

use anyhow::{Context, Result};
use wirecap_core::Structure;
use wirecap_solver::{SolverConfig, assemble};

use crate::output::{MatricesReport, print_matrix};

/// Extract C and L and print them as tables or JSON.
pub fn run_matrices(structure: &Structure, config: &SolverConfig, json: bool) -> Result<()> {
    let system = assemble(structure, config).context("failed to assemble coefficient matrix")?;
    let c = system.capacitance().context("capacitance extraction failed")?;
    let l = system.inductance().context("inductance extraction failed")?;

    if json {
        let report = MatricesReport::new(structure, system.num_segments(), config, &c, &l);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Per-Unit-Length Matrices");
    println!("========================");
    println!();

    let labels: Vec<String> = (0..structure.num_conductors())
        .map(|i| structure.label(i))
        .collect();
    print_matrix("Capacitance Matrix C", &labels, &c, "F/m");
    print_matrix("Inductance Matrix L", &labels, &l, "H/m");

    println!("Analysis complete.");
    Ok(())
}
