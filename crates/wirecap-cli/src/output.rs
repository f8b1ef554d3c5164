//! Output formatting for charges and matrices.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use wirecap_core::Structure;
use wirecap_solver::SolverConfig;

/// Print a labelled square matrix in tabular form.
pub fn print_matrix(title: &str, labels: &[String], m: &DMatrix<f64>, unit: &str) {
    println!("{} [{}]:", title, unit);

    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0).max(4);
    print!("  {:width$}", "", width = width);
    for label in labels {
        print!(" {:>13}", label);
    }
    println!();

    for (row, label) in labels.iter().enumerate() {
        print!("  {:width$}", label, width = width);
        for col in 0..m.ncols() {
            print!(" {:>13.5e}", m[(row, col)]);
        }
        println!();
    }
    println!();
}

/// Print the applied voltage and total charge of every conductor.
pub fn print_conductor_charges(structure: &Structure, volts: &[f64], charges: &DVector<f64>) {
    println!("Conductor Charges:");
    for (i, (v, q)) in volts.iter().zip(charges.iter()).enumerate() {
        println!("  Q({}) = {:.6e} C/m  at V = {:.6} V", structure.label(i), q, v);
    }
    println!();
}

/// JSON form of `wirecap matrices --json`.
#[derive(Debug, Serialize)]
pub struct MatricesReport {
    pub conductors: Vec<String>,
    pub segments: usize,
    /// Ground plane height (m), absent in free space.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_y: Option<f64>,
    /// F/m, row-major.
    pub capacitance: Vec<Vec<f64>>,
    /// H/m, row-major.
    pub inductance: Vec<Vec<f64>>,
}

impl MatricesReport {
    pub fn new(
        structure: &Structure,
        segments: usize,
        config: &SolverConfig,
        c: &DMatrix<f64>,
        l: &DMatrix<f64>,
    ) -> Self {
        Self {
            conductors: (0..structure.num_conductors())
                .map(|i| structure.label(i))
                .collect(),
            segments,
            ground_y: config.ground.map(|plane| plane.origin().y),
            capacitance: rows(c),
            inductance: rows(l),
        }
    }
}

fn rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}
