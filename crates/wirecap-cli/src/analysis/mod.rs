//! Command runners for charge solves, matrix extraction and field maps.

pub mod field;
pub mod matrices;
pub mod solve;

pub use field::run_field;
pub use matrices::run_matrices;
pub use solve::run_solve;

use anyhow::{Result, bail};
use wirecap_core::Structure;

/// Voltages from `--voltages`, or 1 V on the first conductor and 0 V elsewhere.
pub(crate) fn conductor_voltages(structure: &Structure, given: Option<Vec<f64>>) -> Result<Vec<f64>> {
    let k = structure.num_conductors();
    match given {
        Some(volts) if volts.len() != k => bail!(
            "--voltages has {} values but the structure has {} conductors",
            volts.len(),
            k
        ),
        Some(volts) => Ok(volts),
        None => {
            let mut volts = vec![0.0; k];
            volts[0] = 1.0;
            Ok(volts)
        }
    }
}
