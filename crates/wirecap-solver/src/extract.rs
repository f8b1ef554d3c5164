//! Charge solves and capacitance/inductance extraction.

use std::f64::consts::PI;
use std::time::Instant;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use wirecap_core::{PhysicalConstants, Structure};

use crate::config::DEFAULT_RCOND_TOLERANCE;
use crate::error::{Error, MatrixKind, Result};
use crate::linear::invert_dense;
use crate::segment::SegmentIndex;

fn check_inverse(y_inv: &DMatrix<f64>, index: &SegmentIndex) -> Result<()> {
    for actual in [y_inv.nrows(), y_inv.ncols()] {
        if actual != index.len() {
            return Err(Error::DimensionMismatch {
                expected: index.len(),
                actual,
            });
        }
    }
    Ok(())
}

/// Segment voltage vector: each conductor's voltage on all of its segments.
pub fn segment_voltages(index: &SegmentIndex, conductor_voltages: &[f64]) -> Result<DVector<f64>> {
    if conductor_voltages.len() != index.num_conductors() {
        return Err(Error::DimensionMismatch {
            expected: index.num_conductors(),
            actual: conductor_voltages.len(),
        });
    }
    if let Some(v) = conductor_voltages.iter().find(|v| !v.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "conductor voltage must be finite, got {}",
            v
        )));
    }

    Ok(DVector::from_iterator(
        index.len(),
        index.iter().map(|seg| conductor_voltages[seg.conductor]),
    ))
}

/// Segment charge densities (C/m per meter of segment) for one voltage per conductor.
pub fn solve_charge(
    y_inv: &DMatrix<f64>,
    index: &SegmentIndex,
    conductor_voltages: &[f64],
) -> Result<DVector<f64>> {
    check_inverse(y_inv, index)?;
    let voltages = segment_voltages(index, conductor_voltages)?;
    Ok(y_inv * voltages)
}

/// Total charge per conductor (C/m): `Σ density·length` over its segments.
pub fn integrate_conductor_charge(
    segment_charge: &DVector<f64>,
    index: &SegmentIndex,
) -> Result<DVector<f64>> {
    if segment_charge.len() != index.len() {
        return Err(Error::DimensionMismatch {
            expected: index.len(),
            actual: segment_charge.len(),
        });
    }

    let mut totals = DVector::zeros(index.num_conductors());
    for (density, seg) in segment_charge.iter().zip(index.iter()) {
        totals[seg.conductor] += density * seg.length;
    }
    Ok(totals)
}

/// Capacitance matrix (F/m) of a structure from its inverted coefficient matrix.
///
/// Row `i` holds the conductor charges when conductor `i` is at 1 V and all
/// others are grounded. The K solves always run on the rayon pool; use
/// [`capacitance_from_inverse`] or `MomSystem::capacitance` to honor
/// `SolverConfig::parallel`.
pub fn capacitance_matrix(
    structure: &Structure,
    y_inv: &DMatrix<f64>,
    index: &SegmentIndex,
) -> Result<DMatrix<f64>> {
    if structure.num_conductors() != index.num_conductors() {
        return Err(Error::DimensionMismatch {
            expected: structure.num_conductors(),
            actual: index.num_conductors(),
        });
    }
    capacitance_from_inverse(y_inv, index, true)
}

/// [`capacitance_matrix`] without the structure cross-check.
///
/// The K unit-voltage solves are independent and share `y_inv` read-only;
/// with `parallel` they run on the rayon pool.
pub fn capacitance_from_inverse(
    y_inv: &DMatrix<f64>,
    index: &SegmentIndex,
    parallel: bool,
) -> Result<DMatrix<f64>> {
    check_inverse(y_inv, index)?;
    let start = Instant::now();
    let k = index.num_conductors();

    let excite = |i: usize| -> Result<DVector<f64>> {
        let mut voltages = vec![0.0; k];
        voltages[i] = 1.0;
        let charge = solve_charge(y_inv, index, &voltages)?;
        integrate_conductor_charge(&charge, index)
    };

    let rows: Vec<DVector<f64>> = if parallel {
        (0..k).into_par_iter().map(excite).collect::<Result<_>>()?
    } else {
        (0..k).map(excite).collect::<Result<_>>()?
    };

    let c = DMatrix::from_fn(k, k, |i, j| rows[i][j]);
    log::info!("Extracted {}x{} capacitance matrix in {:.2?}", k, k, start.elapsed());
    Ok(c)
}

/// Inductance matrix (H/m) from a capacitance matrix: `L = C⁻¹ / c²`.
///
/// Valid for a uniform surrounding medium (TEM). Fails with
/// [`Error::SingularSystem`] when C cannot be inverted.
pub fn inductance_matrix(
    c: &DMatrix<f64>,
    constants: &PhysicalConstants,
    rcond_tolerance: f64,
) -> Result<DMatrix<f64>> {
    let c_inv = invert_dense(c, MatrixKind::Capacitance, rcond_tolerance)?;
    Ok(c_inv / constants.speed_of_light.powi(2))
}

/// [`inductance_matrix`] with the default conditioning threshold.
pub fn inductance_matrix_default(c: &DMatrix<f64>, constants: &PhysicalConstants) -> Result<DMatrix<f64>> {
    inductance_matrix(c, constants, DEFAULT_RCOND_TOLERANCE)
}

/// Analytic charge (C/m) on a round wire at 1 V above a grounded plane.
///
/// `2π·ε / arccosh(height / radius)`, with `height` measured from the plane
/// to the wire's center.
pub fn ideal_wire_over_ground_charge(
    height: f64,
    radius: f64,
    constants: &PhysicalConstants,
) -> Result<f64> {
    if !(radius > 0.0 && height > radius) {
        return Err(Error::InvalidParameter(format!(
            "wire center height {} must exceed its radius {}",
            height, radius
        )));
    }
    Ok(2.0 * PI * constants.epsilon0 / (height / radius).acosh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::assemble;
    use crate::config::SolverConfig;
    use crate::linear::relative_asymmetry;
    use wirecap_core::{ConductorSpec, MeshConfig};

    fn three_wires() -> Structure {
        Structure::new(
            MeshConfig::new(12),
            vec![
                ConductorSpec::new([-3.0, 8.0], 1.6, "mm"),
                ConductorSpec::new([0.0, 8.0], 1.6, "mm"),
                ConductorSpec::new([3.0, 8.0], 1.0, "mm").with_segments(16),
            ],
        )
        .unwrap()
    }

    #[test]
    fn voltages_broadcast_to_segments() {
        let index = SegmentIndex::build(&three_wires());
        let v = segment_voltages(&index, &[1.0, 0.0, -2.0]).unwrap();
        assert_eq!(v.len(), 40);
        assert!(v.iter().take(12).all(|&x| x == 1.0));
        assert!(v.iter().skip(12).take(12).all(|&x| x == 0.0));
        assert!(v.iter().skip(24).all(|&x| x == -2.0));
    }

    #[test]
    fn wrong_voltage_count_is_rejected() {
        let structure = three_wires();
        let system = assemble(&structure, &SolverConfig::default()).unwrap();
        let result = solve_charge(system.y_inv(), system.index(), &[1.0, 0.0]);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            solve_charge(system.y_inv(), system.index(), &[1.0, f64::NAN, 0.0]),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn charge_solution_reproduces_voltages() {
        let system = assemble(&three_wires(), &SolverConfig::default()).unwrap();
        let volts = [1.0, -0.5, 0.25];
        let charge = system.solve_charge(&volts).unwrap();
        let applied = system.y() * &charge;
        let expected = segment_voltages(system.index(), &volts).unwrap();
        assert!((applied - expected).amax() < 1e-9);
    }

    #[test]
    fn superposition_of_excitations() {
        let structure = three_wires();
        let system = assemble(&structure, &SolverConfig::default()).unwrap();
        let c = capacitance_matrix(&structure, system.y_inv(), system.index()).unwrap();

        let volts = [2.0, -1.0, 0.5];
        let q = system.conductor_charge(&volts).unwrap();
        for j in 0..3 {
            let expected: f64 = (0..3).map(|i| volts[i] * c[(i, j)]).sum();
            assert!((q[j] - expected).abs() < 1e-9 * c.amax());
        }
    }

    #[test]
    fn capacitance_matrix_properties() {
        let structure = three_wires();
        let system = assemble(&structure, &SolverConfig::default()).unwrap();
        let c = system.capacitance().unwrap();

        assert!(relative_asymmetry(&c) < 1e-6);
        for i in 0..3 {
            assert!(c[(i, i)] > 0.0, "self capacitance must be positive");
            for j in 0..3 {
                if i != j {
                    assert!(c[(i, j)] < 0.0, "mutual capacitance must be negative");
                }
            }
            // Diagonal dominance above a ground plane
            let row_sum: f64 = (0..3).map(|j| c[(i, j)]).sum();
            assert!(row_sum > 0.0);
        }
    }

    #[test]
    fn serial_and_parallel_extraction_agree() {
        let system = assemble(&three_wires(), &SolverConfig::default()).unwrap();
        let a = capacitance_from_inverse(system.y_inv(), system.index(), true).unwrap();
        let b = capacitance_from_inverse(system.y_inv(), system.index(), false).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn capacitance_matrix_matches_serial_session() {
        let structure = three_wires();
        let config = SolverConfig::default().with_parallel(false);
        let system = assemble(&structure, &config).unwrap();
        let free = capacitance_matrix(&structure, system.y_inv(), system.index()).unwrap();
        let session = system.capacitance().unwrap();
        assert!((free - session).amax() < 1e-24);
    }

    #[test]
    fn structure_mismatch_is_rejected() {
        let system = assemble(&three_wires(), &SolverConfig::default()).unwrap();
        let other = Structure::new(
            MeshConfig::new(12),
            vec![ConductorSpec::new([0.0, 8.0], 1.6, "mm")],
        )
        .unwrap();
        assert!(matches!(
            capacitance_matrix(&other, system.y_inv(), system.index()),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn inductance_is_scaled_inverse() {
        let system = assemble(&three_wires(), &SolverConfig::default()).unwrap();
        let c = system.capacitance().unwrap();
        let l = system.inductance().unwrap();
        let c2 = system.constants().speed_of_light.powi(2);
        let product = &l * &c * c2;
        assert!((product - DMatrix::identity(3, 3)).amax() < 1e-9);
    }

    #[test]
    fn singular_capacitance_is_rejected() {
        let c = DMatrix::from_row_slice(2, 2, &[1e-11, 1e-11, 1e-11, 1e-11]);
        let result = inductance_matrix_default(&c, &PhysicalConstants::default());
        assert!(matches!(
            result,
            Err(Error::SingularSystem {
                matrix: MatrixKind::Capacitance,
                ..
            })
        ));
    }

    #[test]
    fn ideal_charge_value() {
        let q = ideal_wire_over_ground_charge(1.0, 0.005, &PhysicalConstants::default()).unwrap();
        let expected = 2.0 * PI * 8.854e-12 / 200.0_f64.acosh();
        assert!((q - expected).abs() < 1e-25);
        assert!((q - 9.2851e-12).abs() < 1e-15);
        assert!(ideal_wire_over_ground_charge(0.004, 0.005, &PhysicalConstants::default()).is_err());
    }
}
