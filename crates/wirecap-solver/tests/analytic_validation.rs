//! Validation tests comparing solver results against analytical solutions
//! and physical invariants.
//!
//! Test naming convention:
//! - `test_wire_*` - Single wire over ground, closed-form reference
//! - `test_reciprocity_*` - Symmetry of Y and C
//! - `test_tem_*` - L·C relation
//! - `test_reject_*` - Error paths that must not produce numbers

use nalgebra::DMatrix;
use wirecap_core::{ConductorSpec, MeshConfig, PhysicalConstants, Structure, StructureError};
use wirecap_solver::linear::relative_asymmetry;
use wirecap_solver::{
    DielectricInterfaceKernel, Error, MatrixKind, SolverConfig, assemble, assemble_with_kernel,
    capacitance_matrix, ideal_wire_over_ground_charge, inductance_matrix_default,
    integrate_conductor_charge, solve_charge,
};

/// Relative error allowed against the analytic single-wire charge at N=36.
const WIRE_REL_TOL: f64 = 1e-3;

/// Relative asymmetry allowed in the capacitance matrix.
const C_SYMMETRY_TOL: f64 = 1e-6;

/// Relative asymmetry allowed in Y for equal-length segments.
const Y_RECIPROCITY_TOL: f64 = 1e-4;

fn wire_over_ground(segments: usize) -> Structure {
    // d = 1 m, a = 5 mm
    Structure::new(
        MeshConfig::new(segments),
        vec![ConductorSpec::new([0.0, 1.0], 0.01, "m")],
    )
    .expect("valid structure")
}

fn wire_charge(segments: usize) -> f64 {
    let structure = wire_over_ground(segments);
    let system = assemble(&structure, &SolverConfig::default()).expect("assembly failed");
    let charge = solve_charge(system.y_inv(), system.index(), &[1.0]).expect("solve failed");
    integrate_conductor_charge(&charge, system.index()).expect("integration failed")[0]
}

fn ideal_charge() -> f64 {
    ideal_wire_over_ground_charge(1.0, 0.005, &PhysicalConstants::default()).unwrap()
}

// ============================================================================
// Single wire over ground
// ============================================================================

/// Test: wire at height d = 1 m, radius a = 5 mm, N = 36, driven at 1 V.
///
/// Expected: Q ≈ 2π·ε₀ / arccosh(d/a) ≈ 9.285e-12 C/m
#[test]
fn test_wire_matches_closed_form() {
    let q_ideal = ideal_charge();
    assert!((q_ideal - 9.285e-12).abs() < 1e-15, "Q_ideal = {q_ideal}");

    let q = wire_charge(36);
    let rel = (q - q_ideal).abs() / q_ideal;
    assert!(rel < WIRE_REL_TOL, "Q = {q}, Q_ideal = {q_ideal}, rel err = {rel}");
}

/// Test: error at least halves each time N doubles from 12 to 96.
#[test]
fn test_wire_converges_with_segment_count() {
    let q_ideal = ideal_charge();
    let errors: Vec<f64> = [12, 24, 48, 96]
        .iter()
        .map(|&n| (wire_charge(n) - q_ideal).abs() / q_ideal)
        .collect();

    for pair in errors.windows(2) {
        assert!(
            pair[1] <= pair[0] * 0.5,
            "error did not halve: {:e} -> {:e} (all: {:?})",
            pair[0],
            pair[1],
            errors
        );
    }
    assert!(errors[3] < 5e-5, "N=96 error {:e}", errors[3]);
}

/// Test: same wire described in millimeters gives the same charge.
#[test]
fn test_wire_unit_scaling() {
    let in_mm = Structure::new(
        MeshConfig::new(36),
        vec![ConductorSpec::new([0.0, 1000.0], 10.0, "mm")],
    )
    .unwrap();
    let system = assemble(&in_mm, &SolverConfig::default()).unwrap();
    let q_mm = system.conductor_charge(&[1.0]).unwrap()[0];
    let q_m = wire_charge(36);
    assert!((q_mm - q_m).abs() / q_m < 1e-9, "mm: {q_mm}, m: {q_m}");
}

/// Test: charge scales linearly with the applied voltage.
#[test]
fn test_wire_charge_linear_in_voltage() {
    let system = assemble(&wire_over_ground(24), &SolverConfig::default()).unwrap();
    let q1 = system.conductor_charge(&[1.0]).unwrap()[0];
    let q5 = system.conductor_charge(&[-5.0]).unwrap()[0];
    assert!((q5 + 5.0 * q1).abs() < 1e-9 * q1.abs());
}

// ============================================================================
// Reciprocity
// ============================================================================

/// Test: Y is symmetric for identical conductors (all segments equal length).
#[test]
fn test_reciprocity_coefficient_matrix() {
    let structure = Structure::new(
        MeshConfig::new(24),
        vec![
            ConductorSpec::new([-10.0, 20.0], 2.0, "mm"),
            ConductorSpec::new([10.0, 20.0], 2.0, "mm"),
        ],
    )
    .unwrap();
    let system = assemble(&structure, &SolverConfig::default()).unwrap();
    let asym = relative_asymmetry(system.y());
    assert!(asym < Y_RECIPROCITY_TOL, "relative asymmetry of Y = {asym:e}");
}

/// Test: with mixed segment lengths, Y[r][c]/L_c is symmetric.
#[test]
fn test_reciprocity_length_normalized() {
    let structure = Structure::new(
        MeshConfig::new(24),
        vec![
            ConductorSpec::new([-10.0, 20.0], 2.0, "mm"),
            ConductorSpec::new([12.0, 30.0], 4.0, "mm").with_segments(36),
        ],
    )
    .unwrap();
    let system = assemble(&structure, &SolverConfig::default()).unwrap();
    let lengths = system.index().lengths();
    let m = system.num_segments();
    let p = DMatrix::from_fn(m, m, |r, c| system.y()[(r, c)] / lengths[c]);

    assert!(relative_asymmetry(system.y()) > 1e-2, "raw Y should not be symmetric here");
    let asym = relative_asymmetry(&p);
    assert!(asym < Y_RECIPROCITY_TOL, "relative asymmetry of Y·diag(1/L) = {asym:e}");
}

/// Test: C is symmetric for a three-conductor cable with mixed sizes.
#[test]
fn test_reciprocity_capacitance_matrix() {
    let structure = Structure::from_json_str(
        r#"{
            "mesh": { "min-div": 24 },
            "conductors": [
                { "name": "L1", "pos": [-4, 10], "diam": 1.6, "units": "mm" },
                { "name": "N",  "pos": [0, 10],  "diam": 1.6, "units": "mm" },
                { "name": "PE", "pos": [4, 10],  "diam": 1.2, "units": "mm", "N": 30 }
            ]
        }"#,
    )
    .unwrap();
    let system = assemble(&structure, &SolverConfig::default()).unwrap();
    let c = capacitance_matrix(&structure, system.y_inv(), system.index()).unwrap();

    let asym = relative_asymmetry(&c);
    assert!(asym < C_SYMMETRY_TOL, "relative asymmetry of C = {asym:e}");
    assert!(c.iter().all(|v| v.is_finite()));
}

// ============================================================================
// TEM relation
// ============================================================================

/// Test: two widely separated conductors in free space, L·C ≈ I/c².
#[test]
fn test_tem_free_space_lc_product() {
    let structure = Structure::new(
        MeshConfig::new(24),
        vec![
            ConductorSpec::new([-5.0, 0.0], 0.002, "m"),
            ConductorSpec::new([5.0, 0.0], 0.002, "m"),
        ],
    )
    .unwrap();
    let config = SolverConfig::free_space();
    let system = assemble(&structure, &config).unwrap();
    assert!(!system.is_grounded());

    let c = system.capacitance().unwrap();
    let l = inductance_matrix_default(&c, &config.constants).unwrap();
    let c2 = config.constants.speed_of_light.powi(2);
    let product = (&l * &c) * c2;

    let error = (product - DMatrix::identity(2, 2)).amax();
    assert!(error < 1e-6, "max |L·C·c² - I| = {error:e}");
}

// ============================================================================
// Rejection
// ============================================================================

/// Test: an unknown unit tag is an error, never a scale factor of 1.
#[test]
fn test_reject_unknown_unit() {
    let result = Structure::from_json_str(
        r#"{ "mesh": { "min-div": 36 },
             "conductors": [ { "pos": [0, 1], "diam": 0.01, "units": "furlong" } ] }"#,
    );
    assert!(
        matches!(result, Err(StructureError::UnknownUnit { ref unit }) if unit == "furlong"),
        "got {result:?}"
    );

    let solver_err: Error = result.unwrap_err().into();
    assert!(solver_err.to_string().contains("furlong"));
}

/// Test: two identical conductors at one position are rejected as singular.
#[test]
fn test_reject_coincident_conductors() {
    let structure = Structure::new(
        MeshConfig::new(24),
        vec![
            ConductorSpec::new([0.0, 10.0], 2.0, "mm"),
            ConductorSpec::new([0.0, 10.0], 2.0, "mm"),
        ],
    )
    .unwrap();
    match assemble(&structure, &SolverConfig::default()) {
        Err(Error::SingularSystem { matrix, rcond }) => {
            assert_eq!(matrix, MatrixKind::Coefficient);
            assert!(rcond < 1e-13, "rcond = {rcond:e}");
        }
        other => panic!("expected SingularSystem, got {other:?}"),
    }
}

/// Test: a wire whose cross-section crosses the ground plane is shorted, not solved.
///
/// Center at 0.9 mm with a 1 mm radius would otherwise assemble and return a
/// finite, meaningless capacitance.
#[test]
fn test_reject_conductor_crossing_ground() {
    let structure = Structure::new(
        MeshConfig::new(24),
        vec![ConductorSpec::new([0.0, 0.9], 2.0, "mm")],
    )
    .unwrap();
    let result = assemble(&structure, &SolverConfig::default());
    assert!(
        matches!(result, Err(Error::InvalidParameter(_))),
        "crossing conductor gave {result:?}"
    );
}

/// Test: a wire tangent to the ground plane is rejected the same way.
#[test]
fn test_reject_conductor_touching_ground() {
    let structure = Structure::new(
        MeshConfig::new(24),
        vec![
            ConductorSpec::new([-5.0, 10.0], 2.0, "mm"),
            ConductorSpec::new([5.0, 1.0], 2.0, "mm").with_name("low"),
        ],
    )
    .unwrap();
    match assemble(&structure, &SolverConfig::default()) {
        Err(Error::InvalidParameter(msg)) => assert!(msg.contains("low"), "{msg}"),
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

/// Test: a boundary-condition vector of the wrong length is rejected.
#[test]
fn test_reject_voltage_length() {
    let system = assemble(&wire_over_ground(12), &SolverConfig::default()).unwrap();
    let result = system.solve_charge(&[1.0, 0.0]);
    assert!(matches!(
        result,
        Err(Error::DimensionMismatch {
            expected: 1,
            actual: 2
        })
    ));
}

// ============================================================================
// Alternative kernels
// ============================================================================

/// Test: the dielectric-interface kernel can drive assembly on its own.
#[test]
fn test_dielectric_kernel_assembles() {
    let structure = wire_over_ground(12);
    let kernel = DielectricInterfaceKernel::with_default_step(1.0, 4.0).unwrap();
    let config = SolverConfig::default();
    // Not generally invertible: expect a clean inverse or an explicit singular error
    let index = wirecap_solver::SegmentIndex::build(&structure);
    let y = wirecap_solver::build_coefficient_matrix(&index, &kernel, true);
    assert_eq!(y.shape(), (12, 12));
    assert!(y.iter().all(|v| v.is_finite()));

    match assemble_with_kernel(&structure, &kernel, &config) {
        Ok(system) => {
            assert_eq!(system.y(), &y);
            assert!(system.y_inv().iter().all(|v| v.is_finite()));
        }
        Err(Error::SingularSystem { matrix, .. }) => assert_eq!(matrix, MatrixKind::Coefficient),
        Err(other) => panic!("unexpected error {other}"),
    }
}
