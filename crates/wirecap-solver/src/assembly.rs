//! Assembly of the segment coefficient matrix.
//!
//! `Y[row][col]` is the potential at segment `row`'s midpoint due to a unit
//! line-charge density on segment `col`. Entries depend only on static
//! geometry, so the matrix is filled one column per task on the rayon pool
//! and inverted once; every later excitation reuses the inverse.

use std::time::Instant;

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use wirecap_core::{GroundPlane, PhysicalConstants, Structure};

use crate::config::SolverConfig;
use crate::error::{Error, MatrixKind, Result};
use crate::extract;
use crate::kernel::{FreeSpaceKernel, ImageKernel, Kernel};
use crate::linear::invert_dense;
use crate::segment::SegmentIndex;

/// The assembled and inverted moment system of one structure.
///
/// Immutable once built: `y_inv` is shared read-only by every excitation.
#[derive(Debug, Clone)]
pub struct MomSystem {
    y: DMatrix<f64>,
    y_inv: DMatrix<f64>,
    index: SegmentIndex,
    constants: PhysicalConstants,
    grounded: bool,
    rcond_tolerance: f64,
    parallel: bool,
}

/// Fill the coefficient matrix for a segment index with any kernel.
pub fn build_coefficient_matrix(
    index: &SegmentIndex,
    kernel: &dyn Kernel,
    parallel: bool,
) -> DMatrix<f64> {
    let m = index.len();
    let segments = index.segments();
    let mut data = vec![0.0; m * m];

    // Column-major: chunk `col` holds Y[..][col]
    let fill_column = |(col, column): (usize, &mut [f64])| {
        let source = &segments[col];
        for (row, entry) in column.iter_mut().enumerate() {
            *entry = kernel.potential(&segments[row].midpoint, source);
        }
    };

    if m > 0 {
        if parallel {
            data.par_chunks_mut(m).enumerate().for_each(fill_column);
        } else {
            data.chunks_mut(m).enumerate().for_each(fill_column);
        }
    }

    DMatrix::from_vec(m, m, data)
}

/// Assemble and invert the coefficient matrix of a structure.
///
/// Uses the ground-image kernel when `config.ground` is set and the
/// free-space kernel otherwise.
pub fn assemble(structure: &Structure, config: &SolverConfig) -> Result<MomSystem> {
    let kernel = kernel_for(config);
    assemble_with_kernel(structure, kernel.as_ref(), config)
}

/// The kernel [`assemble`] uses for a configuration.
pub fn kernel_for(config: &SolverConfig) -> Box<dyn Kernel> {
    match config.ground {
        Some(plane) => Box::new(ImageKernel::new(config.constants, plane)),
        None => Box::new(FreeSpaceKernel::new(config.constants)),
    }
}

/// Reject conductors that touch or cross the grounded plane.
///
/// Such a conductor is shorted to ground and its charge is undefined.
pub fn check_ground_clearance(structure: &Structure, plane: &GroundPlane) -> Result<()> {
    for (i, conductor) in structure.conductors().iter().enumerate() {
        let clearance = plane.signed_distance(&conductor.center()) - conductor.radius();
        if clearance <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "conductor {} touches or crosses the ground plane (clearance {:.3e} m)",
                structure.label(i),
                clearance
            )));
        }
    }
    Ok(())
}

/// Assemble and invert the coefficient matrix using an explicit kernel.
///
/// The kernel alone decides whether an image charge is included.
/// `config.ground` is recorded for the inductance warning, and when set every
/// conductor must clear the plane (see [`check_ground_clearance`]).
pub fn assemble_with_kernel(
    structure: &Structure,
    kernel: &dyn Kernel,
    config: &SolverConfig,
) -> Result<MomSystem> {
    if let Some(plane) = &config.ground {
        check_ground_clearance(structure, plane)?;
    }

    let start = Instant::now();
    let index = SegmentIndex::build(structure);

    log::debug!(
        "Assembling {}x{} coefficient matrix with {} kernel ({})",
        index.len(),
        index.len(),
        kernel.name(),
        config.describe()
    );

    let y = build_coefficient_matrix(&index, kernel, config.parallel);
    let y_inv = invert_dense(&y, MatrixKind::Coefficient, config.rcond_tolerance)?;

    log::info!(
        "Assembled and inverted {} segments over {} conductors in {:.2?}",
        index.len(),
        index.num_conductors(),
        start.elapsed()
    );

    Ok(MomSystem {
        y,
        y_inv,
        index,
        constants: config.constants,
        grounded: config.ground.is_some(),
        rcond_tolerance: config.rcond_tolerance,
        parallel: config.parallel,
    })
}

impl MomSystem {
    /// Coefficient matrix Y (M×M).
    pub fn y(&self) -> &DMatrix<f64> {
        &self.y
    }

    /// Cached inverse of Y.
    pub fn y_inv(&self) -> &DMatrix<f64> {
        &self.y_inv
    }

    /// Row/column ordering of Y.
    pub fn index(&self) -> &SegmentIndex {
        &self.index
    }

    /// Number of segments (M).
    pub fn num_segments(&self) -> usize {
        self.index.len()
    }

    /// Number of conductors (K).
    pub fn num_conductors(&self) -> usize {
        self.index.num_conductors()
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Whether the system was assembled with a ground-plane image.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Segment charge densities for one voltage per conductor.
    pub fn solve_charge(&self, conductor_voltages: &[f64]) -> Result<DVector<f64>> {
        extract::solve_charge(&self.y_inv, &self.index, conductor_voltages)
    }

    /// Total charge per conductor for one voltage per conductor.
    pub fn conductor_charge(&self, conductor_voltages: &[f64]) -> Result<DVector<f64>> {
        let charge = self.solve_charge(conductor_voltages)?;
        extract::integrate_conductor_charge(&charge, &self.index)
    }

    /// Capacitance matrix of the structure this system was built from.
    pub fn capacitance(&self) -> Result<DMatrix<f64>> {
        extract::capacitance_from_inverse(&self.y_inv, &self.index, self.parallel)
    }

    /// Inductance matrix derived from the capacitance matrix.
    pub fn inductance(&self) -> Result<DMatrix<f64>> {
        let c = self.capacitance()?;
        if self.grounded {
            log::warn!(
                "L = C^-1/c^2 assumes a uniform medium; after a ground-plane solve it is an approximation"
            );
        }
        extract::inductance_matrix(&c, &self.constants, self.rcond_tolerance)
    }
}
