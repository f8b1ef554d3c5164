//! Dense linear algebra helpers.
//!
//! The systems here are small (hundreds to a few thousand unknowns) and
//! fully dense, so everything goes through nalgebra's partial-pivot LU.

use nalgebra::DMatrix;

use crate::error::{Error, MatrixKind, Result};

/// Maximum absolute column sum.
pub fn one_norm(a: &DMatrix<f64>) -> f64 {
    a.column_iter()
        .map(|col| col.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Reciprocal 1-norm condition number `1 / (‖A‖₁·‖A⁻¹‖₁)`.
pub fn reciprocal_condition(a: &DMatrix<f64>, a_inv: &DMatrix<f64>) -> f64 {
    let product = one_norm(a) * one_norm(a_inv);
    if product.is_finite() && product > 0.0 {
        1.0 / product
    } else {
        0.0
    }
}

fn check_square(a: &DMatrix<f64>) -> Result<()> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    Ok(())
}

/// Invert a dense square matrix using LU decomposition.
///
/// Fails with [`Error::SingularSystem`] when the factorization hits a zero
/// pivot, the inverse contains non-finite entries, or the reciprocal
/// condition number falls below `rcond_tolerance`.
pub fn invert_dense(
    a: &DMatrix<f64>,
    kind: MatrixKind,
    rcond_tolerance: f64,
) -> Result<DMatrix<f64>> {
    check_square(a)?;

    let inverse = a
        .clone()
        .lu()
        .try_inverse()
        .ok_or(Error::SingularSystem {
            matrix: kind,
            rcond: 0.0,
        })?;

    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(Error::SingularSystem {
            matrix: kind,
            rcond: 0.0,
        });
    }

    let rcond = reciprocal_condition(a, &inverse);
    if rcond < rcond_tolerance {
        return Err(Error::SingularSystem {
            matrix: kind,
            rcond,
        });
    }
    if rcond < rcond_tolerance * 1e3 {
        log::warn!(
            "{} is poorly conditioned (rcond = {:.3e}); results may be inaccurate",
            kind,
            rcond
        );
    } else {
        log::debug!("Inverted {} ({}x{}, rcond = {:.3e})", kind, a.nrows(), a.ncols(), rcond);
    }

    Ok(inverse)
}

/// Largest `|A[i][j] - A[j][i]|` relative to the largest `|A[i][j]|`.
pub fn relative_asymmetry(a: &DMatrix<f64>) -> f64 {
    let scale = a.amax();
    if scale == 0.0 {
        return 0.0;
    }
    (a - a.transpose()).amax() / scale
}
