//! Sampling the potential of a solved charge distribution on a grid.
//!
//! Produces the data behind a field map; rendering is left to the caller.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use wirecap_core::{Point2, Structure};

use crate::error::{Error, Result};
use crate::kernel::Kernel;
use crate::segment::SegmentIndex;

/// Rectangular sampling window in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl MapWindow {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let ordered = x_min < x_max && y_min < y_max;
        let finite = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite());
        if !(ordered && finite) {
            return Err(Error::InvalidParameter(format!(
                "invalid map window x [{}, {}], y [{}, {}]",
                x_min, x_max, y_min, y_max
            )));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Bounding box of every conductor's `center ± diameter`, always including the origin.
    pub fn around(structure: &Structure) -> Self {
        let mut window = Self {
            x_min: 0.0,
            x_max: 0.0,
            y_min: 0.0,
            y_max: 0.0,
        };
        for conductor in structure.conductors() {
            let center = conductor.center();
            let diam = conductor.diameter_m();
            window.x_min = window.x_min.min(center.x - diam);
            window.x_max = window.x_max.max(center.x + diam);
            window.y_min = window.y_min.min(center.y - diam);
            window.y_max = window.y_max.max(center.y + diam);
        }
        window
    }

    fn axis(min: f64, max: f64, n: usize) -> Vec<f64> {
        if n == 1 {
            return vec![(min + max) / 2.0];
        }
        let step = (max - min) / (n - 1) as f64;
        (0..n).map(|i| min + step * i as f64).collect()
    }
}

/// Potential sampled on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentialMap {
    /// Grid x coordinates (m).
    pub xs: Vec<f64>,
    /// Grid y coordinates (m).
    pub ys: Vec<f64>,
    /// `values[(i, j)]` is the potential (V) at `(xs[i], ys[j])`.
    pub values: DMatrix<f64>,
}

impl PotentialMap {
    /// Superpose `charge[k] · kernel(point, segment k)` over a `resolution × resolution` grid.
    pub fn sample(
        charge: &DVector<f64>,
        index: &SegmentIndex,
        kernel: &dyn Kernel,
        window: &MapWindow,
        resolution: usize,
        parallel: bool,
    ) -> Result<Self> {
        if resolution == 0 {
            return Err(Error::InvalidParameter(
                "map resolution must be at least 1".to_string(),
            ));
        }
        if charge.len() != index.len() {
            return Err(Error::DimensionMismatch {
                expected: index.len(),
                actual: charge.len(),
            });
        }

        let xs = MapWindow::axis(window.x_min, window.x_max, resolution);
        let ys = MapWindow::axis(window.y_min, window.y_max, resolution);

        let potential_at = |point: Point2| -> f64 {
            charge
                .iter()
                .zip(index.iter())
                .map(|(q, seg)| q * kernel.potential(&point, seg))
                .sum()
        };
        let sample_column = |y: &f64| -> Vec<f64> {
            xs.iter().map(|&x| potential_at(Point2::new(x, *y))).collect()
        };

        let columns: Vec<Vec<f64>> = if parallel {
            ys.par_iter().map(sample_column).collect()
        } else {
            ys.iter().map(sample_column).collect()
        };

        let values = DMatrix::from_fn(xs.len(), ys.len(), |i, j| columns[j][i]);
        Ok(Self { xs, ys, values })
    }

    /// Potential at grid node `(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    /// Smallest and largest sampled potential.
    pub fn range(&self) -> (f64, f64) {
        (self.values.min(), self.values.max())
    }

    /// `x,y,potential` rows with a header line.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("x,y,potential\n");
        for (j, y) in self.ys.iter().enumerate() {
            for (i, x) in self.xs.iter().enumerate() {
                out.push_str(&format!("{:e},{:e},{:e}\n", x, y, self.values[(i, j)]));
            }
        }
        out
    }
}
