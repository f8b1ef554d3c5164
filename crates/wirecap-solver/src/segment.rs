//! Discretization of conductor cross-sections into flat charge segments.
//!
//! Each conductor's circle of radius `r` is split into `N` equal angular
//! steps `dφ = 2π/N`. Segment `k` sits at angle `k·dφ` on the circle, is
//! oriented along the tangent there, and carries a uniform line-charge
//! density over its length.

use std::f64::consts::PI;
use std::ops::Range;

use nalgebra::Vector2;
use wirecap_core::{Conductor, Point2, Structure};

/// One flat charge segment of a conductor ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Index of the owning conductor.
    pub conductor: usize,
    /// Position within the conductor's ring, `0..N`.
    pub local: usize,
    /// Midpoint in meters; also the collocation point for this segment.
    pub midpoint: Point2,
    /// Unit vector along the segment (tangent to the circle).
    pub direction: Vector2<f64>,
    /// Effective segment length in meters.
    pub length: f64,
}

/// Effective length of one of `n` segments on a circle of the given radius.
///
/// This is `r·sin(dφ/2)·(1 + cos(dφ/2))`, a midpoint-rule correction of the
/// chord so that summing density × length over the ring integrates the
/// surface charge of the circle.
pub fn segment_length(radius: f64, n: usize) -> f64 {
    let half = PI / n as f64;
    radius * half.sin() * (1.0 + half.cos())
}

/// Segments of a single conductor, in ring order.
pub fn conductor_segments(conductor_index: usize, conductor: &Conductor) -> Vec<Segment> {
    let n = conductor.segments();
    let center = conductor.center();
    let radius = conductor.radius();
    let dphi = 2.0 * PI / n as f64;
    let length = segment_length(radius, n);

    (0..n)
        .map(|k| {
            let (sin, cos) = (dphi * k as f64).sin_cos();
            Segment {
                conductor: conductor_index,
                local: k,
                midpoint: center + Vector2::new(cos, sin) * radius,
                direction: Vector2::new(-sin, cos),
                length,
            }
        })
        .collect()
}

/// Ordered list of all segments in a structure.
///
/// Defines the row/column ordering of every segment-level matrix and vector.
/// Segments of one conductor are contiguous, conductors appear in structure
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentIndex {
    segments: Vec<Segment>,
    /// `offsets[i]..offsets[i + 1]` are the global indices of conductor `i`.
    offsets: Vec<usize>,
}

impl SegmentIndex {
    /// Discretize every conductor of a structure.
    pub fn build(structure: &Structure) -> Self {
        let mut segments = Vec::with_capacity(structure.num_segments());
        let mut offsets = Vec::with_capacity(structure.num_conductors() + 1);
        offsets.push(0);

        for (index, conductor) in structure.conductors().iter().enumerate() {
            segments.extend(conductor_segments(index, conductor));
            offsets.push(segments.len());
        }

        log::debug!(
            "Segmented {} conductors into {} segments",
            structure.num_conductors(),
            segments.len()
        );

        Self { segments, offsets }
    }

    /// Total number of segments (M).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of conductors (K).
    pub fn num_conductors(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Global index range of a conductor's segments.
    pub fn conductor_range(&self, conductor: usize) -> Range<usize> {
        self.offsets[conductor]..self.offsets[conductor + 1]
    }

    /// Segments belonging to one conductor.
    pub fn conductor_segments(&self, conductor: usize) -> &[Segment] {
        &self.segments[self.conductor_range(conductor)]
    }

    /// `(conductor, local)` identity of a global segment number.
    pub fn identify(&self, index: usize) -> Option<(usize, usize)> {
        self.segments.get(index).map(|s| (s.conductor, s.local))
    }

    /// Segment lengths in global order.
    pub fn lengths(&self) -> Vec<f64> {
        self.segments.iter().map(|s| s.length).collect()
    }
}

impl<'a> IntoIterator for &'a SegmentIndex {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
