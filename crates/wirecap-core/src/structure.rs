//! Conductor structures and the structure-file loader.
//!
//! A structure file is JSON of the form
//!
//! ```json
//! {
//!   "mesh": { "min-div": 36 },
//!   "conductors": [
//!     { "name": "line", "pos": [0, 1000], "diam": 10, "units": "mm" },
//!     { "pos": [25, 1000], "diam": 10, "units": "mm", "N": 48 }
//!   ]
//! }
//! ```
//!
//! Every conductor inherits `mesh.min-div` as its segment count unless it
//! carries its own `N`. Validation happens once, in [`Structure::new`]; a
//! [`Structure`] that exists is always valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructureError};
use crate::geometry::Point2;
use crate::units::LengthUnit;

/// Smallest segment count that still forms a closed ring.
pub const MIN_SEGMENTS: usize = 3;

/// Mesh settings shared by all conductors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Default number of flat segments per conductor.
    #[serde(rename = "min-div")]
    pub min_div: usize,
}

impl MeshConfig {
    pub fn new(min_div: usize) -> Self {
        Self { min_div }
    }
}

/// A conductor as written in a structure file, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorSpec {
    /// Optional label used in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Center position, in `units`.
    pub pos: [f64; 2],
    /// Diameter, in `units`.
    pub diam: f64,
    /// Length unit tag (`mm`, `um`, `cm`, `m`, `km`, `mil`, `in`, `ft`).
    pub units: String,
    /// Segment count override; defaults to `mesh.min-div`.
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<usize>,
}

impl ConductorSpec {
    /// Create an unnamed conductor spec with no segment override.
    pub fn new(pos: [f64; 2], diam: f64, units: impl Into<String>) -> Self {
        Self {
            name: None,
            pos,
            diam,
            units: units.into(),
            segments: None,
        }
    }

    /// Set the label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the segment count for this conductor.
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = Some(segments);
        self
    }
}

/// On-disk layout of a structure file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureFile {
    pub mesh: MeshConfig,
    pub conductors: Vec<ConductorSpec>,
}

/// A validated round conductor.
#[derive(Debug, Clone, PartialEq)]
pub struct Conductor {
    name: Option<String>,
    position: [f64; 2],
    diameter: f64,
    unit: LengthUnit,
    segments: usize,
}

impl Conductor {
    /// Label from the structure file, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Center position in the conductor's own unit.
    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    /// Diameter in the conductor's own unit.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Number of flat segments the cross-section is divided into.
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Center position in meters.
    pub fn center(&self) -> Point2 {
        let scale = self.unit.meters_per_unit();
        Point2::new(self.position[0] * scale, self.position[1] * scale)
    }

    /// Radius in meters.
    pub fn radius(&self) -> f64 {
        self.unit.to_meters(self.diameter / 2.0)
    }

    /// Diameter in meters.
    pub fn diameter_m(&self) -> f64 {
        self.unit.to_meters(self.diameter)
    }
}

/// An ordered set of validated conductors plus the mesh settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    mesh: MeshConfig,
    conductors: Vec<Conductor>,
}

impl Structure {
    /// Validate conductor specs and resolve their segment counts.
    ///
    /// Fails with [`StructureError::UnknownUnit`] for an unrecognized unit
    /// tag and [`StructureError::Schema`] for an empty conductor list,
    /// non-finite coordinates, a non-positive diameter, or fewer than
    /// [`MIN_SEGMENTS`] segments after defaulting.
    pub fn new(mesh: MeshConfig, specs: Vec<ConductorSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(StructureError::schema("structure has no conductors"));
        }

        let conductors = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| resolve_conductor(index, spec, mesh))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { mesh, conductors })
    }

    /// Parse and validate a structure from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: StructureFile = serde_json::from_str(text)?;
        Self::from_file(file)
    }

    /// Load and validate a structure file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StructureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Validate an already-deserialized structure file.
    pub fn from_file(file: StructureFile) -> Result<Self> {
        Self::new(file.mesh, file.conductors)
    }

    pub fn mesh(&self) -> MeshConfig {
        self.mesh
    }

    pub fn conductors(&self) -> &[Conductor] {
        &self.conductors
    }

    pub fn conductor(&self, index: usize) -> Option<&Conductor> {
        self.conductors.get(index)
    }

    /// Number of conductors (K).
    pub fn num_conductors(&self) -> usize {
        self.conductors.len()
    }

    /// Total number of segments over all conductors (M).
    pub fn num_segments(&self) -> usize {
        self.conductors.iter().map(Conductor::segments).sum()
    }

    /// Display label for a conductor: its name, or `#index`.
    pub fn label(&self, index: usize) -> String {
        match self.conductors.get(index).and_then(Conductor::name) {
            Some(name) => name.to_string(),
            None => format!("#{}", index),
        }
    }

    /// Convert back into the on-disk representation.
    pub fn to_file(&self) -> StructureFile {
        StructureFile {
            mesh: self.mesh,
            conductors: self
                .conductors
                .iter()
                .map(|c| ConductorSpec {
                    name: c.name.clone(),
                    pos: c.position,
                    diam: c.diameter,
                    units: c.unit.tag().to_string(),
                    segments: Some(c.segments),
                })
                .collect(),
        }
    }
}

fn resolve_conductor(index: usize, spec: ConductorSpec, mesh: MeshConfig) -> Result<Conductor> {
    let unit: LengthUnit = spec.units.parse()?;

    if !spec.pos.iter().all(|v| v.is_finite()) {
        return Err(StructureError::schema(format!(
            "conductor {} has a non-finite position",
            index
        )));
    }
    if !(spec.diam.is_finite() && spec.diam > 0.0) {
        return Err(StructureError::schema(format!(
            "conductor {} has non-positive diameter {}",
            index, spec.diam
        )));
    }

    let segments = spec.segments.unwrap_or(mesh.min_div);
    if segments < MIN_SEGMENTS {
        return Err(StructureError::schema(format!(
            "conductor {} has {} segments (at least {} required)",
            index, segments, MIN_SEGMENTS
        )));
    }

    Ok(Conductor {
        name: spec.name,
        position: spec.pos,
        diameter: spec.diam,
        unit,
        segments,
    })
}
