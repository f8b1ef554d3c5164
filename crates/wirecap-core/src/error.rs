//! Error types for structure loading and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a conductor structure.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The structure is missing required fields or violates a geometric constraint.
    #[error("Invalid structure: {message}")]
    Schema { message: String },

    /// A conductor's unit tag is not one of the recognized length units.
    #[error("Unknown length unit '{unit}' (expected one of mm, um, cm, m, km, mil, in, ft)")]
    UnknownUnit { unit: String },

    /// The structure file could not be read.
    #[error("Failed to read structure file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StructureError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for StructureError {
    fn from(e: serde_json::Error) -> Self {
        Self::schema(e.to_string())
    }
}

/// Result type for structure operations.
pub type Result<T> = std::result::Result<T, StructureError>;
