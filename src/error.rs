//! Error types for the globe surface and its mesh.

use thiserror::Error;

/// Errors raised while building or validating the dual mesh.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// Grid too coarse to form a closed surface
    #[error("mesh resolution {rows}x{cols} too small (need rows >= 2, cols >= 3)")]
    Resolution { rows: usize, cols: usize },

    /// A triangle refers past the end of the vertex buffers
    #[error("index {index} out of bounds for {vertex_count} vertices")]
    IndexOutOfBounds { index: u32, vertex_count: usize },

    /// Per-vertex buffers disagree in length
    #[error("vertex buffer length mismatch: {0}")]
    LengthMismatch(String),
}

/// Errors surfaced by [`crate::surface::EarthSurface`]. None of them are fatal to the
/// frame loop; spawn failures skip the offending record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    /// Latitude/longitude outside the valid domain
    #[error("invalid coordinate: lat {latitude}, lon {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Magnitude or timestamp unusable
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Configuration value outside its usable range
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Mesh construction failed
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),
}

impl SurfaceError {
    /// Creates an invalid-record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
