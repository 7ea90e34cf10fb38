//! Seismic event playback on a globe that morphs between a flat equirectangular
//! map and a sphere.
//!
//! The engine is [`EarthSurface`]: a dual-topology mesh (one triangulation, a
//! planar and a spherical vertex set), a [`MorphController`] blending between them
//! and a set of time-stamped [`Marker`]s that re-blend and decay every tick.

pub mod config;
pub mod data;
pub mod error;
pub mod geo;
pub mod hash;
pub mod marker;
pub mod mesh;
pub mod morph;
pub mod playback;
pub mod record;
pub mod surface;

pub use config::SurfaceConfig;
pub use error::{MeshError, SurfaceError};
pub use geo::{dual_position, to_planar, to_spherical, DualPosition, GeoCoordinate};
pub use marker::{Marker, MarkerState, SeverityThresholds, SeverityTier};
pub use mesh::{DualMeshBuilder, SurfaceMesh};
pub use morph::{MorphController, MorphMode};
pub use playback::{Playback, Released};
pub use record::{EarthquakeRecord, Seconds};
pub use surface::{EarthSurface, MarkerId, SpawnReport, TickReport};
