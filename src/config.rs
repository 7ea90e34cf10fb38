//! Engine configuration. Every section has defaults, so an empty JSON object is a
//! valid config.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::marker::SeverityThresholds;
use crate::morph::{MorphMode, DEFAULT_MORPH_RATE};
use crate::record::Seconds;

/// Roughly one year (12 × 28 days)
pub const DEFAULT_MARKER_LIFESPAN: Seconds = 12.0 * 28.0 * 24.0 * 60.0 * 60.0;

/// Mesh resolution
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Latitude bands, north pole to south pole
    pub rows: usize,
    /// Longitude bands, -180° to +180°
    pub cols: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { rows: 20, cols: 40 }
    }
}

/// Marker lifetime and severity policy
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Seconds of playback time a marker stays visible
    pub lifespan: Seconds,
    pub thresholds: SeverityThresholds,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            lifespan: DEFAULT_MARKER_LIFESPAN,
            thresholds: SeverityThresholds::default(),
        }
    }
}

/// Playback clock settings
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Dataset seconds per real second
    pub speed: f64,
    /// Restart from the first record once the catalog has played out
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            // About one month of catalog time per real second
            speed: 28.0 * 24.0 * 60.0 * 60.0,
            looping: true,
        }
    }
}

/// Everything the surface and the viewer can be tuned with. Every field has a
/// default, so a config file only needs the keys it changes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub mesh: MeshConfig,
    /// Blend units per second
    pub morph_rate: f64,
    pub initial_mode: MorphMode,
    pub marker: MarkerConfig,
    pub playback: PlaybackConfig,
    /// Earth's axial tilt, applied as a rotation about Z in globe mode
    pub axial_tilt_deg: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            mesh: MeshConfig::default(),
            morph_rate: DEFAULT_MORPH_RATE,
            initial_mode: MorphMode::Map,
            marker: MarkerConfig::default(),
            playback: PlaybackConfig::default(),
            axial_tilt_deg: -23.4,
        }
    }
}

impl SurfaceConfig {
    /// Parse a JSON config document.
    pub fn from_json(mut bytes: Vec<u8>) -> Result<Self> {
        let config: Self =
            simd_json::serde::from_slice(&mut bytes).context("invalid config JSON")?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(bytes).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = SurfaceConfig::from_json(b"{}".to_vec()).unwrap();
        assert_eq!(config, SurfaceConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let json = br#"{
            "mesh": { "rows": 150 },
            "initial_mode": "globe",
            "marker": { "thresholds": { "severe": 8.5 } }
        }"#;
        let config = SurfaceConfig::from_json(json.to_vec()).unwrap();
        assert_eq!(config.mesh.rows, 150);
        assert_eq!(config.mesh.cols, 40);
        assert_eq!(config.initial_mode, MorphMode::Globe);
        assert_eq!(config.marker.thresholds.severe, 8.5);
        assert_eq!(config.marker.thresholds.moderate, 7.0);
        assert_eq!(config.marker.lifespan, DEFAULT_MARKER_LIFESPAN);
        assert_eq!(config.morph_rate, DEFAULT_MORPH_RATE);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(SurfaceConfig::from_json(b"{ not json".to_vec()).is_err());
        assert!(SurfaceConfig::from_json(br#"{"mesh": {"rows": "many"}}"#.to_vec()).is_err());
    }
}
