//! Loader layer: earthquake catalogs and coastline outlines.
//!
//! Everything here runs before playback starts and hands finished vectors to the
//! surface and the viewer.

mod synthetic;

pub use synthetic::{simple_world_outline, synthetic_catalog};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, GeoJson, Geometry, Value};

use crate::record::EarthquakeRecord;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Load a USGS-style earthquake catalog (GeoJSON FeatureCollection of Points with
/// `mag`, `time` in milliseconds and optional `place` properties), sorted by time.
pub fn load_catalog(path: &Path) -> Result<Vec<EarthquakeRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let records = parse_catalog(&content)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    tracing::info!(count = records.len(), path = %path.display(), "loaded earthquake catalog");
    Ok(records)
}

/// Parse catalog GeoJSON text. Features without a magnitude, a time or a point
/// geometry are skipped.
pub fn parse_catalog(content: &str) -> Result<Vec<EarthquakeRecord>> {
    let geojson: GeoJson = content.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => {
            anyhow::bail!("catalog must contain features, found a bare geometry")
        }
    };

    let total = features.len();
    let mut records: Vec<EarthquakeRecord> =
        features.iter().filter_map(feature_to_record).collect();

    let skipped = total - records.len();
    if skipped > 0 {
        tracing::warn!(skipped, total, "catalog features without magnitude, time or point");
    }

    records.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    Ok(records)
}

fn feature_to_record(feature: &Feature) -> Option<EarthquakeRecord> {
    let magnitude = feature.property("mag").and_then(|v| v.as_f64())?;
    let time_ms = feature.property("time").and_then(|v| v.as_f64())?;
    let place = feature
        .property("place")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let geometry = feature.geometry.as_ref()?;
    let Value::Point(coords) = &geometry.value else {
        return None;
    };
    if coords.len() < 2 {
        return None;
    }

    Some(EarthquakeRecord {
        timestamp: time_ms / 1000.0,
        magnitude,
        longitude: coords[0],
        latitude: coords[1],
        depth_km: coords.get(2).copied().unwrap_or(0.0),
        place,
    })
}

/// Load coastline (or any outline) GeoJSON as lon/lat polylines
pub fn load_coastlines(path: &Path) -> Result<Vec<LineString>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading coastlines {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing coastlines {}", path.display()))?;

    let mut lines = Vec::new();
    process_geojson_lines(&geojson, |line| lines.push(line));
    tracing::info!(count = lines.len(), path = %path.display(), "loaded coastlines");
    Ok(lines)
}

/// Process GeoJSON and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    let to_line = |coords: &[Vec<f64>]| -> LineString {
        coords
            .iter()
            .filter_map(|c| match c.as_slice() {
                [lon, lat, ..] => Some((*lon, *lat)),
                _ => None,
            })
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_line(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "mag": 8.8, "time": 1267246800000, "place": "offshore Bio-Bio, Chile"
                },
                "geometry": { "type": "Point", "coordinates": [-72.733, -35.909, 22.9] }
            },
            {
                "type": "Feature",
                "properties": {
                    "mag": 9.1,
                    "time": 1299822000000,
                    "place": "near the east coast of Honshu, Japan"
                },
                "geometry": { "type": "Point", "coordinates": [142.373, 38.297, 29.0] }
            },
            {
                "type": "Feature",
                "properties": { "mag": null, "time": 1300000000000 },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            },
            {
                "type": "Feature",
                "properties": { "mag": 7.0, "time": 1263000000000 },
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_catalog() {
        let records = parse_catalog(CATALOG).unwrap();
        assert_eq!(records.len(), 2);

        let chile = &records[0];
        assert_eq!(chile.magnitude, 8.8);
        assert_eq!(chile.timestamp, 1267246800.0);
        assert_eq!(chile.latitude, -35.909);
        assert_eq!(chile.longitude, -72.733);
        assert_eq!(chile.depth_km, 22.9);
        assert_eq!(chile.place.as_deref(), Some("offshore Bio-Bio, Chile"));

        assert!(records[0].timestamp < records[1].timestamp);
    }

    #[test]
    fn test_bare_geometry_is_rejected() {
        let doc = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        assert!(parse_catalog(doc).is_err());
    }

    #[test]
    fn test_polygon_exteriors_become_lines() {
        let doc = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[0, 0], [10, 0], [10, 10], [0, 0]]],
                [[[20, 20], [30, 20], [30, 30], [20, 20]], [[22, 22], [23, 22], [22, 23], [22, 22]]]
            ]
        }"#;
        let geojson: GeoJson = doc.parse().unwrap();
        let mut lines = Vec::new();
        process_geojson_lines(&geojson, |l| lines.push(l));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1][0], (20.0, 20.0));
    }
}
