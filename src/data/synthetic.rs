//! Built-in data for running without files.

use crate::data::LineString;
use crate::hash::SampleStream;
use crate::record::{EarthquakeRecord, Seconds};

/// Centres of the world's busiest seismic zones (lat, lon)
const SEISMIC_ZONES: [(f64, f64); 14] = [
    (38.3, 142.4),  // Japan trench
    (-6.0, 130.0),  // Banda arc
    (-20.0, -70.0), // Peru-Chile trench
    (-36.0, -73.0), // Central Chile
    (55.0, -160.0), // Aleutians
    (61.0, -147.0), // Alaska
    (14.0, -92.0),  // Central America
    (-22.0, -176.0), // Tonga
    (-41.0, 174.0), // New Zealand
    (3.3, 96.0),    // Sumatra
    (28.0, 85.0),   // Himalaya
    (38.0, 43.0),   // Anatolia
    (15.0, 121.0),  // Philippines
    (-6.0, 150.0),  // New Britain
];

/// Deterministic stand-in catalog for running without a data file.
///
/// Events cluster around known seismic zones; magnitudes follow a Gutenberg-Richter
/// tail above 5.0 (b = 1), so roughly 1% reach Moderate and 0.1% Severe.
pub fn synthetic_catalog(
    count: usize,
    start: Seconds,
    span: Seconds,
    seed: u64,
) -> Vec<EarthquakeRecord> {
    let mut rng = SampleStream::new(seed);

    let mut records: Vec<EarthquakeRecord> = (0..count)
        .map(|_| {
            let (zone_lat, zone_lon) = SEISMIC_ZONES[rng.next_index(SEISMIC_ZONES.len())];
            let latitude = (zone_lat + rng.next_range(-4.0, 4.0)).clamp(-90.0, 90.0);
            let mut longitude = zone_lon + rng.next_range(-6.0, 6.0);
            if longitude > 180.0 {
                longitude -= 360.0;
            } else if longitude < -180.0 {
                longitude += 360.0;
            }

            // 1 - u lies in (0, 1], keeping the log finite
            let u = 1.0 - rng.next_unit();
            let magnitude = (5.0 - u.log10()).min(9.5);

            EarthquakeRecord {
                timestamp: start + rng.next_unit() * span,
                magnitude,
                latitude,
                longitude,
                depth_km: rng.next_range(5.0, 70.0),
                place: None,
            }
        })
        .collect();

    records.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    records
}

/// Very coarse continent outlines for when no coastline file is available
pub fn simple_world_outline() -> Vec<LineString> {
    vec![
        // North America
        vec![
            (-166.0, 68.0), (-156.0, 71.0), (-128.0, 70.0), (-95.0, 72.0), (-80.0, 63.0),
            (-64.0, 60.0), (-56.0, 52.0), (-66.0, 44.0), (-76.0, 35.0), (-81.0, 25.0),
            (-90.0, 29.0), (-97.0, 26.0), (-105.0, 20.0), (-115.0, 30.0), (-124.0, 41.0),
            (-124.0, 48.0), (-135.0, 57.0), (-152.0, 58.0), (-166.0, 62.0), (-166.0, 68.0),
        ],
        // Central and South America
        vec![
            (-97.0, 19.0), (-87.0, 14.0), (-78.0, 8.0), (-72.0, 12.0), (-60.0, 9.0),
            (-50.0, 0.0), (-35.0, -6.0), (-41.0, -22.0), (-53.0, -34.0), (-66.0, -45.0),
            (-69.0, -55.0), (-75.0, -50.0), (-73.0, -37.0), (-70.0, -18.0), (-81.0, -5.0),
            (-80.0, 1.0), (-85.0, 10.0), (-97.0, 19.0),
        ],
        // Africa
        vec![
            (-17.0, 21.0), (-6.0, 36.0), (10.0, 37.0), (32.0, 31.0), (43.0, 12.0),
            (51.0, 11.0), (40.0, -15.0), (33.0, -28.0), (19.0, -35.0), (12.0, -17.0),
            (9.0, 4.0), (-8.0, 4.0), (-17.0, 14.0), (-17.0, 21.0),
        ],
        // Eurasia
        vec![
            (-9.0, 43.0), (-2.0, 49.0), (8.0, 54.0), (5.0, 61.0), (25.0, 71.0),
            (60.0, 69.0), (105.0, 77.0), (180.0, 69.0), (160.0, 60.0), (140.0, 52.0),
            (129.0, 35.0), (121.0, 30.0), (108.0, 21.0), (100.0, 14.0), (104.0, 1.0),
            (92.0, 21.0), (80.0, 8.0), (72.0, 21.0), (57.0, 25.0), (48.0, 30.0),
            (35.0, 36.0), (26.0, 38.0), (15.0, 38.0), (3.0, 43.0), (-9.0, 43.0),
        ],
        // Australia
        vec![
            (114.0, -22.0), (130.0, -12.0), (142.0, -11.0), (153.0, -27.0), (150.0, -37.0),
            (140.0, -38.0), (131.0, -31.0), (115.0, -34.0), (114.0, -22.0),
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid_and_sorted() {
        let records = synthetic_catalog(2_000, 1_000.0, 5_000.0, 9);
        assert_eq!(records.len(), 2_000);
        for r in &records {
            assert!((-90.0..=90.0).contains(&r.latitude));
            assert!((-180.0..=180.0).contains(&r.longitude));
            assert!((5.0..=9.5).contains(&r.magnitude));
            assert!((1_000.0..6_000.0).contains(&r.timestamp));
        }
        assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_catalog_is_reproducible() {
        assert_eq!(synthetic_catalog(50, 0.0, 1.0, 3), synthetic_catalog(50, 0.0, 1.0, 3));
    }

    #[test]
    fn test_outlines_are_closed() {
        for line in simple_world_outline() {
            assert_eq!(line.first(), line.last());
        }
    }
}
