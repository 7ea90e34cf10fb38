//! Input records.

/// Time on the dataset's clock, in seconds (Unix seconds for USGS catalogs)
pub type Seconds = f64;

/// One seismic event as handed over by the loader
#[derive(Clone, Debug, PartialEq)]
pub struct EarthquakeRecord {
    pub timestamp: Seconds,
    pub magnitude: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: f64,
    pub place: Option<String>,
}

impl EarthquakeRecord {
    pub fn new(timestamp: Seconds, magnitude: f64, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            magnitude,
            latitude,
            longitude,
            depth_km: 0.0,
            place: None,
        }
    }
}
