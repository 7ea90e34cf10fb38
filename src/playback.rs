//! Catalog playback clock.

use crate::config::PlaybackConfig;
use crate::record::{EarthquakeRecord, Seconds};

/// Records released by one [`Playback::advance`] call
#[derive(Debug)]
pub struct Released<'a> {
    pub records: &'a [EarthquakeRecord],
    /// The clock rewound to the start before these were released
    pub wrapped: bool,
}

/// Simulated clock over a finished, time-ordered catalog. Each `advance` hands back
/// the records that became due since the previous call, each exactly once.
pub struct Playback {
    records: Vec<EarthquakeRecord>,
    cursor: usize,
    now: Seconds,
    start: Seconds,
    end: Seconds,
    speed: f64,
    looping: bool,
    paused: bool,
    wrapped: bool,
}

impl Playback {
    /// `tail` keeps the clock running past the last record, normally one marker
    /// lifespan so the final markers can fade out before a loop restarts.
    pub fn new(
        mut records: Vec<EarthquakeRecord>,
        config: &PlaybackConfig,
        tail: Seconds,
    ) -> Self {
        let before = records.len();
        records.retain(|r| r.timestamp.is_finite());
        if records.len() < before {
            tracing::warn!(dropped = before - records.len(), "records without a usable timestamp");
        }
        records.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let start = records.first().map_or(0.0, |r| r.timestamp);
        let last = records.last().map_or(0.0, |r| r.timestamp);
        let tail = if tail.is_finite() { tail.max(0.0) } else { 0.0 };

        Self {
            records,
            cursor: 0,
            now: start,
            start,
            end: last + tail,
            speed: config.speed,
            looping: config.looping,
            paused: false,
            wrapped: false,
        }
    }

    /// Move the clock by `dt` real seconds and return the newly due records.
    pub fn advance(&mut self, dt: f64) -> Released<'_> {
        self.wrapped = false;
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return Released { records: &[], wrapped: false };
        }

        self.now += dt * self.speed;

        if self.now > self.end && self.looping && !self.records.is_empty() {
            tracing::debug!("playback reached the end of the catalog, rewinding");
            self.now = self.start;
            self.cursor = 0;
            self.wrapped = true;
        }

        let from = self.cursor;
        let now = self.now;
        self.cursor += self.records[from..].partition_point(|r| r.timestamp <= now);
        Released {
            records: &self.records[from..self.cursor],
            wrapped: self.wrapped,
        }
    }

    /// True if the last `advance` rewound to the start; live markers belong to the
    /// previous pass and should be cleared.
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn now(&self) -> Seconds {
        self.now
    }

    pub fn start(&self) -> Seconds {
        self.start
    }

    pub fn end(&self) -> Seconds {
        self.end
    }

    /// Fraction of the catalog time span played so far
    pub fn progress(&self) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return 1.0;
        }
        ((self.now - self.start) / span).clamp(0.0, 1.0)
    }

    /// Every record released and the clock past the tail
    pub fn is_finished(&self) -> bool {
        self.cursor == self.records.len() && self.now >= self.end
    }

    pub fn records(&self) -> &[EarthquakeRecord] {
        &self.records
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Negative or non-finite speeds are ignored
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_finite() && speed >= 0.0 {
            self.speed = speed;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(speed: f64, looping: bool) -> PlaybackConfig {
        PlaybackConfig { speed, looping }
    }

    fn records(times: &[f64]) -> Vec<EarthquakeRecord> {
        times.iter().map(|&t| EarthquakeRecord::new(t, 6.0, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_sorts_and_starts_at_first_record() {
        let p = Playback::new(records(&[30.0, 10.0, 20.0]), &config(1.0, false), 5.0);
        let times: Vec<f64> = p.records().iter().map(|r| r.timestamp).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
        assert_eq!(p.now(), 10.0);
        assert_eq!(p.end(), 35.0);
    }

    #[test]
    fn test_releases_each_record_once() {
        let catalog = records(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut p = Playback::new(catalog, &config(1.0, false), 0.0);
        let mut seen = Vec::new();
        for dt in [0.3, 0.9, 0.05, 2.0, 0.75, 10.0, 1.0] {
            seen.extend(p.advance(dt).records.iter().map(|r| r.timestamp));
        }
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(p.is_finished());
    }

    #[test]
    fn test_speed_scales_time() {
        let mut p = Playback::new(records(&[0.0, 100.0]), &config(50.0, false), 0.0);
        assert_eq!(p.advance(1.0).records.len(), 1);
        assert_eq!(p.now(), 50.0);
        assert_eq!(p.advance(1.0).records.len(), 1);
    }

    #[test]
    fn test_pause_stops_clock() {
        let mut p = Playback::new(records(&[0.0, 1.0]), &config(1.0, false), 0.0);
        p.advance(0.5);
        p.pause();
        assert!(p.advance(10.0).records.is_empty());
        assert_eq!(p.now(), 0.5);
        p.resume();
        assert_eq!(p.advance(1.0).records.len(), 1);
    }

    #[test]
    fn test_loops_after_tail() {
        let mut p = Playback::new(records(&[0.0, 1.0]), &config(1.0, true), 2.0);
        assert_eq!(p.advance(1.5).records.len(), 2);
        assert!(!p.wrapped());
        p.advance(1.0);
        assert!(!p.wrapped());
        // Past last + tail = 3.0
        let released = p.advance(1.0);
        assert!(released.wrapped);
        assert_eq!(released.records.len(), 1);
        assert!(p.wrapped());
        assert_eq!(p.now(), 0.0);
    }

    #[test]
    fn test_drops_non_finite_timestamps() {
        let p = Playback::new(records(&[f64::NAN, 3.0]), &config(1.0, false), 0.0);
        assert_eq!(p.records().len(), 1);
    }

    #[test]
    fn test_empty_catalog() {
        let mut p = Playback::new(Vec::new(), &config(1.0, true), 10.0);
        assert!(p.advance(100.0).records.is_empty());
        assert!(!p.wrapped());
        assert_eq!(p.progress(), 1.0);
    }

    #[test]
    fn test_progress() {
        let mut p = Playback::new(records(&[0.0, 10.0]), &config(1.0, false), 0.0);
        p.advance(2.5);
        assert!((p.progress() - 0.25).abs() < 1e-12);
    }
}
