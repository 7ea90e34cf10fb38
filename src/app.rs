use anyhow::Result;
use chrono::DateTime;

use crate::view::{Camera, SceneLayers, SceneRenderer};
use quake_globe::data::LineString;
use quake_globe::{EarthSurface, EarthquakeRecord, MorphMode, Playback, SurfaceConfig};

/// One hour of catalog time per real second
const MIN_SPEED: f64 = 60.0 * 60.0;
/// Five years of catalog time per real second
const MAX_SPEED: f64 = 5.0 * 365.0 * 24.0 * 60.0 * 60.0;
const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;
/// Radians per arrow-key press
const ROTATE_STEP: f64 = 0.15;

/// Application state
pub struct App {
    pub surface: EarthSurface,
    pub playback: Playback,
    pub camera: Camera,
    pub renderer: SceneRenderer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    pub spawned_total: usize,
    pub rejected_total: usize,
    pub expired_total: usize,
}

impl App {
    pub fn new(
        config: &SurfaceConfig,
        records: Vec<EarthquakeRecord>,
        coastlines: &[LineString],
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let surface = EarthSurface::initialize(config)?;
        let playback = Playback::new(records, &config.playback, surface.lifespan());
        let renderer = SceneRenderer::new(surface.mesh(), coastlines);
        let (pixel_width, pixel_height) = map_pixels(width, height);

        tracing::info!(
            records = playback.records().len(),
            coastlines = coastlines.len(),
            "app ready"
        );

        Ok(Self {
            surface,
            playback,
            camera: Camera::new(config.axial_tilt_deg, pixel_width, pixel_height),
            renderer,
            should_quit: false,
            last_mouse: None,
            spawned_total: 0,
            rejected_total: 0,
            expired_total: 0,
        })
    }

    /// Advance playback and the surface by `dt` real seconds.
    pub fn update(&mut self, dt: f64) {
        let released = self.playback.advance(dt);
        if released.wrapped {
            tracing::debug!(cleared = self.surface.len(), "playback looped");
            self.surface.clear();
        }
        let report = self.surface.spawn_all(released.records);
        self.spawned_total += report.spawned;
        self.rejected_total += report.rejected;

        let tick = self.surface.tick(self.playback.now(), dt);
        self.expired_total += tick.expired;
        if tick.dropped > 0 {
            tracing::debug!(dropped = tick.dropped, "markers dropped");
        }
    }

    /// Rasterize the current frame for a map area of `width` x `height` cells.
    pub fn render_layers(&mut self, width: usize, height: usize) -> SceneLayers {
        self.camera.set_size(width * 2, height * 4);
        self.renderer.render(&self.surface, &self.camera, width, height)
    }

    /// Update camera size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (w, h) = map_pixels(width, height);
        self.camera.set_size(w, h);
    }

    pub fn toggle_mode(&mut self) {
        let next = self.surface.mode().toggled();
        tracing::debug!(?next, "morph target");
        self.surface.toggle_mode(next);
    }

    pub fn toggle_wireframe(&mut self) {
        self.renderer.settings.show_wireframe = !self.renderer.settings.show_wireframe;
    }

    pub fn toggle_coastlines(&mut self) {
        self.renderer.settings.show_coastlines = !self.renderer.settings.show_coastlines;
    }

    /// Rotate with the keyboard; `dx`/`dy` are step counts
    pub fn rotate(&mut self, dx: i32, dy: i32) {
        self.camera.rotate(dx as f64 * ROTATE_STEP, dy as f64 * ROTATE_STEP);
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    pub fn faster(&mut self) {
        self.playback.set_speed((self.playback.speed() * 2.0).min(MAX_SPEED));
    }

    pub fn slower(&mut self) {
        self.playback.set_speed((self.playback.speed() / 2.0).max(MIN_SPEED));
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle mouse drag. Terminal cells are 2x4 braille pixels.
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (x as i32 - last_x as i32) * 2;
            let dy = (y as i32 - last_y as i32) * 4;
            self.camera.rotate_drag(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Morph status as "Globe 100%" / "→ Map 40%"
    pub fn mode_label(&self) -> String {
        let name = match self.surface.mode() {
            MorphMode::Map => "Map",
            MorphMode::Globe => "Globe",
        };
        let pct = (self.surface.blend() * 100.0).round();
        if self.surface.is_morphing() {
            format!("→ {name} {pct:.0}%")
        } else {
            format!("{name} {pct:.0}%")
        }
    }

    /// Playback clock as a UTC date
    pub fn date_label(&self) -> String {
        let now = self.playback.now();
        if !now.is_finite() {
            return "----------".to_string();
        }
        DateTime::from_timestamp(now.floor() as i64, 0)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format!("t={now:.0}"))
    }

    pub fn speed_label(&self) -> String {
        format!("{:.1}d/s", self.playback.speed() / SECONDS_PER_DAY)
    }
}

/// Braille pixel size of the map area: border takes 2 columns, border plus status
/// bar take 3 rows.
fn map_pixels(width: usize, height: usize) -> (usize, usize) {
    (width.saturating_sub(2) * 2, height.saturating_sub(3) * 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_globe::config::PlaybackConfig;

    fn app(records: Vec<EarthquakeRecord>, lifespan: f64) -> App {
        let mut config = SurfaceConfig {
            playback: PlaybackConfig { speed: 1.0, looping: true },
            ..Default::default()
        };
        config.marker.lifespan = lifespan;
        App::new(&config, records, &[], 80, 24).unwrap()
    }

    #[test]
    fn test_update_spawns_due_records() {
        let records = vec![
            EarthquakeRecord::new(0.0, 5.0, 10.0, 10.0),
            EarthquakeRecord::new(5.0, 7.5, 20.0, 20.0),
        ];
        let mut app = app(records, 100.0);
        app.update(1.0);
        assert_eq!(app.surface.len(), 1);
        app.update(5.0);
        assert_eq!(app.surface.len(), 2);
        assert_eq!(app.spawned_total, 2);
    }

    #[test]
    fn test_loop_clears_previous_pass() {
        let records = vec![EarthquakeRecord::new(0.0, 5.0, 0.0, 0.0)];
        let mut app = app(records, 10.0);
        app.update(1.0);
        assert_eq!(app.surface.len(), 1);
        // At the end of the tail the marker expires; one step later the clock wraps
        // and spawns it again
        app.update(9.0);
        assert_eq!(app.surface.len(), 0);
        assert_eq!(app.expired_total, 1);
        assert!(!app.playback.wrapped());
        app.update(1.0);
        assert_eq!(app.surface.len(), 1);
        assert_eq!(app.spawned_total, 2);
    }

    #[test]
    fn test_toggle_mode_morphs_over_time() {
        let mut app = app(Vec::new(), 10.0);
        app.toggle_mode();
        assert!(app.mode_label().starts_with('→'));
        app.update(0.5);
        assert!(app.surface.blend() > 0.0);
        app.update(5.0);
        assert_eq!(app.mode_label(), "Globe 100%");
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut app = app(Vec::new(), 10.0);
        app.slower();
        assert_eq!(app.playback.speed(), MIN_SPEED);
        for _ in 0..40 {
            app.faster();
        }
        assert_eq!(app.playback.speed(), MAX_SPEED);
    }

    #[test]
    fn test_date_label() {
        let records = vec![EarthquakeRecord::new(1_300_000_000.0, 9.1, 38.3, 142.4)];
        let app = app(records, 10.0);
        assert_eq!(app.date_label(), "2011-03-13");
    }
}
