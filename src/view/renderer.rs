use glam::DVec3;

use crate::braille::BrailleCanvas;
use crate::view::camera::Camera;
use crate::view::geometry::{draw_circle, draw_line};
use quake_globe::data::LineString;
use quake_globe::{
    dual_position, DualPosition, EarthSurface, GeoCoordinate, SeverityTier, SurfaceMesh,
};

/// Target spacing of graticule lines when the full wireframe is off
const GRATICULE_DEG: f64 = 30.0;

/// Display settings for scene layers
#[derive(Clone)]
pub struct DisplaySettings {
    /// Every mesh edge, diagonals included
    pub show_wireframe: bool,
    pub show_coastlines: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_wireframe: false,
            show_coastlines: true,
        }
    }
}

/// One canvas per colour, drawn back to front by the UI
pub struct SceneLayers {
    pub surface: BrailleCanvas,
    pub coastlines: BrailleCanvas,
    /// Indexed Minor, Moderate, Severe
    pub markers: [BrailleCanvas; 3],
}

impl SceneLayers {
    fn new(width: usize, height: usize) -> Self {
        Self {
            surface: BrailleCanvas::new(width, height),
            coastlines: BrailleCanvas::new(width, height),
            markers: [
                BrailleCanvas::new(width, height),
                BrailleCanvas::new(width, height),
                BrailleCanvas::new(width, height),
            ],
        }
    }
}

fn tier_layer(tier: SeverityTier) -> usize {
    match tier {
        SeverityTier::Minor => 0,
        SeverityTier::Moderate => 1,
        SeverityTier::Severe => 2,
    }
}

/// Rasterizes the blended surface, coastlines and markers.
///
/// Mesh edges and coastline endpoints are resolved to dual positions once; each
/// frame only blends and projects.
pub struct SceneRenderer {
    edges: Vec<(u32, u32)>,
    graticule: Vec<(u32, u32)>,
    coastlines: Vec<Vec<DualPosition>>,
    blended: Vec<DVec3>,
    pub settings: DisplaySettings,
}

impl SceneRenderer {
    pub fn new(mesh: &SurfaceMesh, coastlines: &[LineString]) -> Self {
        let mut edges = mesh.edges();
        let mut graticule = graticule_edges(mesh, &edges);
        let frame = pole_border_edges(mesh);
        edges.extend_from_slice(&frame);
        graticule.extend_from_slice(&frame);
        let coastlines = coastline_runs(coastlines);
        tracing::debug!(
            edges = edges.len(),
            graticule = graticule.len(),
            coastline_runs = coastlines.len(),
            "scene prepared"
        );

        Self {
            edges,
            graticule,
            coastlines,
            blended: Vec::with_capacity(mesh.vertex_count()),
            settings: DisplaySettings::default(),
        }
    }

    /// Render a frame. `width` and `height` are in terminal cells.
    pub fn render(
        &mut self,
        surface: &EarthSurface,
        camera: &Camera,
        width: usize,
        height: usize,
    ) -> SceneLayers {
        let mut layers = SceneLayers::new(width, height);
        let blend = surface.blend();
        let rotation = camera.rotation_at(blend);
        let scale = camera.pixels_per_unit(blend);
        let project = |p: DVec3| camera.project_with(rotation, scale, p, blend);

        surface.mesh().blend_vertices_into(blend, &mut self.blended);
        let edges = if self.settings.show_wireframe { &self.edges } else { &self.graticule };
        for &(a, b) in edges {
            let (Some(p0), Some(p1)) = (
                project(self.blended[a as usize]),
                project(self.blended[b as usize]),
            ) else {
                continue;
            };
            draw_line(&mut layers.surface, p0.0, p0.1, p1.0, p1.1);
        }

        if self.settings.show_coastlines {
            for run in &self.coastlines {
                let mut prev: Option<(i32, i32)> = None;
                for pos in run {
                    let cur = project(pos.blend(blend));
                    if let (Some(a), Some(b)) = (prev, cur) {
                        draw_line(&mut layers.coastlines, a.0, a.1, b.0, b.1);
                    }
                    prev = cur;
                }
            }
        }

        for (_, marker) in surface.markers() {
            let Some((px, py)) = project(marker.rendered_position()) else {
                continue;
            };
            let radius = (marker.scale() * scale).round().max(0.0) as i32;
            draw_circle(&mut layers.markers[tier_layer(marker.tier())], px, py, radius);
        }

        layers
    }
}

/// Mesh edges along every ~30° of latitude and longitude
fn graticule_edges(mesh: &SurfaceMesh, edges: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let row_step = ((mesh.rows() as f64 * GRATICULE_DEG / 180.0).round() as usize).max(1);
    let col_step = ((mesh.cols() as f64 * GRATICULE_DEG / 360.0).round() as usize).max(1);
    let stride = mesh.cols() + 1;

    edges
        .iter()
        .copied()
        .filter(|&(a, b)| {
            let (ra, ca) = (a as usize / stride, a as usize % stride);
            let (rb, cb) = (b as usize / stride, b as usize % stride);
            (ra == rb && ra % row_step == 0) || (ca == cb && ca % col_step == 0)
        })
        .collect()
}

/// The ±90° rows. Their cells lose the triangle that touches them, so the mesh
/// edges leave the map's top and bottom border open. On the globe each row
/// collapses onto its pole.
fn pole_border_edges(mesh: &SurfaceMesh) -> Vec<(u32, u32)> {
    let stride = mesh.cols() + 1;
    let last = mesh.rows() * stride;
    (0..mesh.cols())
        .flat_map(|c| [(c, c + 1), (last + c, last + c + 1)])
        .map(|(a, b)| (a as u32, b as u32))
        .collect()
}

/// Resolve outline points to dual positions, splitting a line wherever it jumps
/// across the antimeridian so the flat map never draws a segment across the world.
fn coastline_runs(lines: &[LineString]) -> Vec<Vec<DualPosition>> {
    let mut runs = Vec::new();
    for line in lines {
        let mut run: Vec<DualPosition> = Vec::new();
        let mut prev_lon: Option<f64> = None;
        for &(lon, lat) in line {
            let Ok(coord) = GeoCoordinate::new(lat, lon) else {
                continue;
            };
            if prev_lon.is_some_and(|p| (lon - p).abs() > 180.0) {
                let done = std::mem::take(&mut run);
                if done.len() >= 2 {
                    runs.push(done);
                }
            }
            run.push(dual_position(coord));
            prev_lon = Some(lon);
        }
        if run.len() >= 2 {
            runs.push(run);
        }
    }
    runs
}
