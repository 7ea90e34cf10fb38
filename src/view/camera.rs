use glam::{DQuat, DVec3};
use std::f64::consts::PI;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 8.0;
const ZOOM_STEP: f64 = 1.25;

/// Orthographic camera over the blended surface.
///
/// Orientation is the drag rotation composed with the axial tilt. It is applied
/// only in proportion to the blend factor, so the flat map always faces the viewer
/// and the globe picks up the full rotation.
#[derive(Clone)]
pub struct Camera {
    /// Accumulated user rotation, applied in screen space
    drag: DQuat,
    tilt: DQuat,
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Camera {
    /// `axial_tilt_deg` rotates the globe about the view axis (−23.4 for Earth).
    pub fn new(axial_tilt_deg: f64, width: usize, height: usize) -> Self {
        Self {
            drag: DQuat::IDENTITY,
            tilt: DQuat::from_rotation_z(axial_tilt_deg.to_radians()),
            zoom: 1.0,
            width,
            height,
        }
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Full globe orientation
    pub fn orientation(&self) -> DQuat {
        self.drag * self.tilt
    }

    /// Orientation at a blend factor: identity on the map, full rotation on the globe.
    pub fn rotation_at(&self, blend: f64) -> DQuat {
        if blend <= 0.0 {
            DQuat::IDENTITY
        } else if blend >= 1.0 {
            self.orientation()
        } else {
            DQuat::IDENTITY.slerp(self.orientation(), blend)
        }
    }

    /// Braille pixels per world unit. The map fits its 2π × π extent, the globe its
    /// unit radius, and the scale follows the blend between the two.
    pub fn pixels_per_unit(&self, blend: f64) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        let map = (w / (2.0 * PI)).min(h / PI) * 0.95;
        let globe = w.min(h) / 2.0 * 0.9;
        (map + (globe - map) * blend.clamp(0.0, 1.0)) * self.zoom
    }

    /// Project a blended world position to screen pixels, given the frame's
    /// `rotation_at(blend)` and `pixels_per_unit(blend)`.
    /// Returns `None` for points on the far side once the surface is mostly a globe.
    #[inline]
    pub fn project_with(
        &self,
        rotation: DQuat,
        scale: f64,
        world: DVec3,
        blend: f64,
    ) -> Option<(i32, i32)> {
        let p = rotation * world;
        if blend >= 0.5 && p.z < 0.0 {
            return None;
        }
        if !p.is_finite() {
            return None;
        }

        let px = (self.width as f64 / 2.0 + p.x * scale) as i32;
        let py = (self.height as f64 / 2.0 - p.y * scale) as i32;
        Some((px, py))
    }

    /// Rotate by yaw (about screen Y) then pitch (about screen X), in radians.
    pub fn rotate(&mut self, yaw: f64, pitch: f64) {
        if !yaw.is_finite() || !pitch.is_finite() {
            return;
        }
        let step = DQuat::from_rotation_x(pitch) * DQuat::from_rotation_y(yaw);
        self.drag = (step * self.drag).normalize();
    }

    /// Rotate by a pixel drag delta so the surface follows the cursor.
    pub fn rotate_drag(&mut self, dx: i32, dy: i32) {
        let radius = self.pixels_per_unit(1.0).max(1.0);
        self.rotate(dx as f64 / radius, dy as f64 / radius);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Drop the user rotation and zoom, keeping the tilt
    pub fn reset(&mut self) {
        self.drag = DQuat::IDENTITY;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_globe::{to_planar, to_spherical};

    impl Camera {
        fn project(&self, world: DVec3, blend: f64) -> Option<(i32, i32)> {
            let (rotation, scale) = (self.rotation_at(blend), self.pixels_per_unit(blend));
            self.project_with(rotation, scale, world, blend)
        }
    }

    #[test]
    fn test_map_ignores_rotation() {
        let mut cam = Camera::new(-23.4, 200, 100);
        cam.rotate(0.7, -0.3);
        let origin = to_planar(0.0, 0.0);
        assert_eq!(cam.project(origin, 0.0), Some((100, 50)));

        let east = cam.project(to_planar(0.0, 90.0), 0.0).unwrap();
        assert!(east.0 > 100);
        assert_eq!(east.1, 50);
    }

    #[test]
    fn test_map_fits_canvas() {
        let cam = Camera::new(0.0, 200, 100);
        for (lat, lon) in [(90.0, -180.0), (-90.0, 180.0)] {
            let (px, py) = cam.project(to_planar(lat, lon), 0.0).unwrap();
            assert!((0..200).contains(&px), "{px}");
            assert!((0..100).contains(&py), "{py}");
        }
    }

    #[test]
    fn test_globe_front_and_back() {
        let cam = Camera::new(0.0, 100, 100);
        assert_eq!(cam.project(to_spherical(0.0, 0.0), 1.0), Some((50, 50)));
        assert!(cam.project(to_spherical(0.0, 180.0), 1.0).is_none());
        // North pole sits at the top of the disk
        let (_, py) = cam.project(to_spherical(90.0, 0.0), 1.0).unwrap();
        assert!(py < 10);
    }

    #[test]
    fn test_no_culling_on_map_side() {
        let cam = Camera::new(0.0, 100, 100);
        assert!(cam.project(to_spherical(0.0, 180.0), 0.4).is_some());
    }

    #[test]
    fn test_tilt_leans_pole() {
        let cam = Camera::new(-23.4, 100, 100);
        let (px, _) = cam.project(to_spherical(90.0, 0.0), 1.0).unwrap();
        // Negative rotation about Z swings +Y towards +X
        assert!(px > 50);
    }

    #[test]
    fn test_drag_follows_cursor() {
        let mut cam = Camera::new(0.0, 100, 100);
        cam.rotate_drag(10, 0);
        let (px, py) = cam.project(to_spherical(0.0, 0.0), 1.0).unwrap();
        assert!(px > 50);
        assert_eq!(py, 50);

        let mut cam = Camera::new(0.0, 100, 100);
        cam.rotate_drag(0, 10);
        let (_, py) = cam.project(to_spherical(0.0, 0.0), 1.0).unwrap();
        assert!(py > 50);
    }

    #[test]
    fn test_zoom_clamps_and_resets() {
        let mut cam = Camera::new(0.0, 100, 100);
        for _ in 0..50 {
            cam.zoom_in();
        }
        assert_eq!(cam.zoom, MAX_ZOOM);
        for _ in 0..50 {
            cam.zoom_out();
        }
        assert_eq!(cam.zoom, MIN_ZOOM);
        cam.rotate(1.0, 1.0);
        cam.reset();
        assert_eq!(cam.zoom, 1.0);
        assert_eq!(cam.orientation(), cam.tilt);
    }

    #[test]
    fn test_scale_blends() {
        let cam = Camera::new(0.0, 200, 100);
        let map = cam.pixels_per_unit(0.0);
        let globe = cam.pixels_per_unit(1.0);
        let mid = cam.pixels_per_unit(0.5);
        assert!((mid - (map + globe) / 2.0).abs() < 1e-9);
    }
}
