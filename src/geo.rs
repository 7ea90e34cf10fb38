//! Geographic coordinates and their two world-space embeddings.
//!
//! A point maps to `(lon, lat, 0)` in radians on the flat map and to a unit vector
//! on the globe, with +Y through the north pole and longitude 0 facing +Z.
//! [`DualPosition`] keeps both so a marker can be re-blended every frame.

use glam::DVec3;

use crate::error::SurfaceError;

/// Latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Validate and build a coordinate. Latitude must lie in [-90, 90] and
    /// longitude in [-180, 180]; NaN and infinities are rejected.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, SurfaceError> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if lat_ok && lon_ok {
            Ok(Self { latitude, longitude })
        } else {
            Err(SurfaceError::InvalidCoordinate { latitude, longitude })
        }
    }

    #[inline(always)]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline(always)]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// The two placements of one geographic point: on the flat map and on the sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualPosition {
    pub planar: DVec3,
    pub spherical: DVec3,
}

impl DualPosition {
    /// Interpolate between the map (t = 0) and globe (t = 1) placements.
    #[inline(always)]
    pub fn blend(&self, t: f64) -> DVec3 {
        self.planar.lerp(self.spherical, t)
    }
}

/// Convert lat/lon (degrees) to a point on the unit sphere.
///
/// Latitude 90° is the +Y pole and longitude 0° faces +Z, so the texture seam
/// sits at ±180° on the far side of the globe.
#[inline(always)]
pub fn to_spherical(lat: f64, lon: f64) -> DVec3 {
    // Snap the poles so every pole vertex is bit-identical regardless of longitude
    if lat >= 90.0 {
        return DVec3::Y;
    }
    if lat <= -90.0 {
        return DVec3::NEG_Y;
    }

    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    DVec3::new(cos_lat * sin_lon, sin_lat, cos_lat * cos_lon)
}

/// Equirectangular placement: radians straight onto the XY plane, origin at (0°, 0°).
#[inline(always)]
pub fn to_planar(lat: f64, lon: f64) -> DVec3 {
    DVec3::new(lon.to_radians(), lat.to_radians(), 0.0)
}

/// Both placements from the same coordinate.
#[inline]
pub fn dual_position(coord: GeoCoordinate) -> DualPosition {
    DualPosition {
        planar: to_planar(coord.latitude, coord.longitude),
        spherical: to_spherical(coord.latitude, coord.longitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_origin_faces_positive_z() {
        let p = to_spherical(0.0, 0.0);
        assert!((p - DVec3::Z).length() < EPS);
        assert_eq!(to_planar(0.0, 0.0), DVec3::ZERO);
    }

    #[test]
    fn test_north_pole_ignores_longitude() {
        for lon in [-180.0, -97.5, 0.0, 45.0, 180.0] {
            assert_eq!(to_spherical(90.0, lon), DVec3::Y);
            assert_eq!(to_spherical(-90.0, lon), DVec3::NEG_Y);
        }
    }

    #[test]
    fn test_east_is_positive_x() {
        let p = to_spherical(0.0, 90.0);
        assert!((p - DVec3::X).length() < EPS);
        let q = to_planar(0.0, 90.0);
        assert!((q.x - std::f64::consts::FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(GeoCoordinate::new(90.5, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, -180.01).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_blend_endpoints() {
        let dual = dual_position(GeoCoordinate::new(35.0, 139.7).unwrap());
        assert_eq!(dual.blend(0.0), dual.planar);
        assert!((dual.blend(1.0) - dual.spherical).length() < EPS);
        assert_eq!(dual.planar.z, 0.0);
    }

    proptest! {
        #[test]
        fn spherical_is_unit_length(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            prop_assert!((to_spherical(lat, lon).length() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn seam_is_continuous(lat in -90.0f64..=90.0) {
            let east = to_spherical(lat, 180.0);
            let west = to_spherical(lat, -180.0);
            prop_assert!((east - west).length() < 1e-9);
        }

        #[test]
        fn planar_stays_on_plane(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let p = to_planar(lat, lon);
            prop_assert_eq!(p.z, 0.0);
            prop_assert!(p.x.abs() <= std::f64::consts::PI + 1e-12);
            prop_assert!(p.y.abs() <= std::f64::consts::FRAC_PI_2 + 1e-12);
        }
    }
}
