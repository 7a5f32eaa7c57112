//! Azimuthal equidistant staging projection.
//!
//! Used only to measure true ground distances around a scene center when
//! equalizing the pixel size of geographic output grids; the projected
//! coordinates are discarded afterwards. A spherical model is sufficient
//! for that purpose, so this follows Snyder's spherical oblique form
//! (eqs. 25-1..25-4) on the mean Earth radius.

/// Mean Earth radius (meters).
const EARTH_RADIUS: f64 = 6_371_008.8;

/// Azimuthal equidistant projection centered on a scene.
#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    /// Projection center latitude in radians.
    lat0: f64,
    /// Projection center longitude in radians.
    lon0: f64,
}

impl AzimuthalEquidistant {
    /// Center the projection on a geographic coordinate (degrees).
    pub fn centered_on(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat0: lat_deg.to_radians(),
            lon0: lon_deg.to_radians(),
        }
    }

    /// Forward transform: geographic degrees to meters from the center.
    ///
    /// Distances from the center are true by construction, which is the
    /// property the pixel-size equalization relies on.
    pub fn forward(&self, lat_deg: f64, lon_deg: f64) -> (f64, f64) {
        let lat = lat_deg.to_radians();
        let dlon = lon_deg.to_radians() - self.lon0;

        let cos_c =
            self.lat0.sin() * lat.sin() + self.lat0.cos() * lat.cos() * dlon.cos();
        let c = cos_c.clamp(-1.0, 1.0).acos();

        // k' -> 1 as c -> 0; the center itself maps to the origin.
        let k = if c.abs() < 1e-12 { 1.0 } else { c / c.sin() };

        let x = EARTH_RADIUS * k * lat.cos() * dlon.sin();
        let y = EARTH_RADIUS
            * k
            * (self.lat0.cos() * lat.sin() - self.lat0.sin() * lat.cos() * dlon.cos());
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_origin() {
        let proj = AzimuthalEquidistant::centered_on(38.0, -104.0);
        let (x, y) = proj.forward(38.0, -104.0);
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
    }

    #[test]
    fn test_distance_along_meridian_is_true() {
        // 1 degree of latitude on the sphere is R * pi / 180.
        let proj = AzimuthalEquidistant::centered_on(38.0, -104.0);
        let (x, y) = proj.forward(39.0, -104.0);
        let expected = EARTH_RADIUS * std::f64::consts::PI / 180.0;
        assert!(x.abs() < 1e-6);
        assert!((y - expected).abs() < 1e-6, "y {} expected {}", y, expected);
    }

    #[test]
    fn test_distance_from_center_is_true_off_axis() {
        let proj = AzimuthalEquidistant::centered_on(0.0, 0.0);
        let (x, y) = proj.forward(1.0, 1.0);
        let dist = (x * x + y * y).sqrt();
        // Great-circle distance for (1,1) degrees from the origin.
        let c = (1f64.to_radians().cos() * 1f64.to_radians().cos()).acos();
        assert!((dist - EARTH_RADIUS * c).abs() < 1e-6);
    }

    #[test]
    fn test_east_is_positive_x() {
        let proj = AzimuthalEquidistant::centered_on(45.0, 10.0);
        let (x, _) = proj.forward(45.0, 11.0);
        assert!(x > 0.0);
    }
}
