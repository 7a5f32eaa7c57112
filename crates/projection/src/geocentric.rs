//! Geocentric coordinates for distance queries.
//!
//! Nearest-neighbor search between swath pixels and grid cell centers runs
//! in 3-D geocentric space on a sphere, so distances stay meaningful across
//! the antimeridian and near the poles. Chord length and arc length differ
//! by less than a micrometer at the few-hundred-meter search radii this
//! tool uses.

/// Mean Earth radius (meters).
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Convert a geographic coordinate (degrees) to geocentric XYZ meters.
pub fn geo_to_xyz(lat_deg: f64, lon_deg: f64) -> [f64; 3] {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();
    [
        EARTH_RADIUS * lat.cos() * lon.cos(),
        EARTH_RADIUS * lat.cos() * lon.sin(),
        EARTH_RADIUS * lat.sin(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_prime_meridian() {
        let p = geo_to_xyz(0.0, 0.0);
        assert!((p[0] - EARTH_RADIUS).abs() < 1e-6);
        assert!(p[1].abs() < 1e-6);
        assert!(p[2].abs() < 1e-6);
    }

    #[test]
    fn test_pole() {
        let p = geo_to_xyz(90.0, 45.0);
        assert!(p[0].abs() < 1e-6);
        assert!((p[2] - EARTH_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn test_small_separation_chord_length() {
        // ~111 m per 0.001 degree of latitude.
        let a = geo_to_xyz(40.0, -105.0);
        let b = geo_to_xyz(40.001, -105.0);
        let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();
        assert!((d - 111.2).abs() < 0.5, "chord {}", d);
    }

    #[test]
    fn test_antimeridian_neighbors_are_close() {
        let a = geo_to_xyz(10.0, 179.999);
        let b = geo_to_xyz(10.0, -179.999);
        let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt();
        assert!(d < 300.0, "antimeridian chord {}", d);
    }
}
