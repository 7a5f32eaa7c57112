//! Swath geolocation: per-pixel lat/lon arrays and the scene extent.

use swath_common::BoundingBox;

use crate::error::{Result, SwathGridError};

/// Paired latitude/longitude arrays describing a swath's geometry.
///
/// Row-major, same indexing as the data layers they geolocate. Pixels with
/// non-finite or out-of-range coordinates are treated as invalid: they are
/// excluded from extent computation and never fed to projection math.
#[derive(Debug, Clone)]
pub struct GeolocationField {
    lats: Vec<f64>,
    lons: Vec<f64>,
    height: usize,
    width: usize,
}

impl GeolocationField {
    /// Wrap lat/lon arrays of shape `(height, width)`.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>, height: usize, width: usize) -> Result<Self> {
        let expected = height * width;
        if lats.len() != expected {
            return Err(SwathGridError::DimensionMismatch {
                expected,
                actual: lats.len(),
            });
        }
        if lons.len() != expected {
            return Err(SwathGridError::DimensionMismatch {
                expected,
                actual: lons.len(),
            });
        }
        Ok(Self {
            lats,
            lons,
            height,
            width,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of swath pixels, valid or not.
    pub fn len(&self) -> usize {
        self.lats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lats.is_empty()
    }

    /// Coordinate of the pixel at flat index `i` (lat, lon).
    pub fn coord(&self, i: usize) -> (f64, f64) {
        (self.lats[i], self.lons[i])
    }

    /// Whether the pixel at flat index `i` has usable geolocation.
    pub fn is_valid(&self, i: usize) -> bool {
        let lat = self.lats[i];
        let lon = self.lons[i];
        lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon)
    }

    /// Derive the scene extent and center from this field.
    pub fn extent(&self) -> Result<SceneExtent> {
        SceneExtent::from_field(self)
    }
}

/// Geographic bounding box of a swath plus a representative center
/// coordinate for projection selection.
#[derive(Debug, Clone, Copy)]
pub struct SceneExtent {
    pub bbox: BoundingBox,
    pub center_lat: f64,
    pub center_lon: f64,
}

impl SceneExtent {
    /// Compute the extent over valid pixels only.
    ///
    /// The center is the midpoint pixel at `(H/2 - 1, W/2 - 1)` (truncating
    /// division), not a centroid; when that pixel's geolocation is invalid
    /// the first valid pixel stands in. Fails with `DegenerateExtent` when
    /// no valid pixel exists or the extent collapses to zero span.
    pub fn from_field(field: &GeolocationField) -> Result<Self> {
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut first_valid = None;

        for i in 0..field.len() {
            if !field.is_valid(i) {
                continue;
            }
            let (lat, lon) = field.coord(i);
            min_lat = min_lat.min(lat);
            max_lat = max_lat.max(lat);
            min_lon = min_lon.min(lon);
            max_lon = max_lon.max(lon);
            if first_valid.is_none() {
                first_valid = Some(i);
            }
        }

        let first_valid = first_valid.ok_or_else(|| {
            SwathGridError::DegenerateExtent("no valid geolocation pixels".to_string())
        })?;

        let bbox = BoundingBox::new(min_lon, min_lat, max_lon, max_lat);
        if bbox.is_degenerate() {
            return Err(SwathGridError::DegenerateExtent(format!(
                "zero or non-finite span: lon {}..{}, lat {}..{}",
                bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y
            )));
        }

        let mid_row = field.height() / 2 - usize::from(field.height() >= 2);
        let mid_col = field.width() / 2 - usize::from(field.width() >= 2);
        let mid = mid_row * field.width() + mid_col;
        let center = if field.is_valid(mid) { mid } else { first_valid };
        let (center_lat, center_lon) = field.coord(center);

        Ok(Self {
            bbox,
            center_lat,
            center_lon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_field(h: usize, w: usize) -> GeolocationField {
        let mut lats = Vec::with_capacity(h * w);
        let mut lons = Vec::with_capacity(h * w);
        for row in 0..h {
            for col in 0..w {
                lats.push(40.0 - row as f64 * 0.01);
                lons.push(-105.0 + col as f64 * 0.01);
            }
        }
        GeolocationField::new(lats, lons, h, w).unwrap()
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let r = GeolocationField::new(vec![0.0; 9], vec![0.0; 10], 2, 5);
        assert!(matches!(r, Err(SwathGridError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_extent_bbox() {
        let field = gradient_field(10, 10);
        let extent = field.extent().unwrap();
        assert!((extent.bbox.min_x + 105.0).abs() < 1e-12);
        assert!((extent.bbox.max_x + 105.0 - 0.09).abs() < 1e-12);
        assert!((extent.bbox.max_y - 40.0).abs() < 1e-12);
        assert!((extent.bbox.min_y - (40.0 - 0.09)).abs() < 1e-12);
    }

    #[test]
    fn test_center_is_midpoint_pixel() {
        let field = gradient_field(10, 10);
        let extent = field.extent().unwrap();
        // (H/2 - 1, W/2 - 1) = (4, 4)
        assert!((extent.center_lat - (40.0 - 0.04)).abs() < 1e-12);
        assert!((extent.center_lon - (-105.0 + 0.04)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_pixels_excluded() {
        let mut lats = vec![40.0, 40.1, f64::NAN, 140.0];
        let mut lons = vec![-105.0, -104.9, -104.8, -300.0];
        // Pad to 2x2 shape is already satisfied.
        let field = GeolocationField::new(std::mem::take(&mut lats), std::mem::take(&mut lons), 2, 2)
            .unwrap();
        let extent = field.extent().unwrap();
        assert!((extent.bbox.max_y - 40.1).abs() < 1e-12);
        assert!((extent.bbox.min_x + 105.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_nan_is_degenerate() {
        let field = GeolocationField::new(vec![f64::NAN; 4], vec![f64::NAN; 4], 2, 2).unwrap();
        assert!(matches!(
            field.extent(),
            Err(SwathGridError::DegenerateExtent(_))
        ));
    }

    #[test]
    fn test_single_point_is_degenerate() {
        let field =
            GeolocationField::new(vec![40.0; 4], vec![-105.0; 4], 2, 2).unwrap();
        assert!(matches!(
            field.extent(),
            Err(SwathGridError::DegenerateExtent(_))
        ));
    }
}
