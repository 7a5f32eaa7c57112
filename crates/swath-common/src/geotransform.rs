//! Six-parameter affine geotransform.
//!
//! Follows the GDAL convention: `(origin_x, pixel_width, row_rotation,
//! origin_y, col_rotation, pixel_height)` with the origin at the upper-left
//! corner of the upper-left pixel and a negative pixel height for north-up
//! rasters.

use serde::{Deserialize, Serialize};

/// Affine mapping from pixel/line indices to projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Build a north-up, square-pixel geotransform from an upper-left origin
    /// and a single pixel size.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_size: f64) -> Self {
        Self {
            origin_x,
            pixel_width: pixel_size,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height: -pixel_size,
        }
    }

    /// Construct from the 6-element array ordering used by raster metadata.
    pub fn from_array(gt: [f64; 6]) -> Self {
        Self {
            origin_x: gt[0],
            pixel_width: gt[1],
            row_rotation: gt[2],
            origin_y: gt[3],
            col_rotation: gt[4],
            pixel_height: gt[5],
        }
    }

    /// Map a (col, row) pixel position to projected coordinates.
    ///
    /// Fractional positions are allowed; `(col + 0.5, row + 0.5)` addresses
    /// a pixel center.
    pub fn pixel_to_world(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Map projected coordinates back to a fractional (col, row) position.
    ///
    /// Returns `None` for rotated geotransforms or zero-sized pixels; all
    /// rasters this tool produces or consumes are axis-aligned.
    pub fn world_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.row_rotation != 0.0 || self.col_rotation != 0.0 {
            return None;
        }
        if self.pixel_width == 0.0 || self.pixel_height == 0.0 {
            return None;
        }
        let col = (x - self.origin_x) / self.pixel_width;
        let row = (y - self.origin_y) / self.pixel_height;
        Some((col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_north_up_sign_convention() {
        let gt = GeoTransform::north_up(500000.0, 4100000.0, 70.0);
        assert_eq!(gt.pixel_width, 70.0);
        assert_eq!(gt.pixel_height, -70.0);
        assert_eq!(gt.row_rotation, 0.0);
    }

    #[test]
    fn test_pixel_world_roundtrip() {
        let gt = GeoTransform::north_up(-105.0, 42.0, 0.001);
        let (x, y) = gt.pixel_to_world(10.5, 20.5);
        let (col, row) = gt.world_to_pixel(x, y).unwrap();
        assert!((col - 10.5).abs() < 1e-9);
        assert!((row - 20.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_array_ordering() {
        let gt = GeoTransform::from_array([1.0, 2.0, 0.0, 3.0, 0.0, -2.0]);
        assert_eq!(gt.origin_x, 1.0);
        assert_eq!(gt.pixel_width, 2.0);
        assert_eq!(gt.origin_y, 3.0);
        assert_eq!(gt.pixel_height, -2.0);
    }

    #[test]
    fn test_rotated_transform_not_invertible() {
        let mut gt = GeoTransform::north_up(0.0, 0.0, 1.0);
        gt.row_rotation = 0.5;
        assert!(gt.world_to_pixel(1.0, 1.0).is_none());
    }
}
