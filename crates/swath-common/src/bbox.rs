//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For geographic extents coordinates are in degrees; for projected extents
/// (UTM, azimuthal equidistant) they are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when either axis has zero or non-finite span.
    ///
    /// A degenerate extent cannot define an output grid: the span appears
    /// when geolocation is missing (NaN) or the scene collapses to a single
    /// geolocated point.
    pub fn is_degenerate(&self) -> bool {
        let w = self.width();
        let h = self.height();
        !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_height() {
        let bbox = BoundingBox::new(-125.0, 24.0, -66.0, 50.0);
        assert_eq!(bbox.width(), 59.0);
        assert_eq!(bbox.height(), 26.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(BoundingBox::new(1.0, 2.0, 1.0, 3.0).is_degenerate());
        assert!(BoundingBox::new(f64::NAN, 2.0, 1.0, 3.0).is_degenerate());
        assert!(!BoundingBox::new(1.0, 2.0, 2.0, 3.0).is_degenerate());
    }
}
