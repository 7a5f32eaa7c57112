//! Product kind dispatch.

use crate::GeoTransform;

/// How a scene's layers are georeferenced.
///
/// Selected once when a scene is opened; downstream code dispatches on the
/// variant instead of re-checking filename substrings per layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductKind {
    /// Swath geometry: per-pixel lat/lon arrays, needs grid definition,
    /// nearest-neighbor correspondence, and resampling.
    Swath,
    /// Already gridded: the container embeds its own geotransform and
    /// projection text, so the resample kernel is bypassed.
    PreGridded {
        geotransform: GeoTransform,
        projection_wkt: String,
    },
}
