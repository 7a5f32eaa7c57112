//! Error types for the resampling engine.

use thiserror::Error;

/// Errors that can occur while gridding a swath.
#[derive(Error, Debug)]
pub enum SwathGridError {
    /// The geolocation extent has zero or NaN span; the scene cannot define
    /// an output grid and must be skipped.
    #[error("degenerate geolocation extent: {0}")]
    DegenerateExtent(String),

    /// The correspondence could not be built: no valid geolocation pixels,
    /// or no output cell matched within the search radius. Emitting an
    /// all-fill raster silently would hide the failure, so the scene is
    /// skipped instead.
    #[error("resample geometry failure: {0}")]
    ResampleGeometry(String),

    /// A layer's shape does not match the geolocation field it claims to be
    /// described by; the layer is skipped, the scene continues.
    #[error("dimension mismatch: layer has {actual} values, geolocation has {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Projection construction failure (unsupported EPSG, out-of-domain).
    #[error("projection error: {0}")]
    Projection(#[from] projection::ProjectionError),

    /// Invalid resampling configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SwathGridError>;
