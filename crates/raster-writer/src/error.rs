//! Error types for raster encoding and decoding.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF codec error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("invalid raster data: {0}")]
    InvalidData(String),

    #[error("missing georeferencing: {0}")]
    MissingGeoreference(String),

    #[error("cannot warp from source CRS: {0}")]
    UnsupportedSourceCrs(String),

    #[error("projection error: {0}")]
    Projection(#[from] projection::ProjectionError),
}

pub type Result<T> = std::result::Result<T, RasterError>;
