//! Coordinate reference system transformations.
//!
//! Implements map projections from scratch without external dependencies:
//! ellipsoidal transverse Mercator for UTM output grids, a spherical
//! azimuthal equidistant staging projection for pixel-size equalization,
//! and geocentric coordinates for nearest-neighbor search.

pub mod aeqd;
pub mod epsg;
pub mod geocentric;
pub mod utm;

pub use aeqd::AzimuthalEquidistant;
pub use epsg::{epsg_from_wkt, utm_zone_epsg, EPSG_WGS84};
pub use utm::UtmProjection;

use thiserror::Error;

/// Errors raised by projection construction and transforms.
#[derive(Error, Debug)]
pub enum ProjectionError {
    /// The EPSG code does not identify a supported projection.
    #[error("unsupported EPSG code: {0}")]
    UnsupportedEpsg(u32),

    /// A coordinate fell outside the domain of the transform.
    #[error("coordinate out of projection domain: lat={lat}, lon={lon}")]
    OutOfDomain { lat: f64, lon: f64 },
}
