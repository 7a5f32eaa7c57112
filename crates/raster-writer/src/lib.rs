//! GeoTIFF output for gridded swath products.
//!
//! Encodes single-band f32 rasters with georeferencing tags, decodes them
//! back, and warps projected rasters to geographic coordinates for the
//! product families that are written in their native UTM grid first.

pub mod error;
pub mod geotiff;
pub mod warp;

pub use error::{RasterError, Result};
pub use geotiff::{read_geotiff, read_geotiff_from, GeoTiffCompression, GeoTiffRaster, RasterCrs};
pub use warp::{warp_file_to_geographic, warp_to_geographic, DEFAULT_WARP_TOLERANCE};
