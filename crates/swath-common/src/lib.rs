//! Shared types for the swath2grid workspace.
//!
//! Contains the bounding box, affine geotransform, output mode, and product
//! kind types used by the resampling engine, the raster writer, and the CLI.

pub mod bbox;
pub mod geotransform;
pub mod mode;
pub mod product;

pub use bbox::BoundingBox;
pub use geotransform::GeoTransform;
pub use mode::OutputMode;
pub use product::ProductKind;
