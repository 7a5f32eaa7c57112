//! Swath-to-grid resampling engine.
//!
//! Converts swath measurements (per-pixel lat/lon geolocation) into regular,
//! georeferenced grids. The pipeline per scene:
//!
//! 1. [`GeolocationField`] wraps the lat/lon arrays and derives the
//!    [`SceneExtent`].
//! 2. [`GridDefinition::from_swath`] computes the output grid (projection,
//!    pixel size, rows/cols, extent) for the requested [`OutputMode`].
//! 3. [`Correspondence::build`] maps every output cell to its nearest swath
//!    pixel within the search radius, once per scene.
//! 4. [`resample_layer`] + [`apply_scale`] run per data layer against the
//!    shared correspondence.
//!
//! All values are explicit and immutable after construction; scenes are
//! independent and may be processed in parallel.

pub mod config;
pub mod correspondence;
pub mod error;
pub mod grid;
pub mod resample;
pub mod swath;

pub use config::ResampleConfig;
pub use correspondence::Correspondence;
pub use error::{Result, SwathGridError};
pub use grid::{GridDefinition, ProjectionFamily};
pub use resample::{apply_scale, resample_layer, Layer, DEFAULT_FILL_F32};
pub use swath::{GeolocationField, SceneExtent};

pub use swath_common::{BoundingBox, GeoTransform, OutputMode};
