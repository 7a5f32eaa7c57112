//! Hierarchical container access for swath products.
//!
//! The resampling engine only needs a narrow view of a scientific data
//! container: enumerate dataset paths, read a dataset as a flat array with
//! its shape, and read named attributes. That view is the [`ContainerReader`]
//! trait. [`MemoryContainer`] implements it for synthetic scenes in tests;
//! the `netcdf` cargo feature adds a file-backed implementation for real
//! HDF5-based products.

pub mod attrs;
pub mod error;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod netcdf_file;

pub use attrs::{resolve_fill_value, resolve_scale_factor, AttrValue};
pub use error::{HdfReaderError, Result};
pub use memory::MemoryContainer;
#[cfg(feature = "netcdf")]
pub use netcdf_file::FileContainer;

/// Read access to a hierarchical scientific data container.
///
/// Dataset paths are `/`-separated, without a leading slash, matching how
/// HDF5 visitors report them (`SDS/LST`, `Geolocation/latitude`).
pub trait ContainerReader {
    /// All leaf dataset paths in the container, in stable order.
    fn dataset_paths(&self) -> Vec<String>;

    /// Whether `path` names a leaf dataset (as opposed to a group).
    fn is_dataset(&self, path: &str) -> bool;

    /// Shape of a numeric dataset.
    fn dataset_shape(&self, path: &str) -> Result<Vec<usize>>;

    /// Read a numeric dataset as `f64`, row-major.
    fn read_f64(&self, path: &str) -> Result<Vec<f64>>;

    /// Read a numeric dataset as `f32`, row-major.
    fn read_f32(&self, path: &str) -> Result<Vec<f32>> {
        Ok(self.read_f64(path)?.into_iter().map(|v| v as f32).collect())
    }

    /// Read a text dataset (e.g. embedded projection WKT).
    fn read_text(&self, path: &str) -> Result<String>;

    /// Read a named attribute of a dataset.
    ///
    /// Returns [`HdfReaderError::AttributeNotFound`] when the dataset has no
    /// such attribute.
    fn read_attr(&self, path: &str, name: &str) -> Result<AttrValue>;
}
