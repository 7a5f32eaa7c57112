//! File-backed container via libnetcdf.
//!
//! The swath products this tool consumes are HDF5-based; libnetcdf opens
//! them through its enhanced data model, exposing groups, variables, and
//! attributes. Only enabled with the `netcdf` cargo feature since it needs
//! the system library.

use std::path::Path;

use netcdf::{AttributeValue, Group, Variable};

use crate::attrs::AttrValue;
use crate::error::{HdfReaderError, Result};
use crate::ContainerReader;

/// A read-only container backed by an HDF5/NetCDF file on disk.
pub struct FileContainer {
    file: netcdf::File,
}

impl FileContainer {
    /// Open a container file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = netcdf::open(path.as_ref())
            .map_err(|e| HdfReaderError::OpenFailed(e.to_string()))?;
        Ok(Self { file })
    }

    fn variable(&self, path: &str) -> Option<Variable<'_>> {
        match path.rsplit_once('/') {
            None => self.file.variable(path),
            Some((group_path, name)) => {
                let mut iter = group_path.split('/');
                let first = iter.next()?;
                let mut group = self.file.group(first).ok().flatten()?;
                for sub in iter {
                    group = group.group(sub)?;
                }
                group.variable(name)
            }
        }
    }

    fn require_variable(&self, path: &str) -> Result<Variable<'_>> {
        self.variable(path)
            .ok_or_else(|| HdfReaderError::DatasetNotFound(path.to_string()))
    }
}

fn collect_group(group: &Group<'_>, prefix: &str, out: &mut Vec<String>) {
    for var in group.variables() {
        out.push(format!("{}/{}", prefix, var.name()));
    }
    for sub in group.groups() {
        let sub_prefix = format!("{}/{}", prefix, sub.name());
        collect_group(&sub, &sub_prefix, out);
    }
}

fn convert_attr(value: AttributeValue) -> AttrValue {
    match value {
        AttributeValue::Uchar(v) => AttrValue::Int(v as i64),
        AttributeValue::Schar(v) => AttrValue::Int(v as i64),
        AttributeValue::Ushort(v) => AttrValue::Int(v as i64),
        AttributeValue::Short(v) => AttrValue::Int(v as i64),
        AttributeValue::Uint(v) => AttrValue::Int(v as i64),
        AttributeValue::Int(v) => AttrValue::Int(v as i64),
        AttributeValue::Ulonglong(v) => AttrValue::Int(v as i64),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Float(v) => AttrValue::Float(v as f64),
        AttributeValue::Double(v) => AttrValue::Float(v),
        AttributeValue::Str(s) => AttrValue::Text(s),
        AttributeValue::Uchars(v) => AttrValue::IntArray(v.into_iter().map(i64::from).collect()),
        AttributeValue::Schars(v) => AttrValue::IntArray(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ushorts(v) => AttrValue::IntArray(v.into_iter().map(i64::from).collect()),
        AttributeValue::Shorts(v) => AttrValue::IntArray(v.into_iter().map(i64::from).collect()),
        AttributeValue::Uints(v) => AttrValue::IntArray(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ints(v) => AttrValue::IntArray(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ulonglongs(v) => {
            AttrValue::IntArray(v.into_iter().map(|x| x as i64).collect())
        }
        AttributeValue::Longlongs(v) => AttrValue::IntArray(v),
        AttributeValue::Floats(v) => {
            AttrValue::FloatArray(v.into_iter().map(f64::from).collect())
        }
        AttributeValue::Doubles(v) => AttrValue::FloatArray(v),
        AttributeValue::Strs(v) => AttrValue::Text(v.join("")),
    }
}

impl ContainerReader for FileContainer {
    fn dataset_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for var in self.file.variables() {
            out.push(var.name());
        }
        if let Ok(groups) = self.file.groups() {
            for group in groups {
                let prefix = group.name();
                collect_group(&group, &prefix, &mut out);
            }
        }
        out.sort();
        out
    }

    fn is_dataset(&self, path: &str) -> bool {
        self.variable(path).is_some()
    }

    fn dataset_shape(&self, path: &str) -> Result<Vec<usize>> {
        let var = self.require_variable(path)?;
        Ok(var.dimensions().iter().map(|d| d.len()).collect())
    }

    fn read_f64(&self, path: &str) -> Result<Vec<f64>> {
        let var = self.require_variable(path)?;
        var.get_values::<f64, _>(..)
            .map_err(|e| HdfReaderError::ReadFailed(path.to_string(), e.to_string()))
    }

    fn read_f32(&self, path: &str) -> Result<Vec<f32>> {
        let var = self.require_variable(path)?;
        var.get_values::<f32, _>(..)
            .map_err(|e| HdfReaderError::ReadFailed(path.to_string(), e.to_string()))
    }

    fn read_text(&self, path: &str) -> Result<String> {
        // Projection text is stored as a char array; read the raw bytes.
        let var = self.require_variable(path)?;
        let bytes = var
            .get_values::<u8, _>(..)
            .map_err(|e| HdfReaderError::ReadFailed(path.to_string(), e.to_string()))?;
        String::from_utf8(bytes.into_iter().take_while(|&b| b != 0).collect()).map_err(|_| {
            HdfReaderError::WrongKind {
                path: path.to_string(),
                expected: "text",
            }
        })
    }

    fn read_attr(&self, path: &str, name: &str) -> Result<AttrValue> {
        let var = self.require_variable(path)?;
        let attr = var
            .attribute(name)
            .ok_or_else(|| HdfReaderError::AttributeNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })?;
        let value = attr
            .value()
            .map_err(|e| HdfReaderError::ReadFailed(path.to_string(), e.to_string()))?;
        Ok(convert_attr(value))
    }
}
