//! In-memory container for tests and synthetic scenes.

use std::collections::BTreeMap;

use crate::attrs::AttrValue;
use crate::error::{HdfReaderError, Result};
use crate::ContainerReader;

enum DatasetValue {
    Numeric(Vec<f64>),
    Text(String),
}

struct Dataset {
    shape: Vec<usize>,
    value: DatasetValue,
    attrs: BTreeMap<String, AttrValue>,
}

/// A hierarchical container held entirely in memory.
///
/// Paths are stored flat; group structure is implied by `/` separators,
/// which is all the engine ever inspects.
#[derive(Default)]
pub struct MemoryContainer {
    datasets: BTreeMap<String, Dataset>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric dataset. Panics if `data.len()` does not match the
    /// shape product; this is a test fixture, not a parser.
    pub fn insert_dataset(&mut self, path: &str, shape: Vec<usize>, data: Vec<f64>) {
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "dataset {} shape/data mismatch",
            path
        );
        self.datasets.insert(
            path.to_string(),
            Dataset {
                shape,
                value: DatasetValue::Numeric(data),
                attrs: BTreeMap::new(),
            },
        );
    }

    /// Add a text dataset (projection WKT, metadata strings).
    pub fn insert_text_dataset(&mut self, path: &str, text: &str) {
        self.datasets.insert(
            path.to_string(),
            Dataset {
                shape: vec![],
                value: DatasetValue::Text(text.to_string()),
                attrs: BTreeMap::new(),
            },
        );
    }

    /// Attach an attribute to an existing dataset.
    pub fn set_attr(&mut self, path: &str, name: &str, value: AttrValue) {
        let ds = self
            .datasets
            .get_mut(path)
            .unwrap_or_else(|| panic!("no dataset {}", path));
        ds.attrs.insert(name.to_string(), value);
    }

    fn get(&self, path: &str) -> Result<&Dataset> {
        self.datasets
            .get(path)
            .ok_or_else(|| HdfReaderError::DatasetNotFound(path.to_string()))
    }
}

impl ContainerReader for MemoryContainer {
    fn dataset_paths(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    fn is_dataset(&self, path: &str) -> bool {
        self.datasets.contains_key(path)
    }

    fn dataset_shape(&self, path: &str) -> Result<Vec<usize>> {
        Ok(self.get(path)?.shape.clone())
    }

    fn read_f64(&self, path: &str) -> Result<Vec<f64>> {
        match &self.get(path)?.value {
            DatasetValue::Numeric(data) => Ok(data.clone()),
            DatasetValue::Text(_) => Err(HdfReaderError::WrongKind {
                path: path.to_string(),
                expected: "numeric",
            }),
        }
    }

    fn read_text(&self, path: &str) -> Result<String> {
        match &self.get(path)?.value {
            DatasetValue::Text(text) => Ok(text.clone()),
            DatasetValue::Numeric(_) => Err(HdfReaderError::WrongKind {
                path: path.to_string(),
                expected: "text",
            }),
        }
    }

    fn read_attr(&self, path: &str, name: &str) -> Result<AttrValue> {
        self.get(path)?
            .attrs
            .get(name)
            .cloned()
            .ok_or_else(|| HdfReaderError::AttributeNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_sorted_and_stable() {
        let mut c = MemoryContainer::new();
        c.insert_dataset("b/two", vec![1], vec![2.0]);
        c.insert_dataset("a/one", vec![1], vec![1.0]);
        assert_eq!(c.dataset_paths(), vec!["a/one", "b/two"]);
    }

    #[test]
    fn test_is_dataset_only_for_leaves() {
        let mut c = MemoryContainer::new();
        c.insert_dataset("group/leaf", vec![1], vec![0.0]);
        assert!(c.is_dataset("group/leaf"));
        assert!(!c.is_dataset("group"));
    }

    #[test]
    fn test_numeric_read_as_f32() {
        let mut c = MemoryContainer::new();
        c.insert_dataset("d", vec![3], vec![1.0, 2.5, -9999.0]);
        assert_eq!(c.read_f32("d").unwrap(), vec![1.0f32, 2.5, -9999.0]);
    }

    #[test]
    fn test_text_dataset_kind_mismatch() {
        let mut c = MemoryContainer::new();
        c.insert_text_dataset("meta/wkt", "PROJCS[...]");
        assert!(matches!(
            c.read_f64("meta/wkt"),
            Err(HdfReaderError::WrongKind { .. })
        ));
        assert_eq!(c.read_text("meta/wkt").unwrap(), "PROJCS[...]");
    }

    #[test]
    fn test_missing_dataset() {
        let c = MemoryContainer::new();
        assert!(matches!(
            c.read_f64("nope"),
            Err(HdfReaderError::DatasetNotFound(_))
        ));
    }
}
