//! Attribute values and the fill/scale resolution rules.

use crate::error::HdfReaderError;
use crate::ContainerReader;

/// Attribute name carrying the layer fill sentinel.
pub const FILL_VALUE_ATTR: &str = "_FillValue";
/// Attribute name carrying the layer scale factor.
pub const SCALE_FACTOR_ATTR: &str = "_Scale";

/// A dataset attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    Text(String),
}

impl AttrValue {
    /// Collapse the attribute to a single number.
    ///
    /// Array-valued attributes yield their first element (some products
    /// store scalars as length-1 arrays); text is parsed if numeric.
    /// Returns `None` for empty arrays and non-numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            AttrValue::IntArray(vs) => vs.first().map(|v| *v as f64),
            AttrValue::FloatArray(vs) => vs.first().copied(),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Resolve a layer's fill value, once, with a fixed precedence:
/// the `_FillValue` attribute as a scalar, else its first element, else
/// no fill value at all. A missing attribute is not an error.
pub fn resolve_fill_value<R: ContainerReader + ?Sized>(reader: &R, path: &str) -> Option<f64> {
    match reader.read_attr(path, FILL_VALUE_ATTR) {
        Ok(attr) => attr.as_f64(),
        Err(HdfReaderError::AttributeNotFound { .. }) => None,
        Err(_) => None,
    }
}

/// Resolve a layer's scale factor; a missing or malformed `_Scale`
/// attribute defaults to 1 (no-op).
pub fn resolve_scale_factor<R: ContainerReader + ?Sized>(reader: &R, path: &str) -> f64 {
    match reader.read_attr(path, SCALE_FACTOR_ATTR) {
        Ok(attr) => attr.as_f64().unwrap_or(1.0),
        Err(_) => 1.0,
    }
}
