//! Free-form acquisition metadata attached to images.
//!
//! Metadata is a flat map of string keys to scalar values written at
//! acquisition time. Nothing about its keys is guaranteed, so lookups of
//! required keys go through [`MetadataMap::require`], which names both the
//! key and the image in its error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ImageError;
use crate::store::{ImageHandle, ObjectStore, StoreError};

/// A single metadata value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    /// Returns the value as a finite number, parsing text values if needed.
    ///
    /// `nan` and `inf` spellings in text are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            MetadataValue::Number(n) => Some(*n),
            MetadataValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        };
        value.filter(|v: &f64| v.is_finite())
    }

    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataValue::Bool(_) => "boolean",
            MetadataValue::Number(_) => "number",
            MetadataValue::Text(_) => "text",
            MetadataValue::List(_) => "list",
            MetadataValue::Map(_) => "map",
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Bool(b) => write!(f, "{}", b),
            MetadataValue::Number(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => write!(f, "{}", s),
            MetadataValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            MetadataValue::Map(map) => write!(f, "{{{} entries}}", map.len()),
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

/// Key/value acquisition metadata of one image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataMap(BTreeMap<String, MetadataValue>);

impl MetadataMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds an entry, returning the map (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a key that must be present for the given image.
    ///
    /// # Errors
    /// Returns [`ImageError::MissingMetadataField`] if the key is absent.
    pub fn require(&self, key: &str, image_name: &str) -> Result<&MetadataValue, ImageError> {
        self.0
            .get(key)
            .ok_or_else(|| ImageError::MissingMetadataField {
                key: key.to_string(),
                image: image_name.to_string(),
            })
    }

    /// Looks up a key that must be present and numeric.
    ///
    /// Text values are accepted when they parse as a number.
    pub fn require_number(&self, key: &str, image_name: &str) -> Result<f64, ImageError> {
        let value = self.require(key, image_name)?;
        value.as_f64().ok_or_else(|| ImageError::InvalidMetadataValue {
            key: key.to_string(),
            image: image_name.to_string(),
            expected: "a number",
            found: value.to_string(),
        })
    }
}


/// Fetches the metadata map of an image from the store.
///
/// Callers check for the keys they need with [`MetadataMap::require`].
pub fn load_metadata<S: ObjectStore + ?Sized>(
    store: &S,
    image: &ImageHandle,
) -> Result<MetadataMap, StoreError> {
    let metadata = store.load_metadata(image.id)?;
    tracing::debug!(image = %image.name, entries = metadata.len(), "loaded metadata");
    Ok(metadata)
}
