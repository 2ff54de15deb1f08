//! Access to the image store.
//!
//! The pipeline never talks to a store directly; it goes through the
//! [`ObjectStore`] trait, which exposes the handful of round-trips the batch
//! commands need. [`MemoryStore`] implements it over an in-memory
//! [`StoreSnapshot`](crate::model::StoreSnapshot), which is also how snapshot
//! files on disk are served.

mod memory;
pub mod snapshot;

pub use memory::MemoryStore;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::StageError;
use crate::metadata::MetadataMap;
use crate::model::{DatasetId, ImageId, Length, Roi};

/// The kind of object a list of identifiers refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Image,
    Dataset,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Image => "Image",
            DataType::Dataset => "Dataset",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Image" => Ok(DataType::Image),
            "Dataset" => Ok(DataType::Dataset),
            other => Err(StageError::UnknownDataType(other.to_string())),
        }
    }
}

/// A resolved image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageHandle {
    pub id: ImageId,
    pub name: String,
}

/// A resolved dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetHandle {
    pub id: DatasetId,
    pub name: String,
}

/// Any object the store can resolve an identifier to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObjectHandle {
    Image(ImageHandle),
    Dataset(DatasetHandle),
}

/// The objects found for a list of identifiers, plus a diagnostic message
/// naming the identifiers that could not be resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub objects: Vec<ObjectHandle>,
    pub message: String,
}

/// A scalar field of an image that can be overwritten.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldUpdate {
    PhysicalSizeX(Length),
    PhysicalSizeY(Length),
    /// Global intensity range of one channel.
    ChannelGlobalRange { channel: usize, min: f64, max: f64 },
}

impl fmt::Display for FieldUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldUpdate::PhysicalSizeX(len) => write!(f, "physical size X = {}", len),
            FieldUpdate::PhysicalSizeY(len) => write!(f, "physical size Y = {}", len),
            FieldUpdate::ChannelGlobalRange { channel, min, max } => {
                write!(f, "channel {} global range = [{}, {}]", channel, min, max)
            }
        }
    }
}

/// A failed round-trip to the store.
///
/// Unlike per-image data problems these end the batch: once the store
/// misbehaves, no later result can be trusted.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("image {0} not found in store")]
    ImageNotFound(ImageId),

    #[error("dataset {0} not found in store")]
    DatasetNotFound(DatasetId),

    #[error("image {image} has no channel {channel}")]
    ChannelOutOfRange { image: ImageId, channel: usize },

    #[error("store request failed: {0}")]
    Backend(String),
}

/// The round-trips the batch commands make against an image store.
pub trait ObjectStore {
    /// Resolves identifiers of the given kind, in request order.
    ///
    /// Identifiers that match nothing are left out of the result and named
    /// in its message. Duplicates resolve once per occurrence.
    fn resolve(&self, data_type: DataType, ids: &[u64]) -> Result<Resolution, StoreError>;

    /// Lists the member images of a dataset, in dataset order.
    fn list_children(&self, dataset: DatasetId) -> Result<Vec<ImageHandle>, StoreError>;

    /// Fetches the acquisition metadata of an image.
    fn load_metadata(&self, image: ImageId) -> Result<MetadataMap, StoreError>;

    /// Fetches every region of interest on an image, with shapes of any kind.
    fn find_rois(&self, image: ImageId) -> Result<Vec<Roi>, StoreError>;

    /// Overwrites one scalar field of an image. The update is applied
    /// entirely or not at all.
    fn persist_field(&mut self, image: ImageId, update: FieldUpdate) -> Result<(), StoreError>;
}
