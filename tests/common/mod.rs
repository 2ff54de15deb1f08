#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use stagecoord::metadata::MetadataMap;
use stagecoord::model::{DatasetId, Image, ImageId, Roi, StoreSnapshot};
use stagecoord::store::{
    DataType, FieldUpdate, ImageHandle, MemoryStore, ObjectStore, Resolution, StoreError,
};
use stagecoord::transform::CONVERSION_MATRIX_KEY;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies a fixture into `dir` so a test can modify it.
pub fn copy_fixture(dir: &Path, name: &str) -> PathBuf {
    let target = dir.join(name);
    fs::copy(fixture_path(name), &target).expect("copy fixture");
    target
}

pub fn image(snapshot: &StoreSnapshot, id: u64) -> &Image {
    snapshot
        .images
        .iter()
        .find(|image| image.id == ImageId(id))
        .expect("image in snapshot")
}

/// An image with the given conversion matrix text and regions.
pub fn calibrated_image(id: u64, matrix: &str, rois: Vec<Roi>) -> Image {
    let mut image = Image::new(id, format!("image_{id}.tif"))
        .with_metadata(MetadataMap::new().with(CONVERSION_MATRIX_KEY, matrix));
    image.rois = rois;
    image
}

/// Wraps a store and fails every call for one image.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub failing_image: ImageId,
}

impl FailingStore {
    fn check(&self, image: ImageId) -> Result<(), StoreError> {
        if image == self.failing_image {
            Err(StoreError::Backend(format!("connection lost at image {image}")))
        } else {
            Ok(())
        }
    }
}

impl ObjectStore for FailingStore {
    fn resolve(&self, data_type: DataType, ids: &[u64]) -> Result<Resolution, StoreError> {
        self.inner.resolve(data_type, ids)
    }

    fn list_children(&self, dataset: DatasetId) -> Result<Vec<ImageHandle>, StoreError> {
        self.inner.list_children(dataset)
    }

    fn load_metadata(&self, image: ImageId) -> Result<MetadataMap, StoreError> {
        self.check(image)?;
        self.inner.load_metadata(image)
    }

    fn find_rois(&self, image: ImageId) -> Result<Vec<Roi>, StoreError> {
        self.check(image)?;
        self.inner.find_rois(image)
    }

    fn persist_field(&mut self, image: ImageId, update: FieldUpdate) -> Result<(), StoreError> {
        self.check(image)?;
        self.inner.persist_field(image, update)
    }
}

/// Counts resolve calls, to check that nothing reaches the store.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub resolve_calls: std::cell::Cell<usize>,
}

impl ObjectStore for CountingStore {
    fn resolve(&self, data_type: DataType, ids: &[u64]) -> Result<Resolution, StoreError> {
        self.resolve_calls.set(self.resolve_calls.get() + 1);
        self.inner.resolve(data_type, ids)
    }

    fn list_children(&self, dataset: DatasetId) -> Result<Vec<ImageHandle>, StoreError> {
        self.inner.list_children(dataset)
    }

    fn load_metadata(&self, image: ImageId) -> Result<MetadataMap, StoreError> {
        self.inner.load_metadata(image)
    }

    fn find_rois(&self, image: ImageId) -> Result<Vec<Roi>, StoreError> {
        self.inner.find_rois(image)
    }

    fn persist_field(&mut self, image: ImageId, update: FieldUpdate) -> Result<(), StoreError> {
        self.inner.persist_field(image, update)
    }
}
