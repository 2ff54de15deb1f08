//! In-memory object store.

use super::{
    DataType, DatasetHandle, FieldUpdate, ImageHandle, ObjectHandle, ObjectStore, Resolution,
    StoreError,
};
use crate::metadata::MetadataMap;
use crate::model::{DatasetId, Image, ImageId, Roi, StoreSnapshot};

/// An [`ObjectStore`] backed by a [`StoreSnapshot`] held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: StoreSnapshot,
}

impl MemoryStore {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self { snapshot }
    }

    /// The current contents of the store, including persisted updates.
    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    fn image(&self, id: ImageId) -> Result<&Image, StoreError> {
        self.snapshot
            .images
            .iter()
            .find(|image| image.id == id)
            .ok_or(StoreError::ImageNotFound(id))
    }

    fn image_mut(&mut self, id: ImageId) -> Result<&mut Image, StoreError> {
        self.snapshot
            .images
            .iter_mut()
            .find(|image| image.id == id)
            .ok_or(StoreError::ImageNotFound(id))
    }

    fn find_object(&self, data_type: DataType, id: u64) -> Option<ObjectHandle> {
        match data_type {
            DataType::Image => self
                .snapshot
                .images
                .iter()
                .find(|image| image.id.as_u64() == id)
                .map(|image| {
                    ObjectHandle::Image(ImageHandle {
                        id: image.id,
                        name: image.name.clone(),
                    })
                }),
            DataType::Dataset => self
                .snapshot
                .datasets
                .iter()
                .find(|dataset| dataset.id.as_u64() == id)
                .map(|dataset| {
                    ObjectHandle::Dataset(DatasetHandle {
                        id: dataset.id,
                        name: dataset.name.clone(),
                    })
                }),
        }
    }
}

impl ObjectStore for MemoryStore {
    fn resolve(&self, data_type: DataType, ids: &[u64]) -> Result<Resolution, StoreError> {
        let mut objects = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();

        for &id in ids {
            match self.find_object(data_type, id) {
                Some(object) => objects.push(object),
                None => missing.push(id.to_string()),
            }
        }

        let message = if objects.is_empty() {
            if missing.is_empty() {
                format!("No {}(s) found. ", data_type)
            } else {
                format!(
                    "No {}(s) found with ID(s) {}. ",
                    data_type,
                    missing.join(", ")
                )
            }
        } else if !missing.is_empty() {
            format!("{} ID(s) not found: {}. ", data_type, missing.join(", "))
        } else {
            String::new()
        };

        Ok(Resolution { objects, message })
    }

    fn list_children(&self, dataset: DatasetId) -> Result<Vec<ImageHandle>, StoreError> {
        let dataset = self
            .snapshot
            .datasets
            .iter()
            .find(|d| d.id == dataset)
            .ok_or(StoreError::DatasetNotFound(dataset))?;

        dataset
            .image_ids
            .iter()
            .map(|&id| {
                self.image(id).map(|image| ImageHandle {
                    id: image.id,
                    name: image.name.clone(),
                })
            })
            .collect()
    }

    fn load_metadata(&self, image: ImageId) -> Result<MetadataMap, StoreError> {
        Ok(self.image(image)?.metadata.clone())
    }

    fn find_rois(&self, image: ImageId) -> Result<Vec<Roi>, StoreError> {
        Ok(self.image(image)?.rois.clone())
    }

    fn persist_field(&mut self, image: ImageId, update: FieldUpdate) -> Result<(), StoreError> {
        let target = self.image_mut(image)?;
        match update {
            FieldUpdate::PhysicalSizeX(length) => target.pixels.physical_size_x = Some(length),
            FieldUpdate::PhysicalSizeY(length) => target.pixels.physical_size_y = Some(length),
            FieldUpdate::ChannelGlobalRange { channel, min, max } => {
                let settings = target
                    .pixels
                    .channels
                    .get_mut(channel)
                    .ok_or(StoreError::ChannelOutOfRange { image, channel })?;
                settings.global_min = Some(min);
                settings.global_max = Some(max);
            }
        }
        Ok(())
    }
}
