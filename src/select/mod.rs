//! Turning user-supplied identifiers into the images to process.

use crate::error::StageError;
use crate::store::{DataType, ImageHandle, ObjectHandle, ObjectStore};

/// The images a batch will process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// No identifier matched anything; nothing should be processed.
    Empty { message: String },
    /// Images in processing order, with the store's diagnostic message.
    Images {
        images: Vec<ImageHandle>,
        message: String,
    },
}

/// Resolves a kind discriminator and identifier list to a flat list of images.
///
/// With `"Image"` every identifier names an image. With `"Dataset"` every
/// identifier names a dataset and the result holds the member images of all
/// datasets, dataset by dataset. Duplicate identifiers are kept, so an image
/// named twice is processed twice.
///
/// # Errors
/// [`StageError::UnknownDataType`] for any other discriminator, raised
/// before the store is contacted, and [`StageError::Store`] if a store call
/// fails.
pub fn select_images<S: ObjectStore + ?Sized>(
    store: &S,
    data_type: &str,
    ids: &[u64],
) -> Result<Selection, StageError> {
    let data_type: DataType = data_type.parse()?;
    let resolution = store.resolve(data_type, ids)?;

    if resolution.objects.is_empty() {
        tracing::info!(%data_type, requested = ids.len(), "no objects found");
        return Ok(Selection::Empty {
            message: resolution.message,
        });
    }

    let mut images = Vec::new();
    for object in resolution.objects {
        match object {
            ObjectHandle::Image(image) => images.push(image),
            ObjectHandle::Dataset(dataset) => {
                let children = store.list_children(dataset.id)?;
                tracing::debug!(dataset = %dataset.name, children = children.len(), "expanded dataset");
                images.extend(children);
            }
        }
    }

    tracing::debug!(%data_type, images = images.len(), "selection resolved");
    Ok(Selection::Images {
        images,
        message: resolution.message,
    })
}
