//! Commands that overwrite scalar fields of images.
//!
//! Both commands follow the same loop as the stage coordinate calculation:
//! resolve the selection, work out the new field values of each image, and
//! persist them. An image whose metadata lacks the needed values is skipped;
//! a failed store call ends the batch.

mod report;

pub use report::{FixEntry, FixReport, FixStatus};

use crate::batch::BatchOutcome;
use crate::error::{ImageError, StageError};
use crate::metadata::load_metadata;
use crate::model::Length;
use crate::select::{select_images, Selection};
use crate::store::{FieldUpdate, ImageHandle, ObjectStore, StoreError};

/// Pixel size written by `fix-pixel-size` when none is given, in nanometers.
pub const DEFAULT_PIXEL_SIZE_NM: f64 = 3.81;

/// Metadata key of the lower display bound.
pub const MIN_KEY: &str = "Min";

/// Metadata key of the upper display bound.
pub const MAX_KEY: &str = "Max";

/// Channel whose global range `fix-min-max` sets.
const MIN_MAX_CHANNEL: usize = 0;

/// Sets the physical pixel size (X and Y) of every selected image.
pub fn fix_pixel_size<S: ObjectStore + ?Sized>(
    store: &mut S,
    data_type: &str,
    ids: &[u64],
    size: Length,
) -> Result<BatchOutcome<FixReport>, StageError> {
    run_fix(store, data_type, ids, |_, _| {
        Ok(Ok(vec![
            FieldUpdate::PhysicalSizeX(size),
            FieldUpdate::PhysicalSizeY(size),
        ]))
    })
}

/// Copies the `Min` and `Max` acquisition metadata of every selected image
/// into the global range of its first channel.
pub fn fix_min_max<S: ObjectStore + ?Sized>(
    store: &mut S,
    data_type: &str,
    ids: &[u64],
) -> Result<BatchOutcome<FixReport>, StageError> {
    run_fix(store, data_type, ids, |store, image| {
        let metadata = load_metadata(store, image)?;
        let range = metadata.require_number(MIN_KEY, &image.name).and_then(|min| {
            metadata
                .require_number(MAX_KEY, &image.name)
                .map(|max| (min, max))
        });

        Ok(range.map(|(min, max)| {
            vec![FieldUpdate::ChannelGlobalRange {
                channel: MIN_MAX_CHANNEL,
                min,
                max,
            }]
        }))
    })
}

/// Runs an overwrite over the selection.
///
/// `plan` computes the updates for one image: the outer result carries
/// store failures, the inner one data problems that skip the image.
fn run_fix<S, F>(
    store: &mut S,
    data_type: &str,
    ids: &[u64],
    mut plan: F,
) -> Result<BatchOutcome<FixReport>, StageError>
where
    S: ObjectStore + ?Sized,
    F: FnMut(&S, &ImageHandle) -> Result<Result<Vec<FieldUpdate>, ImageError>, StoreError>,
{
    let (images, mut message) = match select_images(&*store, data_type, ids)? {
        Selection::Empty { message } => return Ok(BatchOutcome::NothingToProcess { message }),
        Selection::Images { images, message } => (images, message),
    };

    let mut report = FixReport::new();
    for image in images {
        let status = match plan(&*store, &image)? {
            Ok(updates) => {
                let mut fields = Vec::with_capacity(updates.len());
                for update in updates {
                    store.persist_field(image.id, update)?;
                    tracing::info!(image = %image.name, %update, "persisted field");
                    fields.push(update.to_string());
                }
                FixStatus::Updated { fields }
            }
            Err(error) => {
                tracing::warn!(image = %image.name, %error, "skipping image");
                FixStatus::Skipped { error }
            }
        };
        report.push(FixEntry {
            image_id: image.id,
            image_name: image.name,
            status,
        });
    }

    message.push_str(&report.summary());
    Ok(BatchOutcome::Finished { message, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataMap;
    use crate::model::{Channel, Dataset, Image, StoreSnapshot};
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::new(StoreSnapshot {
            images: vec![
                Image::new(1u64, "a.tif")
                    .with_metadata(MetadataMap::new().with(MIN_KEY, 12.0).with(MAX_KEY, "4095"))
                    .with_channels(2),
                Image::new(2u64, "b.tif")
                    .with_metadata(MetadataMap::new().with(MIN_KEY, 1.0))
                    .with_channels(1),
            ],
            datasets: vec![Dataset::new(10u64, "all", [1, 2])],
        })
    }

    #[test]
    fn test_fix_pixel_size_sets_both_axes() {
        let mut store = store();
        let outcome =
            fix_pixel_size(&mut store, "Dataset", &[10], Length::nanometers(3.81)).unwrap();

        assert_eq!(outcome.message(), "Updated 2 image(s), skipped 0");
        for image in &store.snapshot().images {
            assert_eq!(image.pixels.physical_size_x, Some(Length::nanometers(3.81)));
            assert_eq!(image.pixels.physical_size_y, Some(Length::nanometers(3.81)));
        }
    }

    #[test]
    fn test_fix_min_max_copies_metadata() {
        let mut store = store();
        let outcome = fix_min_max(&mut store, "Image", &[1, 2]).unwrap();

        assert_eq!(outcome.message(), "Updated 1 image(s), skipped 1");
        let channel = &store.snapshot().images[0].pixels.channels[0];
        assert_eq!(channel.global_min, Some(12.0));
        assert_eq!(channel.global_max, Some(4095.0));

        let report = outcome.report().expect("report");
        assert!(matches!(
            &report.images[1].status,
            FixStatus::Skipped {
                error: ImageError::MissingMetadataField { key, .. }
            } if key == MAX_KEY
        ));
        assert!(store.snapshot().images[1].pixels.channels[0]
            .global_min
            .is_none());
    }

    #[test]
    fn test_fix_min_max_skips_non_finite_bounds() {
        let mut image = Image::new(1u64, "a.tif")
            .with_metadata(MetadataMap::new().with(MIN_KEY, "nan").with(MAX_KEY, "inf"));
        image.pixels.channels = vec![Channel {
            global_min: Some(10.0),
            global_max: Some(200.0),
        }];
        let mut store = MemoryStore::new(StoreSnapshot {
            images: vec![image],
            datasets: vec![],
        });

        let outcome = fix_min_max(&mut store, "Image", &[1]).unwrap();

        assert_eq!(outcome.message(), "Updated 0 image(s), skipped 1");
        assert!(matches!(
            &outcome.report().expect("report").images[0].status,
            FixStatus::Skipped {
                error: ImageError::InvalidMetadataValue { key, .. }
            } if key == MIN_KEY
        ));
        let channel = &store.snapshot().images[0].pixels.channels[0];
        assert_eq!(channel.global_min, Some(10.0));
        assert_eq!(channel.global_max, Some(200.0));
    }

    #[test]
    fn test_fix_min_max_without_channels_ends_batch() {
        let mut store = MemoryStore::new(StoreSnapshot {
            images: vec![Image::new(1u64, "a.tif")
                .with_metadata(MetadataMap::new().with(MIN_KEY, 0.0).with(MAX_KEY, 1.0))],
            datasets: vec![],
        });
        let err = fix_min_max(&mut store, "Image", &[1]).unwrap_err();
        assert!(matches!(
            err,
            StageError::Store(StoreError::ChannelOutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_selection_writes_nothing() {
        let mut store = store();
        let outcome = fix_pixel_size(&mut store, "Image", &[5], Length::nanometers(1.0)).unwrap();
        assert!(outcome.is_nothing_to_process());
        assert!(store.snapshot().images[0].pixels.physical_size_x.is_none());
    }
}
