//! Stage coordinate calculation.
//!
//! For every selected image this reads the conversion matrix from the
//! image's metadata, collects its point annotations, and maps each point's
//! pixel position to a physical stage position. An image with a missing or
//! malformed conversion matrix is skipped and noted in the report; a failed
//! store call ends the batch.

mod report;

pub use report::{CalibratedPoint, ImageOutcome, ImageSection, PointRow, StageReport};

use crate::batch::BatchOutcome;
use crate::error::StageError;
use crate::geometry::{find_point_annotations, PointAnnotation};
use crate::metadata::load_metadata;
use crate::select::{select_images, Selection};
use crate::store::{ImageHandle, ObjectStore, StoreError};
use crate::transform::{descriptor_for_image, AffineDescriptor};

/// Status message of a completed batch.
pub const FINISHED_MESSAGE: &str = "Finished calculating";

/// Calculates stage coordinates for every point annotation on the selected
/// images.
///
/// The returned message starts with the store's selection diagnostics, if
/// any, followed by [`FINISHED_MESSAGE`].
///
/// # Errors
/// Fails on an unknown data type or when a store call fails. Data problems
/// of a single image are recorded in the report instead.
pub fn calculate_stage_coordinates<S: ObjectStore + ?Sized>(
    store: &S,
    data_type: &str,
    ids: &[u64],
) -> Result<BatchOutcome<StageReport>, StageError> {
    let (images, mut message) = match select_images(store, data_type, ids)? {
        Selection::Empty { message } => return Ok(BatchOutcome::NothingToProcess { message }),
        Selection::Images { images, message } => (images, message),
    };

    let mut report = StageReport::new();
    for image in &images {
        report.push(calibrate_image(store, image)?);
    }

    tracing::info!(
        images = images.len(),
        points = report.point_count(),
        skipped = report.skipped_count(),
        "stage coordinates calculated"
    );

    message.push_str(FINISHED_MESSAGE);
    Ok(BatchOutcome::Finished { message, report })
}

/// Calculates the stage coordinates of the points on one image.
///
/// # Errors
/// Only store failures are errors; a missing or malformed conversion matrix
/// yields a skipped section.
pub fn calibrate_image<S: ObjectStore + ?Sized>(
    store: &S,
    image: &ImageHandle,
) -> Result<ImageSection, StoreError> {
    tracing::debug!(image = %image.name, id = %image.id, "processing image");

    let metadata = load_metadata(store, image)?;
    let descriptor = match descriptor_for_image(&metadata, &image.name) {
        Ok(descriptor) => descriptor,
        Err(error) => {
            tracing::warn!(image = %image.name, %error, "skipping image");
            return Ok(ImageSection::skipped(image, error));
        }
    };

    let points = find_point_annotations(store, image)?;
    Ok(ImageSection::calibrated(
        image,
        calibrate_points(&descriptor, &points),
    ))
}

/// Maps point annotations to stage coordinates, keeping their order.
pub fn calibrate_points(
    descriptor: &AffineDescriptor,
    points: &[PointAnnotation],
) -> Vec<CalibratedPoint> {
    points
        .iter()
        .map(|point| CalibratedPoint {
            roi_id: point.roi_id,
            region: point.region.clone(),
            name: point.name.clone(),
            pixel: point.pixel,
            stage: descriptor.apply(point.pixel.to_coord()),
        })
        .collect()
}
