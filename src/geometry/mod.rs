//! Point annotations extracted from an image's regions of interest.
//!
//! Only point shapes mark stage positions. Every other shape kind is
//! dropped here, so nothing downstream ever sees a rectangle or a polygon.

use serde::Serialize;

use crate::model::{Coord, Pixel, Roi, RoiId, Shape};
use crate::store::{ImageHandle, ObjectStore, StoreError};

/// Display name of a point when neither it nor its region is named.
pub const UNNAMED: &str = "Unnamed";

/// An integer pixel position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Truncates a fractional pixel position toward zero.
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn truncate(x: f64, y: f64) -> Option<Self> {
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        Some(Self {
            x: x.trunc() as i64,
            y: y.trunc() as i64,
        })
    }

    pub fn to_coord(&self) -> Coord<Pixel> {
        Coord::new(self.x as f64, self.y as f64)
    }
}

/// A point shape, with the region it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointAnnotation {
    /// The region the point was drawn in.
    pub roi_id: RoiId,
    /// Position of the point among the region's shapes.
    pub shape_index: usize,
    /// Name of the region, if it has one.
    pub region: Option<String>,
    /// Display name: the point's label, else the region name, else
    /// [`UNNAMED`].
    ///
    /// A labelled point shows its own label even inside a named region, so
    /// two points of one region can be told apart. Only unlabelled points
    /// are reported under the region name.
    pub name: String,
    pub pixel: PixelPoint,
}

/// Picks the point shapes out of a set of regions.
///
/// Regions keep the order they were given in, and so do the points within
/// each region. Points with non-finite coordinates are dropped.
pub fn point_annotations(rois: &[Roi]) -> Vec<PointAnnotation> {
    let mut points = Vec::new();

    for roi in rois {
        let region = non_blank(roi.name.as_deref());

        for (shape_index, shape) in roi.shapes.iter().enumerate() {
            let Shape::Point { x, y, text } = shape else {
                tracing::trace!(roi = %roi.id, kind = shape.kind(), "ignoring non-point shape");
                continue;
            };

            let Some(pixel) = PixelPoint::truncate(*x, *y) else {
                tracing::warn!(roi = %roi.id, shape_index, "point has non-finite coordinates");
                continue;
            };

            let name = non_blank(text.as_deref())
                .or(region)
                .unwrap_or(UNNAMED)
                .to_string();

            points.push(PointAnnotation {
                roi_id: roi.id,
                shape_index,
                region: region.map(str::to_string),
                name,
                pixel,
            });
        }
    }

    points
}

/// Fetches the regions of an image and extracts its point annotations.
pub fn find_point_annotations<S: ObjectStore + ?Sized>(
    store: &S,
    image: &ImageHandle,
) -> Result<Vec<PointAnnotation>, StoreError> {
    let rois = store.find_rois(image.id)?;
    let points = point_annotations(&rois);
    tracing::debug!(
        image = %image.name,
        rois = rois.len(),
        points = points.len(),
        "extracted point annotations"
    );
    Ok(points)
}

fn non_blank(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.trim().is_empty())
}
