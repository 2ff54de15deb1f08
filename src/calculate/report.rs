//! Stage coordinate report types and terminal formatting.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ImageError;
use crate::geometry::PixelPoint;
use crate::model::{Coord, ImageId, RoiId, Stage};
use crate::store::ImageHandle;

/// Rule printed after each image section.
const SECTION_FOOTER: &str = "--------------------------------------";

/// Stage coordinates of every processed image, in processing order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StageReport {
    pub images: Vec<ImageSection>,
}

impl StageReport {
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Adds the section of one image.
    pub fn push(&mut self, section: ImageSection) {
        self.images.push(section);
    }

    /// Number of points with reported stage coordinates.
    pub fn point_count(&self) -> usize {
        self.images
            .iter()
            .map(|s| match &s.outcome {
                ImageOutcome::Calibrated { points, .. } => points.len(),
                ImageOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    /// Number of images skipped because of a data error.
    pub fn skipped_count(&self) -> usize {
        self.images
            .iter()
            .filter(|s| matches!(s.outcome, ImageOutcome::Skipped { .. }))
            .count()
    }

    /// One flat row per reported point, with coordinates in micrometers.
    pub fn rows(&self) -> Vec<PointRow> {
        let mut rows = Vec::with_capacity(self.point_count());
        for section in &self.images {
            let ImageOutcome::Calibrated { points, .. } = &section.outcome else {
                continue;
            };
            for point in points {
                let (stage_x_um, stage_y_um) = point.stage.to_micrometers();
                rows.push(PointRow {
                    image_id: section.image_id.as_u64(),
                    image: section.image_name.clone(),
                    region: point.region.clone().unwrap_or_default(),
                    point: point.name.clone(),
                    pixel_x: point.pixel.x,
                    pixel_y: point.pixel.y,
                    stage_x_um,
                    stage_y_um,
                });
            }
        }
        rows
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Showing X ; Y coordinates in micrometer")?;
        for section in &self.images {
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

/// The result for one image.
#[derive(Clone, Debug, Serialize)]
pub struct ImageSection {
    pub image_id: ImageId,
    pub image_name: String,
    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

impl ImageSection {
    /// A section for an image whose points were converted.
    ///
    /// Points whose stage coordinates are not finite are moved to the
    /// rejected list.
    pub fn calibrated(image: &ImageHandle, points: Vec<CalibratedPoint>) -> Self {
        let (points, rejected): (Vec<_>, Vec<_>) =
            points.into_iter().partition(|p| p.stage.is_finite());
        Self {
            image_id: image.id,
            image_name: image.name.clone(),
            outcome: ImageOutcome::Calibrated { points, rejected },
        }
    }

    /// A section for an image that could not be processed.
    pub fn skipped(image: &ImageHandle, error: ImageError) -> Self {
        Self {
            image_id: image.id,
            image_name: image.name.clone(),
            outcome: ImageOutcome::Skipped { error },
        }
    }
}

impl fmt::Display for ImageSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---------- {} ----------", self.image_name)?;
        match &self.outcome {
            ImageOutcome::Calibrated { points, rejected } => {
                for point in points {
                    let (x, y) = point.stage.to_micrometers();
                    writeln!(f, "{} [ {:.3} ; {:.3} ]", point.name, x, y)?;
                }
                for point in rejected {
                    writeln!(
                        f,
                        "  rejected {}: non-finite stage coordinates",
                        point.name
                    )?;
                }
            }
            ImageOutcome::Skipped { error } => writeln!(f, "  skipped: {}", error)?,
        }
        writeln!(f, "{}", SECTION_FOOTER)
    }
}

/// What happened to one image.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageOutcome {
    Calibrated {
        points: Vec<CalibratedPoint>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        rejected: Vec<CalibratedPoint>,
    },
    Skipped {
        #[serde(serialize_with = "serialize_display")]
        error: ImageError,
    },
}

/// A point annotation with its stage position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalibratedPoint {
    pub roi_id: RoiId,
    pub region: Option<String>,
    pub name: String,
    pub pixel: PixelPoint,
    /// Stage position in meters.
    #[serde(rename = "stage_m")]
    pub stage: Coord<Stage>,
}

/// A CSV row of the report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointRow {
    pub image_id: u64,
    pub image: String,
    pub region: String,
    pub point: String,
    pub pixel_x: i64,
    pub pixel_y: i64,
    pub stage_x_um: f64,
    pub stage_y_um: f64,
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
