//! Object model of the image store.
//!
//! These types mirror what the store holds for each image: its acquisition
//! metadata, its regions of interest with their shapes, and the pixel
//! calibration fields that the overwrite commands update.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{DatasetId, ImageId, RoiId};
use crate::metadata::MetadataMap;

/// Everything a store holds: images and the datasets that group them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All images in the store.
    #[serde(default)]
    pub images: Vec<Image>,

    /// All datasets in the store.
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

/// A microscopy image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,

    /// Display name of the image.
    pub name: String,

    /// Acquisition metadata attached to the image.
    #[serde(default)]
    pub metadata: MetadataMap,

    /// Regions of interest drawn on the image.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rois: Vec<Roi>,

    /// Pixel calibration and per-channel display settings.
    #[serde(default)]
    pub pixels: Pixels,
}

impl Image {
    /// Creates an image with empty metadata and no regions.
    pub fn new(id: impl Into<ImageId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata: MetadataMap::new(),
            rois: Vec::new(),
            pixels: Pixels::default(),
        }
    }

    /// Replaces the metadata of this image.
    pub fn with_metadata(mut self, metadata: MetadataMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds a region of interest.
    pub fn with_roi(mut self, roi: Roi) -> Self {
        self.rois.push(roi);
        self
    }

    /// Sets the number of channels, each without global min/max.
    pub fn with_channels(mut self, count: usize) -> Self {
        self.pixels.channels = vec![Channel::default(); count];
        self
    }
}

/// A dataset: an ordered group of images.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,

    /// Display name of the dataset.
    pub name: String,

    /// Member images, in display order.
    #[serde(default)]
    pub image_ids: Vec<ImageId>,
}

impl Dataset {
    pub fn new(
        id: impl Into<DatasetId>,
        name: impl Into<String>,
        image_ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_ids: image_ids.into_iter().map(ImageId::new).collect(),
        }
    }
}

/// A region of interest: an optionally named group of shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub id: RoiId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Roi {
    /// Creates an unnamed region without shapes.
    pub fn new(id: impl Into<RoiId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            shapes: Vec::new(),
        }
    }

    /// Sets the region name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a shape to the region.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }
}

/// A geometric shape drawn on an image, in pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Point {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Polyline {
        points: Vec<[f64; 2]>,
    },
    Polygon {
        points: Vec<[f64; 2]>,
    },
    Label {
        x: f64,
        y: f64,
        text: String,
    },
    Mask {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl Shape {
    /// Creates an unlabeled point.
    pub fn point(x: f64, y: f64) -> Self {
        Shape::Point { x, y, text: None }
    }

    /// Creates a labeled point.
    pub fn labeled_point(x: f64, y: f64, text: impl Into<String>) -> Self {
        Shape::Point {
            x,
            y,
            text: Some(text.into()),
        }
    }

    /// The serialized kind name of this shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point { .. } => "point",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Line { .. } => "line",
            Shape::Polyline { .. } => "polyline",
            Shape::Polygon { .. } => "polygon",
            Shape::Label { .. } => "label",
            Shape::Mask { .. } => "mask",
        }
    }

    pub fn is_point(&self) -> bool {
        matches!(self, Shape::Point { .. })
    }
}

/// Pixel calibration of an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pixels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_size_x: Option<Length>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_size_y: Option<Length>,

    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// Display settings of one channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_max: Option<f64>,
}

/// A physical length with its unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub fn nanometers(value: f64) -> Self {
        Self::new(value, LengthUnit::Nanometer)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

/// Units a [`Length`] can be expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Nanometer,
    Micrometer,
    Millimeter,
}

impl LengthUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Nanometer => "nm",
            LengthUnit::Micrometer => "µm",
            LengthUnit::Millimeter => "mm",
        }
    }
}
