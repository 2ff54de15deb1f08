//! Object model for the image store.
//!
//! This module defines the images, datasets, regions of interest and shapes
//! that the stage-coordinate pipeline reads, plus typed coordinates that keep
//! pixel positions and physical stage positions apart.
//!
//! # Example
//!
//! ```
//! use stagecoord::model::{Dataset, Image, Roi, Shape, StoreSnapshot};
//!
//! let snapshot = StoreSnapshot {
//!     images: vec![Image::new(1u64, "grid_01.tif")
//!         .with_roi(Roi::new(1u64).named("hole A").with_shape(Shape::point(10.0, 20.0)))],
//!     datasets: vec![Dataset::new(100u64, "grids", [1])],
//! };
//! assert_eq!(snapshot.images.len(), 1);
//! ```

mod coord;
mod ids;
mod objects;
mod space;

// Re-export core types for convenient access
pub use coord::{Coord, MICROMETERS_PER_METER};
pub use ids::{DatasetId, ImageId, RoiId};
pub use objects::{Channel, Dataset, Image, Length, LengthUnit, Pixels, Roi, Shape, StoreSnapshot};
pub use space::{Pixel, Stage};
