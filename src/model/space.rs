//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! between different coordinate systems at compile time.

use std::fmt;

/// Marker type for pixel coordinates on an image.
///
/// (0, 0) is the top-left corner of the image, x grows to the right and y
/// grows downwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for physical stage coordinates, in meters.
///
/// Values in this space come out of an affine pixel-to-stage conversion and
/// are only converted to micrometers when they are reported.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {} // This is unreachable since Pixel has no variants
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
