//! Pixel-to-stage coordinate conversion.
//!
//! Each image carries a "Conversion matrix" metadata entry: six numbers
//! `(a, b, c, d, e, f)` describing an affine map from pixel coordinates to
//! physical stage coordinates. The linear part `[[a, b], [c, d]]` is stored
//! in nanometers per pixel and the offset `(e, f)` in micrometers; both are
//! converted to meters when the descriptor is built:
//!
//! ```text
//! stage_x = a * pixel_x + b * pixel_y + e
//! stage_y = c * pixel_x + d * pixel_y + f
//! ```

mod parse;

pub use parse::{parse_coefficients, ParseError, DESCRIPTOR_LEN};

use serde::Serialize;

use crate::error::ImageError;
use crate::metadata::{MetadataMap, MetadataValue};
use crate::model::{Coord, Pixel, Stage};

/// Metadata key holding the conversion matrix.
pub const CONVERSION_MATRIX_KEY: &str = "Conversion matrix";

/// Scale applied to the linear coefficients `(a, b, c, d)`.
pub const LINEAR_SCALE: f64 = 1e-9;

/// Scale applied to the offset coefficients `(e, f)`.
pub const OFFSET_SCALE: f64 = 1e-6;

/// A scaled affine pixel-to-stage transform.
///
/// Built only from raw stored coefficients, so the unit scaling is applied
/// exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffineDescriptor {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl AffineDescriptor {
    /// Builds a descriptor from raw stored coefficients, applying the unit
    /// scales.
    pub fn from_raw(raw: [f64; DESCRIPTOR_LEN]) -> Self {
        let [a, b, c, d, e, f] = raw;
        Self {
            a: a * LINEAR_SCALE,
            b: b * LINEAR_SCALE,
            c: c * LINEAR_SCALE,
            d: d * LINEAR_SCALE,
            e: e * OFFSET_SCALE,
            f: f * OFFSET_SCALE,
        }
    }

    /// Returns the coefficients in their stored (unscaled) units.
    pub fn to_raw(&self) -> [f64; DESCRIPTOR_LEN] {
        [
            self.a / LINEAR_SCALE,
            self.b / LINEAR_SCALE,
            self.c / LINEAR_SCALE,
            self.d / LINEAR_SCALE,
            self.e / OFFSET_SCALE,
            self.f / OFFSET_SCALE,
        ]
    }

    /// Returns the scaled coefficients `[a, b, c, d, e, f]`.
    pub fn coefficients(&self) -> [f64; DESCRIPTOR_LEN] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// The scaled offset `(e, f)`, in meters.
    pub fn offset(&self) -> Coord<Stage> {
        Coord::new(self.e, self.f)
    }

    /// Parses conversion matrix text and scales it.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_coefficients(text).map(Self::from_raw)
    }

    /// Reads a descriptor from a metadata value.
    ///
    /// Text is parsed with [`parse_coefficients`]; a list value must hold
    /// exactly six numbers.
    pub fn from_metadata(value: &MetadataValue) -> Result<Self, ParseError> {
        match value {
            MetadataValue::Text(text) => Self::parse(text),
            MetadataValue::List(items) => {
                let mut raw = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        MetadataValue::Number(n) => raw.push(*n),
                        other => {
                            return Err(ParseError::NonNumeric {
                                index,
                                token: other.to_string(),
                            })
                        }
                    }
                }
                let found = raw.len();
                let raw: [f64; DESCRIPTOR_LEN] = raw
                    .try_into()
                    .map_err(|_| ParseError::WrongLength { found })?;
                Ok(Self::from_raw(raw))
            }
            other => Err(ParseError::UnsupportedValue {
                found: other.kind(),
            }),
        }
    }

    /// Returns true if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coefficients().iter().all(|c| c.is_finite())
    }

    /// Maps a pixel position to a stage position in meters.
    ///
    /// Non-finite coefficients propagate into the result rather than
    /// failing.
    #[inline]
    pub fn apply(&self, pixel: Coord<Pixel>) -> Coord<Stage> {
        Coord::new(
            self.a * pixel.x + self.b * pixel.y + self.e,
            self.c * pixel.x + self.d * pixel.y + self.f,
        )
    }
}

/// Maps integer pixel coordinates to stage meters.
#[inline]
pub fn to_stage(descriptor: &AffineDescriptor, pixel_x: i64, pixel_y: i64) -> Coord<Stage> {
    descriptor.apply(Coord::new(pixel_x as f64, pixel_y as f64))
}

/// Reads and parses the conversion matrix of an image.
///
/// # Errors
/// [`ImageError::MissingMetadataField`] when the key is absent and
/// [`ImageError::MalformedTransformDescriptor`] when its value does not parse.
pub fn descriptor_for_image(
    metadata: &MetadataMap,
    image_name: &str,
) -> Result<AffineDescriptor, ImageError> {
    let value = metadata.require(CONVERSION_MATRIX_KEY, image_name)?;
    AffineDescriptor::from_metadata(value).map_err(|source| {
        ImageError::MalformedTransformDescriptor {
            image: image_name.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tol = 1e-12 * expected.abs().max(1e-9);
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identity_descriptor_is_scaled() {
        let descriptor = AffineDescriptor::parse("[1,0,0,1,0,0]").unwrap();
        assert_eq!(descriptor.coefficients(), [1e-9, 0.0, 0.0, 1e-9, 0.0, 0.0]);
    }

    #[test]
    fn test_identity_maps_pixels_to_nanometers() {
        let descriptor = AffineDescriptor::parse("[1,0,0,1,0,0]").unwrap();
        let stage = to_stage(&descriptor, 1000, 2000);

        assert_close(stage.x, 1e-6);
        assert_close(stage.y, 2e-6);

        let (x_um, y_um) = stage.to_micrometers();
        assert_close(x_um, 1.0);
        assert_close(y_um, 2.0);
    }

    #[test]
    fn test_rotation_and_offset() {
        // 90 degree rotation at 1 µm per pixel, offset (10 µm, 20 µm).
        let descriptor = AffineDescriptor::parse("[0, 1000, -1000, 0, 10, 20]").unwrap();
        let (x_um, y_um) = to_stage(&descriptor, 100, 200).to_micrometers();

        assert_close(x_um, 210.0);
        assert_close(y_um, -80.0);
    }

    #[test]
    fn test_origin_maps_to_offset() {
        let descriptor = AffineDescriptor::from_raw([3.0, -2.0, 7.5, 1.0, 150.0, -42.0]);
        let stage = to_stage(&descriptor, 0, 0);
        assert_eq!(stage, descriptor.offset());
        assert_close(stage.x, 150e-6);
        assert_close(stage.y, -42e-6);
    }

    #[test]
    fn test_non_finite_coefficients_propagate() {
        let descriptor = AffineDescriptor::from_raw([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert!(!descriptor.is_finite());
        assert!(!to_stage(&descriptor, 1, 1).is_finite());
    }

    #[test]
    fn test_from_metadata_list_value() {
        let value = MetadataValue::List(vec![
            1.0.into(),
            0.0.into(),
            0.0.into(),
            1.0.into(),
            5.0.into(),
            6.0.into(),
        ]);
        let descriptor = AffineDescriptor::from_metadata(&value).unwrap();
        for (actual, expected) in descriptor.to_raw().iter().zip([1.0, 0.0, 0.0, 1.0, 5.0, 6.0]) {
            assert!((actual - expected).abs() < 1e-9);
        }

        let short = MetadataValue::List(vec![1.0.into()]);
        assert_eq!(
            AffineDescriptor::from_metadata(&short),
            Err(ParseError::WrongLength { found: 1 })
        );
    }

    #[test]
    fn test_from_metadata_rejects_other_shapes() {
        assert_eq!(
            AffineDescriptor::from_metadata(&MetadataValue::Number(1.0)),
            Err(ParseError::UnsupportedValue { found: "number" })
        );
    }

    #[test]
    fn test_descriptor_for_image_errors() {
        let metadata = MetadataMap::new();
        assert_eq!(
            descriptor_for_image(&metadata, "grid.tif"),
            Err(ImageError::MissingMetadataField {
                key: CONVERSION_MATRIX_KEY.to_string(),
                image: "grid.tif".to_string(),
            })
        );

        let metadata = MetadataMap::new().with(CONVERSION_MATRIX_KEY, "[1, 2, 3]");
        let err = descriptor_for_image(&metadata, "grid.tif").unwrap_err();
        assert!(matches!(
            err,
            ImageError::MalformedTransformDescriptor {
                source: ParseError::WrongLength { found: 3 },
                ..
            }
        ));
    }
}
