use std::path::PathBuf;
use thiserror::Error;

use crate::store::StoreError;
use crate::transform::ParseError;

/// The main error type for stagecoord operations.
///
/// These errors stop a whole batch. Problems confined to a single image are
/// reported as [`ImageError`] inside the batch report instead.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse store snapshot JSON from {path}: {source}")]
    SnapshotJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse store snapshot YAML from {path}: {source}")]
    SnapshotYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write store snapshot JSON to {path}: {source}")]
    SnapshotJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write store snapshot YAML to {path}: {source}")]
    SnapshotYamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown data type '{0}' (expected 'Image' or 'Dataset')")]
    UnknownDataType(String),

    #[error("Store call failed: {0}")]
    Store(#[from] StoreError),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),

    #[error("Failed to write report JSON: {0}")]
    ReportJson(#[source] serde_json::Error),

    #[error("Failed to write report CSV: {0}")]
    ReportCsv(#[from] csv::Error),
}

/// A problem with the data of one image.
///
/// The image is skipped and the batch moves on to the next one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImageError {
    #[error("missing metadata field `{key}` for image `{image}`")]
    MissingMetadataField { key: String, image: String },

    #[error("metadata field `{key}` for image `{image}` should be {expected}, found '{found}'")]
    InvalidMetadataValue {
        key: String,
        image: String,
        expected: &'static str,
        found: String,
    },

    #[error("malformed conversion matrix for image `{image}`: {source}")]
    MalformedTransformDescriptor {
        image: String,
        #[source]
        source: ParseError,
    },
}
