//! Reading and writing store snapshot files.
//!
//! A snapshot file holds a complete [`StoreSnapshot`] as JSON, or as YAML
//! when the file name ends in `.yaml` or `.yml`. It is the on-disk form of
//! the store that the command-line tool operates on.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::StageError;
use crate::model::StoreSnapshot;

/// Serialization format of a snapshot file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Picks the format from the file extension (JSON unless `.yaml`/`.yml`).
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Reads a store snapshot from a file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_snapshot(path: &Path) -> Result<StoreSnapshot, StageError> {
    let file = File::open(path).map_err(StageError::Io)?;
    let reader = BufReader::new(file);

    match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| StageError::SnapshotJsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
        SnapshotFormat::Yaml => {
            serde_yaml::from_reader(reader).map_err(|source| StageError::SnapshotYamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Writes a store snapshot to a file.
///
/// The snapshot is written to a uniquely named temporary file in the same
/// directory, which then replaces `path`, so readers never see a partially
/// written snapshot. The temporary file is removed if writing fails.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<(), StageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(StageError::Io)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        match SnapshotFormat::from_path(path) {
            SnapshotFormat::Json => serde_json::to_writer_pretty(&mut writer, snapshot).map_err(
                |source| StageError::SnapshotJsonWrite {
                    path: path.to_path_buf(),
                    source,
                },
            )?,
            SnapshotFormat::Yaml => {
                serde_yaml::to_writer(&mut writer, snapshot).map_err(|source| {
                    StageError::SnapshotYamlWrite {
                        path: path.to_path_buf(),
                        source,
                    }
                })?
            }
        }
        writer.flush().map_err(StageError::Io)?;
    }

    tmp.persist(path)
        .map(|_| ())
        .map_err(|err| StageError::Io(err.error))
}

/// Reads a snapshot from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<StoreSnapshot, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes a snapshot to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(snapshot: &StoreSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}
