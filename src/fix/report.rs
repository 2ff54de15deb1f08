//! Report types for the field overwrite commands.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::ImageError;
use crate::model::ImageId;

/// Per-image results of an overwrite command.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FixReport {
    pub images: Vec<FixEntry>,
}

impl FixReport {
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    pub fn push(&mut self, entry: FixEntry) {
        self.images.push(entry);
    }

    pub fn updated_count(&self) -> usize {
        self.images
            .iter()
            .filter(|e| matches!(e.status, FixStatus::Updated { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.images.len() - self.updated_count()
    }

    /// Short summary, e.g. `Updated 3 image(s), skipped 1`.
    pub fn summary(&self) -> String {
        format!(
            "Updated {} image(s), skipped {}",
            self.updated_count(),
            self.skipped_count()
        )
    }
}

impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.images {
            match &entry.status {
                FixStatus::Updated { fields } => {
                    writeln!(f, "  updated {}: {}", entry.image_name, fields.join(", "))?
                }
                FixStatus::Skipped { error } => {
                    writeln!(f, "  skipped {}: {}", entry.image_name, error)?
                }
            }
        }
        Ok(())
    }
}

/// The result for one image.
#[derive(Clone, Debug, Serialize)]
pub struct FixEntry {
    pub image_id: ImageId,
    pub image_name: String,
    #[serde(flatten)]
    pub status: FixStatus,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FixStatus {
    /// The listed fields were written.
    Updated { fields: Vec<String> },
    Skipped {
        #[serde(serialize_with = "serialize_display")]
        error: ImageError,
    },
}

fn serialize_display<T: fmt::Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
