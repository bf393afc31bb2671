use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use otr_types::Document;
use tracing::{debug, warn};

use crate::error::{HistoryError, HistoryResult};
use crate::file::write_atomic;

/// The most recently fetched entity list, kept on disk between runs.
///
/// The next run diffs its fresh snapshot against this one and then replaces
/// it. A missing or unreadable cache means there is nothing to compare
/// against yet.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Previous snapshot, or `None` when there is none or it cannot be read.
    pub fn load(&self) -> Option<Vec<Document>> {
        match self.try_load() {
            Ok(entities) => entities,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "snapshot cache unreadable");
                None
            }
        }
    }

    /// Previous snapshot with read failures reported.
    pub fn try_load(&self) -> HistoryResult<Option<Vec<Document>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entities = serde_json::from_slice(&bytes)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;
        Ok(Some(entities))
    }

    /// Replace the cached snapshot.
    pub fn save(&self, entities: &[Document]) -> HistoryResult<()> {
        let bytes =
            serde_json::to_vec(entities).map_err(|e| HistoryError::Serialization(e.to_string()))?;
        write_atomic(&self.path, &bytes)?;
        debug!(path = %self.path.display(), entities = entities.len(), "snapshot cached");
        Ok(())
    }
}
