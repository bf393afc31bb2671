use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use otr_types::{ChangeRecord, HistoryEntry, HistoryLog};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{HistoryError, HistoryResult};
use crate::traits::HistoryStore;

/// History log persisted as one JSON document on disk.
///
/// Appends rewrite the entire file: the new content is written to a
/// temporary file in the same directory, synced, and renamed over the
/// target, so readers see either the previous or the new log and never a
/// truncated one.
///
/// The internal mutex only serializes appends made through this handle.
/// Separate processes appending to the same path still race.
pub struct FileHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileHistoryStore {
    /// Use the log at `path`. Nothing is touched until the first append,
    /// which also creates missing parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn try_load(&self) -> HistoryResult<HistoryLog> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(HistoryLog::from_json(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HistoryLog::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn append(&self, timestamp: &str, changes: Vec<ChangeRecord>) -> HistoryResult<()> {
        let _guard = self.write_lock.lock().expect("history mutex poisoned");

        // Only a file that is not JSON at all is replaced. A log of the wrong
        // shape or one that cannot be read is left untouched.
        let mut log = match self.try_load() {
            Ok(log) => log,
            Err(HistoryError::Corrupt(reason)) => {
                warn!(path = %self.path.display(), %reason, "history file corrupt, starting a new log");
                HistoryLog::new()
            }
            Err(e) => return Err(e),
        };
        let count = changes.len();
        log.push(HistoryEntry::new(timestamp, changes));

        write_atomic(&self.path, &log.to_json()?)?;

        debug!(
            path = %self.path.display(),
            timestamp,
            changes = count,
            entries = log.len(),
            "history append"
        );
        Ok(())
    }
}

impl std::fmt::Debug for FileHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHistoryStore")
            .field("path", &self.path)
            .finish()
    }
}

/// Replace `path` with `bytes` via a synced temporary file and a rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> HistoryResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| HistoryError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
