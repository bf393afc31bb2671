use serde::{Deserialize, Serialize};

use crate::change::ChangeRecord;
use crate::error::TypeError;
use crate::Document;

/// One element of an entry's `changes` array as found on disk.
///
/// Elements that do not decode as a [`ChangeRecord`] (a numeric key, an
/// unknown operation) are kept verbatim so that rewriting the log on the
/// next append does not drop them. Readers skip them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoggedChange {
    Record(ChangeRecord),
    Unrecognized(Document),
}

impl LoggedChange {
    pub fn as_record(&self) -> Option<&ChangeRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<ChangeRecord> for LoggedChange {
    fn from(record: ChangeRecord) -> Self {
        Self::Record(record)
    }
}

/// One append batch: the changes detected by a single run.
///
/// The timestamp is a `YYYY-MM-DD` date string assigned at append time. It
/// is not a unique key; several runs on the same day produce several entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub changes: Vec<LoggedChange>,
}

impl HistoryEntry {
    pub fn new(timestamp: impl Into<String>, changes: Vec<ChangeRecord>) -> Self {
        Self {
            timestamp: timestamp.into(),
            changes: changes.into_iter().map(LoggedChange::from).collect(),
        }
    }

    /// Decodable change records, in recorded order.
    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.changes.iter().filter_map(LoggedChange::as_record)
    }

    /// Number of stored elements that are not change records.
    pub fn unrecognized(&self) -> usize {
        self.changes.len() - self.records().count()
    }
}

/// The append-only sequence of history entries, oldest first.
///
/// Persisted as a single JSON array of [`HistoryEntry`] objects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a log from its persisted JSON form.
    ///
    /// Bytes that are not JSON yield [`TypeError::Syntax`]; JSON of the wrong
    /// shape (not an array, an entry without a string timestamp) yields
    /// [`TypeError::Serialization`]. Individual malformed change records are
    /// not an error.
    pub fn from_json(bytes: &[u8]) -> Result<Self, TypeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the log into its persisted JSON form.
    pub fn to_json(&self) -> Result<Vec<u8>, TypeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Append an entry at the end of the log.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Entries in append order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the log has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of change records across all entries.
    pub fn change_count(&self) -> usize {
        self.entries.iter().map(|e| e.records().count()).sum()
    }
}

impl From<Vec<HistoryEntry>> for HistoryLog {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
