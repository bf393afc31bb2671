use std::sync::RwLock;

use otr_types::{ChangeRecord, HistoryEntry, HistoryLog};

use crate::error::HistoryResult;
use crate::traits::HistoryStore;

/// In-memory history store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock` and
/// cloned on load.
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HistoryLog> for InMemoryHistoryStore {
    fn from(log: HistoryLog) -> Self {
        Self {
            entries: RwLock::new(log.entries().to_vec()),
        }
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn try_load(&self) -> HistoryResult<HistoryLog> {
        let entries = self.entries.read().expect("lock poisoned");
        Ok(HistoryLog::from(entries.clone()))
    }

    fn append(&self, timestamp: &str, changes: Vec<ChangeRecord>) -> HistoryResult<()> {
        let mut entries = self.entries.write().expect("lock poisoned");
        entries.push(HistoryEntry::new(timestamp, changes));
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryHistoryStore")
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn append_is_monotonic() {
        let store = InMemoryHistoryStore::new();
        let first = vec![ChangeRecord::added("0.a", json!(1))];
        let second = vec![ChangeRecord::changed("0.a", json!(1), json!(2))];

        store.append("2024-01-01", first.clone()).unwrap();
        store.append("2024-01-02", second.clone()).unwrap();

        let log = store.load();
        assert_eq!(store.len(), 2);
        assert_eq!(log.entries()[0], HistoryEntry::new("2024-01-01", first));
        assert_eq!(log.entries()[1], HistoryEntry::new("2024-01-02", second));
    }

    #[test]
    fn seeded_from_existing_log() {
        let log = HistoryLog::from(vec![HistoryEntry::new("2024-01-01", Vec::new())]);
        let store = InMemoryHistoryStore::from(log.clone());
        assert_eq!(store.load(), log);
    }
}
