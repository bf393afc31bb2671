use otr_types::{ChangeRecord, HistoryLog};
use tracing::warn;

use crate::error::HistoryResult;

/// Append-only store of timestamped change batches.
///
/// All implementations must satisfy these invariants:
/// - `append` adds exactly one entry at the end and leaves earlier entries
///   untouched, including change records it cannot decode.
/// - `append` discards existing content only when it is not JSON at all;
///   any other load failure is returned without writing.
/// - Entries sharing a timestamp are all retained.
/// - `append` does not filter: an empty `changes` list still produces an
///   entry, so callers skip the call when nothing changed.
pub trait HistoryStore: Send + Sync {
    /// Read the whole log, reporting missing or malformed data as an error.
    fn try_load(&self) -> HistoryResult<HistoryLog>;

    /// Append one entry stamped with `timestamp`.
    fn append(&self, timestamp: &str, changes: Vec<ChangeRecord>) -> HistoryResult<()>;

    /// Read the whole log. Any read failure yields an empty log.
    fn load(&self) -> HistoryLog {
        self.try_load().unwrap_or_else(|err| {
            warn!(error = %err, "history unavailable; treating as empty");
            HistoryLog::new()
        })
    }
}
