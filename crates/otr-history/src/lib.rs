//! Append-only change history for the order tracker.
//!
//! The history is a single JSON array of timestamped entries. Every append
//! reads the current log, pushes one entry, and rewrites the whole file.
//!
//! # Storage Backends
//!
//! All backends implement the [`HistoryStore`] trait:
//!
//! - [`FileHistoryStore`] -- JSON file replaced atomically on every append
//! - [`InMemoryHistoryStore`] -- `Vec`-based store for tests and embedding
//!
//! [`SnapshotCache`] keeps the previously fetched entity list so the next run
//! has something to diff against.
//!
//! # Design Rules
//!
//! 1. Entries are never modified, reordered, or deleted once appended.
//! 2. A missing or unparseable log reads as empty; reads never fail.
//! 3. Write failures are propagated with the underlying I/O error.
//! 4. One writer per history file. Concurrent appends can lose entries.

pub mod error;
pub mod file;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use error::{HistoryError, HistoryResult};
pub use file::FileHistoryStore;
pub use memory::InMemoryHistoryStore;
pub use snapshot::SnapshotCache;
pub use traits::HistoryStore;
