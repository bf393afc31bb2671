//! Diff engine for the order tracker.
//!
//! Compares nested documents and produces a flat, path-keyed list of change
//! records in a deterministic order, ready to be appended to the history log.
//!
//! # Key Types
//!
//! - [`diff_documents`] -- Recursive document diff under a base path
//! - [`compare_snapshots`] / [`ChangeSet`] -- Diff of two entity lists, keyed by position

pub mod path_diff;
pub mod snapshot;

pub use path_diff::diff_documents;
pub use snapshot::{compare_snapshots, ChangeSet};
