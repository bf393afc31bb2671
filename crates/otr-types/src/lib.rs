//! Foundation types for the order tracker (OTR).
//!
//! Every other OTR crate depends on `otr-types`. The types here are the data
//! contract between the diff engine, which produces change records, and the
//! history store, which persists them.
//!
//! # Key Types
//!
//! - [`Document`] — Schema-agnostic nested value (alias of `serde_json::Value`)
//! - [`ChangeRecord`] / [`Operation`] — One path-addressed difference
//! - [`HistoryEntry`] — One timestamped batch of change records
//! - [`HistoryLog`] — The append-only sequence of entries

pub mod change;
pub mod error;
pub mod history;

pub use change::{ChangeRecord, Operation};
pub use error::TypeError;
pub use history::{HistoryEntry, HistoryLog, LoggedChange};

/// An arbitrarily nested value: scalar, ordered sequence, or string-keyed
/// mapping. Mapping keys keep their document order.
pub type Document = serde_json::Value;
