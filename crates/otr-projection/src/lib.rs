//! Read-time projection of the change history.
//!
//! Raw history records are keyed by full document paths and carry raw
//! payloads. Before display they are narrowed to one entity, filtered by a
//! caller-supplied [`TranslationPolicy`], relabeled, optionally redacted, and
//! have datetime payloads reformatted. The persisted log is never modified.

pub mod error;
pub mod policy;
pub mod projector;
pub mod render;
pub mod timestamp;

pub use error::{ProjectionError, ProjectionResult};
pub use policy::TranslationPolicy;
pub use projector::{HistoryProjector, ProjectedChange};
pub use render::RenderOptions;
pub use timestamp::display_date;
