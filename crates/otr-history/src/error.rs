use std::path::PathBuf;

/// Errors from history and snapshot storage.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted file is not valid JSON.
    #[error("corrupt data: {0}")]
    Corrupt(String),

    /// The persisted data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The temporary file could not be renamed over the target.
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<otr_types::TypeError> for HistoryError {
    fn from(err: otr_types::TypeError) -> Self {
        match err {
            otr_types::TypeError::Syntax(msg) => Self::Corrupt(msg),
            other => Self::Serialization(other.to_string()),
        }
    }
}

/// Result alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
