use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("inconsistent change record at {key}: {reason}")]
    InconsistentRecord { key: String, reason: String },

    /// The bytes are not a JSON document at all.
    #[error("malformed JSON: {0}")]
    Syntax(String),

    /// Valid JSON whose shape does not match the expected type.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TypeError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            Self::Syntax(err.to_string())
        } else {
            Self::Serialization(err.to_string())
        }
    }
}
