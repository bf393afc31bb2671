/// Errors produced while preparing a projection.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// The policy document could not be parsed.
    #[error("invalid translation policy: {0}")]
    InvalidPolicy(#[from] toml::de::Error),
}

/// Convenience alias for projection results.
pub type ProjectionResult<T> = Result<T, ProjectionError>;
