use thiserror::Error;

/// Top-level error type for the Droplink runtime.
#[derive(Debug, Error)]
pub enum DropError {
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("a file record with id {0} already exists")]
    DuplicateId(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
