use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid project document: {0}")]
    InvalidDocument(String),

    #[error("Operator '{operator}' is already assigned to track {track}")]
    OperatorInUse { operator: String, track: usize },

    #[error("Invalid share code: {0}")]
    ShareCode(String),

    #[error("PNG metadata error: {0}")]
    PngMetadata(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
