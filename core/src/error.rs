use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    #[error("Invalid collection name '{0}'")]
    InvalidCollectionName(String),

    #[error("Cannot extract '{path}': {reason}")]
    Extraction { path: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ArchiveResult<T> = Result<T, ArchiveError>;
