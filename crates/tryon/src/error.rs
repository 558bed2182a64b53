use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Generation failed: {0}")]
    GenerationError(String),

    #[error("File transfer failed: {0}")]
    FileTransferError(String),

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}

impl PipelineError {
    /// Whether the error means the request never legally entered
    /// processing (missing row or wrong state), as opposed to a failure
    /// of the generation itself.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PipelineError::StorageError(e) if matches!(
                e,
                storage::StorageError::NotFound
                    | storage::StorageError::MissingEntity(_)
                    | storage::StorageError::InvalidData(_)
            )
        )
    }
}
