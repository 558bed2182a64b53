use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Reference to an image held by the file-storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StoredFile {
    pub file_id: Uuid,
    pub url: String,
    pub mime_type: String,
    pub created_at: chrono::NaiveDateTime,
}
