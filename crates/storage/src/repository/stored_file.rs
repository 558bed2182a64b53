use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::StoredFile;

pub struct StoredFileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoredFileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, url: &str, mime_type: &str) -> Result<StoredFile> {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            INSERT INTO stored_files (url, mime_type)
            VALUES ($1, $2)
            RETURNING file_id, url, mime_type, created_at
            "#,
        )
        .bind(url)
        .bind(mime_type)
        .fetch_one(self.pool)
        .await?;

        Ok(file)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<StoredFile> {
        let file = sqlx::query_as::<_, StoredFile>(
            r#"
            SELECT file_id, url, mime_type, created_at
            FROM stored_files
            WHERE file_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("file"))?;

        Ok(file)
    }
}
