use sqlx::PgPool;
use storage::models::{StoredFile, TryOnRequest};
use storage::repository::product::ProductRepository;
use storage::repository::stored_file::StoredFileRepository;
use storage::repository::try_on::TryOnRepository;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::files::FileStorageClient;
use crate::traits::{FileStore, JobImages, RequestStore};
use crate::Result;

/// Postgres-backed [`RequestStore`].
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RequestStore for PgRequestStore {
    async fn load(&self, request_id: Uuid) -> Result<TryOnRequest> {
        let request = TryOnRepository::new(&self.pool).find_by_id(request_id).await?;
        Ok(request)
    }

    async fn begin_processing(&self, request_id: Uuid) -> Result<TryOnRequest> {
        let request = TryOnRepository::new(&self.pool)
            .begin_processing(request_id)
            .await?;
        Ok(request)
    }

    async fn resolve_images(&self, request: &TryOnRequest) -> Result<JobImages> {
        let user_image = StoredFileRepository::new(&self.pool)
            .find_by_id(request.user_image_id)
            .await?;

        let product = ProductRepository::new(&self.pool)
            .find_by_id(request.product_id)
            .await?;

        let garment_image_url = product.thumbnail_url.ok_or_else(|| {
            PipelineError::GenerationError("product has no primary image".to_string())
        })?;

        Ok(JobImages {
            person_image_url: user_image.url,
            garment_image_url,
        })
    }

    async fn complete(&self, request_id: Uuid, result: &StoredFile) -> Result<()> {
        TryOnRepository::new(&self.pool)
            .complete(request_id, result.file_id)
            .await?;
        Ok(())
    }

    async fn fail(&self, request_id: Uuid, message: &str) -> Result<()> {
        TryOnRepository::new(&self.pool)
            .fail(request_id, message)
            .await?;
        Ok(())
    }
}

/// [`FileStore`] that talks to the external storage service and records
/// every uploaded object as a row in `stored_files`.
pub struct PgFileStore {
    pool: PgPool,
    client: FileStorageClient,
}

impl PgFileStore {
    pub fn new(pool: PgPool, client: FileStorageClient) -> Self {
        Self { pool, client }
    }
}

#[async_trait::async_trait]
impl FileStore for PgFileStore {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.client.download(url).await
    }

    async fn upload(&self, bytes: Vec<u8>, mime_type: &str) -> Result<StoredFile> {
        let url = self.client.upload(&bytes, mime_type).await?;

        let file = StoredFileRepository::new(&self.pool)
            .create(&url, mime_type)
            .await?;

        Ok(file)
    }
}
