use storage::models::{StoredFile, TryOnRequest};
use uuid::Uuid;

use crate::Result;

/// Inputs handed to the generation backend: raw image bytes plus the
/// optional hints the customer supplied at submission time.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub person_image: Vec<u8>,
    pub garment_image: Vec<u8>,
    pub pose_hint: Option<String>,
    pub background_hint: Option<String>,
}

/// Source image URLs resolved for one request.
#[derive(Debug, Clone)]
pub struct JobImages {
    pub person_image_url: String,
    pub garment_image_url: String,
}

/// The external image-generation endpoint.
#[async_trait::async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce the composited try-on image, returned as raw bytes.
    async fn generate(&self, job: GenerationJob) -> Result<Vec<u8>>;
}

/// The file-storage collaborator: source images are downloaded from it
/// and the generated result is uploaded back.
#[async_trait::async_trait]
pub trait FileStore: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;

    async fn upload(&self, bytes: Vec<u8>, mime_type: &str) -> Result<StoredFile>;
}

/// Persistence seam for the request state machine, so the pipeline can
/// be driven against an in-memory store in tests.
#[async_trait::async_trait]
pub trait RequestStore: Send + Sync {
    async fn load(&self, request_id: Uuid) -> Result<TryOnRequest>;

    /// Atomic pending -> processing transition; fails with INVALID_DATA
    /// when the request already left pending.
    async fn begin_processing(&self, request_id: Uuid) -> Result<TryOnRequest>;

    /// Resolve the user photo and the product's primary image for a
    /// request.
    async fn resolve_images(&self, request: &TryOnRequest) -> Result<JobImages>;

    async fn complete(&self, request_id: Uuid, result: &StoredFile) -> Result<()>;

    async fn fail(&self, request_id: Uuid, message: &str) -> Result<()>;
}
