use std::sync::Arc;

use storage::models::{StoredFile, TryOnRequest, TryOnStatus};
use uuid::Uuid;

use crate::traits::{FileStore, GenerationBackend, GenerationJob, RequestStore};
use crate::Result;

const RESULT_MIME_TYPE: &str = "image/png";

/// Drives a try-on request through its state machine: fetch both source
/// images, call the generation backend, upload the result.
///
/// Failures during generation are captured as the terminal `failed`
/// state rather than propagated, so a polling client always observes a
/// terminal status. Only precondition errors (missing request, wrong
/// state) surface to the caller.
pub struct TryOnPipeline {
    store: Arc<dyn RequestStore>,
    files: Arc<dyn FileStore>,
    backend: Arc<dyn GenerationBackend>,
}

impl TryOnPipeline {
    pub fn new(
        store: Arc<dyn RequestStore>,
        files: Arc<dyn FileStore>,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            store,
            files,
            backend,
        }
    }

    /// Run generation for one request, returning its terminal status.
    ///
    /// Errors are returned only when the request never legally entered
    /// processing (not found, already started) or when recording the
    /// failure itself fails.
    pub async fn run(&self, request_id: Uuid) -> Result<TryOnStatus> {
        let request = self.store.load(request_id).await?;
        request.ensure_pending().map_err(crate::PipelineError::from)?;

        let request = self.store.begin_processing(request_id).await?;

        match self.generate(&request).await {
            Ok(result) => {
                self.store.complete(request_id, &result).await?;
                tracing::info!("Try-on request {} completed", request_id);
                Ok(TryOnStatus::Completed)
            }
            Err(e) => {
                tracing::warn!("Try-on request {} failed: {}", request_id, e);
                self.store.fail(request_id, &e.to_string()).await?;
                Ok(TryOnStatus::Failed)
            }
        }
    }

    async fn generate(&self, request: &TryOnRequest) -> Result<StoredFile> {
        let images = self.store.resolve_images(request).await?;

        let person_image = self.files.download(&images.person_image_url).await?;
        let garment_image = self.files.download(&images.garment_image_url).await?;

        let result_bytes = self
            .backend
            .generate(GenerationJob {
                person_image,
                garment_image,
                pose_hint: request.hint("pose"),
                background_hint: request.hint("background"),
            })
            .await?;

        self.files.upload(result_bytes, RESULT_MIME_TYPE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::traits::JobImages;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use storage::StorageError;

    struct InMemoryStore {
        requests: Mutex<HashMap<Uuid, TryOnRequest>>,
    }

    impl InMemoryStore {
        fn with_pending(request_id: Uuid) -> Self {
            let created = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            let request = TryOnRequest {
                request_id,
                customer_id: Uuid::new_v4(),
                product_id: Uuid::new_v4(),
                user_image_id: Uuid::new_v4(),
                result_image_id: None,
                status: TryOnStatus::Pending,
                metadata: sqlx::types::Json(serde_json::json!({"pose": "standing"})),
                created_at: created,
                updated_at: created,
                deleted_at: None,
            };
            Self {
                requests: Mutex::new(HashMap::from([(request_id, request)])),
            }
        }

        fn status_of(&self, request_id: Uuid) -> TryOnStatus {
            self.requests.lock().unwrap()[&request_id].status
        }

        fn error_of(&self, request_id: Uuid) -> Option<String> {
            self.requests.lock().unwrap()[&request_id]
                .metadata
                .get("error")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        }
    }

    #[async_trait::async_trait]
    impl RequestStore for InMemoryStore {
        async fn load(&self, request_id: Uuid) -> Result<TryOnRequest> {
            self.requests
                .lock()
                .unwrap()
                .get(&request_id)
                .cloned()
                .ok_or_else(|| StorageError::MissingEntity("try-on request").into())
        }

        async fn begin_processing(&self, request_id: Uuid) -> Result<TryOnRequest> {
            let mut requests = self.requests.lock().unwrap();
            let request = requests
                .get_mut(&request_id)
                .ok_or(StorageError::MissingEntity("try-on request"))?;
            if request.status != TryOnStatus::Pending {
                return Err(StorageError::InvalidData(format!(
                    "generation can only start from pending, request is {}",
                    request.status
                ))
                .into());
            }
            request.status = TryOnStatus::Processing;
            Ok(request.clone())
        }

        async fn resolve_images(&self, _request: &TryOnRequest) -> Result<JobImages> {
            Ok(JobImages {
                person_image_url: "https://files.test/person.png".to_string(),
                garment_image_url: "https://files.test/garment.png".to_string(),
            })
        }

        async fn complete(&self, request_id: Uuid, result: &StoredFile) -> Result<()> {
            let mut requests = self.requests.lock().unwrap();
            let request = requests.get_mut(&request_id).unwrap();
            assert_eq!(request.status, TryOnStatus::Processing);
            request.status = TryOnStatus::Completed;
            request.result_image_id = Some(result.file_id);
            Ok(())
        }

        async fn fail(&self, request_id: Uuid, message: &str) -> Result<()> {
            let mut requests = self.requests.lock().unwrap();
            let request = requests.get_mut(&request_id).unwrap();
            assert_eq!(request.status, TryOnStatus::Processing);
            request.status = TryOnStatus::Failed;
            request.metadata.0["error"] = serde_json::json!(message);
            Ok(())
        }
    }

    struct StubFiles {
        fail_download: bool,
        fail_upload: bool,
    }

    impl StubFiles {
        fn working() -> Self {
            Self {
                fail_download: false,
                fail_upload: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl FileStore for StubFiles {
        async fn download(&self, url: &str) -> Result<Vec<u8>> {
            if self.fail_download {
                return Err(PipelineError::FileTransferError(format!(
                    "Download of {} failed: connection refused",
                    url
                )));
            }
            Ok(vec![1, 2, 3])
        }

        async fn upload(&self, _bytes: Vec<u8>, mime_type: &str) -> Result<StoredFile> {
            if self.fail_upload {
                return Err(PipelineError::FileTransferError(
                    "Upload failed with status 503".to_string(),
                ));
            }
            Ok(StoredFile {
                file_id: Uuid::new_v4(),
                url: "https://files.test/result.png".to_string(),
                mime_type: mime_type.to_string(),
                created_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            })
        }
    }

    struct StubBackend {
        fail: bool,
        seen_hints: Mutex<Option<(Option<String>, Option<String>)>>,
    }

    impl StubBackend {
        fn working() -> Self {
            Self {
                fail: false,
                seen_hints: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                seen_hints: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl GenerationBackend for StubBackend {
        async fn generate(&self, job: GenerationJob) -> Result<Vec<u8>> {
            *self.seen_hints.lock().unwrap() =
                Some((job.pose_hint.clone(), job.background_hint.clone()));
            if self.fail {
                return Err(PipelineError::GenerationError(
                    "Generation API error (500): model crashed".to_string(),
                ));
            }
            Ok(vec![9, 9, 9])
        }
    }

    fn pipeline(
        store: Arc<InMemoryStore>,
        files: StubFiles,
        backend: StubBackend,
    ) -> TryOnPipeline {
        TryOnPipeline::new(store, Arc::new(files), Arc::new(backend))
    }

    #[tokio::test]
    async fn test_successful_run_completes_with_result_image() {
        let request_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::with_pending(request_id));
        let pipeline = pipeline(store.clone(), StubFiles::working(), StubBackend::working());

        let status = pipeline.run(request_id).await.unwrap();

        assert_eq!(status, TryOnStatus::Completed);
        assert_eq!(store.status_of(request_id), TryOnStatus::Completed);
        assert!(
            store.requests.lock().unwrap()[&request_id]
                .result_image_id
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_backend_failure_lands_in_failed_with_message() {
        let request_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::with_pending(request_id));
        let pipeline = pipeline(store.clone(), StubFiles::working(), StubBackend::failing());

        let status = pipeline.run(request_id).await.unwrap();

        assert_eq!(status, TryOnStatus::Failed);
        assert_eq!(store.status_of(request_id), TryOnStatus::Failed);
        let message = store.error_of(request_id).unwrap();
        assert!(message.contains("model crashed"));
    }

    #[tokio::test]
    async fn test_download_failure_lands_in_failed() {
        let request_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::with_pending(request_id));
        let files = StubFiles {
            fail_download: true,
            fail_upload: false,
        };
        let pipeline = pipeline(store.clone(), files, StubBackend::working());

        let status = pipeline.run(request_id).await.unwrap();

        assert_eq!(status, TryOnStatus::Failed);
        assert!(store.error_of(request_id).unwrap().contains("Download"));
    }

    #[tokio::test]
    async fn test_upload_failure_lands_in_failed() {
        let request_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::with_pending(request_id));
        let files = StubFiles {
            fail_download: false,
            fail_upload: true,
        };
        let pipeline = pipeline(store.clone(), files, StubBackend::working());

        let status = pipeline.run(request_id).await.unwrap();

        assert_eq!(status, TryOnStatus::Failed);
        assert!(store.error_of(request_id).unwrap().contains("Upload"));
    }

    #[tokio::test]
    async fn test_second_run_is_rejected_as_invalid_data() {
        let request_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::with_pending(request_id));
        let pipeline = pipeline(store.clone(), StubFiles::working(), StubBackend::working());

        pipeline.run(request_id).await.unwrap();
        let second = pipeline.run(request_id).await;

        assert!(matches!(
            second,
            Err(PipelineError::StorageError(StorageError::InvalidData(_)))
        ));
        // The completed result is untouched.
        assert_eq!(store.status_of(request_id), TryOnStatus::Completed);
    }

    #[tokio::test]
    async fn test_unknown_request_is_not_found() {
        let store = Arc::new(InMemoryStore::with_pending(Uuid::new_v4()));
        let pipeline = pipeline(store, StubFiles::working(), StubBackend::working());

        let result = pipeline.run(Uuid::new_v4()).await;

        assert!(matches!(
            result,
            Err(PipelineError::StorageError(StorageError::MissingEntity(_)))
        ));
    }

    #[tokio::test]
    async fn test_hints_are_forwarded_to_backend() {
        let request_id = Uuid::new_v4();
        let store = Arc::new(InMemoryStore::with_pending(request_id));
        let backend = Arc::new(StubBackend::working());
        let pipeline = TryOnPipeline::new(store, Arc::new(StubFiles::working()), backend.clone());

        pipeline.run(request_id).await.unwrap();

        let hints = backend.seen_hints.lock().unwrap().clone().unwrap();
        assert_eq!(hints.0.as_deref(), Some("standing"));
        assert_eq!(hints.1, None);
    }
}
