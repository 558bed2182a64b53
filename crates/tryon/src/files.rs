use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::Result;

#[derive(Debug, Serialize)]
struct UploadRequestBody {
    data: String,
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    url: String,
}

/// Raw transport against the file-storage service: downloads by URL,
/// uploads returning the public URL of the stored object.
pub struct FileStorageClient {
    client: Client,
    base_url: String,
}

impl FileStorageClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            PipelineError::FileTransferError(format!("Download of {} failed: {}", url, e))
        })?;

        if !response.status().is_success() {
            return Err(PipelineError::FileTransferError(format!(
                "Download of {} failed with status {}",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            PipelineError::FileTransferError(format!("Reading body of {} failed: {}", url, e))
        })?;

        if bytes.is_empty() {
            return Err(PipelineError::InvalidImage(format!(
                "Downloaded image {} is empty",
                url
            )));
        }

        Ok(bytes.to_vec())
    }

    /// Upload image bytes; returns the URL the storage service assigned.
    pub async fn upload(&self, bytes: &[u8], mime_type: &str) -> Result<String> {
        let body = UploadRequestBody {
            data: BASE64.encode(bytes),
            mime_type: mime_type.to_string(),
        };

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::FileTransferError(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::FileTransferError(format!(
                "Upload failed with status {}: {}",
                status, error_text
            )));
        }

        let body: UploadResponseBody = response.json().await.map_err(|e| {
            PipelineError::FileTransferError(format!("Failed to parse upload response: {}", e))
        })?;

        Ok(body.url)
    }
}
