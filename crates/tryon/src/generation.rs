use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::traits::{GenerationBackend, GenerationJob};
use crate::Result;

#[derive(Debug, Clone, Serialize)]
struct GenerateRequestBody {
    person_image: String,
    garment_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponseBody {
    /// Base64-encoded result image.
    image: String,
    #[serde(default)]
    model: Option<String>,
}

/// Client for the external try-on generation API
pub struct GenerationClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GenerationClient {
    /// Create a new generation client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the generation API (e.g. "https://tryon.example.com")
    /// * `api_key` - Optional bearer token
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            // Image generation is slow; downloads and the composite call
            // share one generous ceiling.
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Check if the generation service is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| PipelineError::GenerationError(format!("Health check failed: {}", e)))?;

        Ok(response.status().is_success())
    }
}

#[async_trait::async_trait]
impl GenerationBackend for GenerationClient {
    async fn generate(&self, job: GenerationJob) -> Result<Vec<u8>> {
        let body = GenerateRequestBody {
            person_image: BASE64.encode(&job.person_image),
            garment_image: BASE64.encode(&job.garment_image),
            pose: job.pose_hint,
            background: job.background_hint,
        };

        tracing::info!(
            "Sending generation request (person: {} bytes, garment: {} bytes)",
            job.person_image.len(),
            job.garment_image.len()
        );

        let mut request = self
            .client
            .post(format!("{}/v1/try-on", self.base_url))
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::GenerationError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::GenerationError(format!(
                "Generation API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateResponseBody = response.json().await.map_err(|e| {
            PipelineError::GenerationError(format!("Failed to parse generation response: {}", e))
        })?;

        if let Some(model) = &body.model {
            tracing::info!("Generation complete (model: {})", model);
        }

        let bytes = BASE64
            .decode(body.image.as_bytes())
            .map_err(|e| PipelineError::InvalidImage(format!("Result is not valid base64: {}", e)))?;

        if bytes.is_empty() {
            return Err(PipelineError::InvalidImage(
                "Generation returned an empty image".to_string(),
            ));
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Only run against a live generation endpoint
    async fn test_generation_health_check() {
        let client =
            GenerationClient::new("http://localhost:8188".to_string(), None).unwrap();
        let result = client.health_check().await;
        assert!(result.is_ok());
    }
}
