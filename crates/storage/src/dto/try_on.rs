use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{TryOnRequest, TryOnStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTryOnRequest {
    pub product_id: Uuid,

    /// Id of the customer photo previously uploaded to file storage.
    pub user_image_id: Uuid,

    #[validate(length(max = 120))]
    pub pose_hint: Option<String>,

    #[validate(length(max = 120))]
    pub background_hint: Option<String>,
}

impl CreateTryOnRequest {
    /// Metadata persisted with the request; the pipeline reads the hint
    /// keys back when it calls the generation endpoint.
    pub fn metadata(&self) -> serde_json::Value {
        let mut metadata = json!({});
        if let Some(pose) = &self.pose_hint {
            metadata["pose"] = json!(pose);
        }
        if let Some(background) = &self.background_hint {
            metadata["background"] = json!(background);
        }
        metadata
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TryOnResponse {
    pub request_id: Uuid,
    pub product_id: Uuid,
    pub user_image_id: Uuid,
    pub status: TryOnStatus,
    pub result_image_url: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl TryOnResponse {
    pub fn from_request(request: TryOnRequest, result_image_url: Option<String>) -> Self {
        Self {
            request_id: request.request_id,
            product_id: request.product_id,
            user_image_id: request.user_image_id,
            status: request.status,
            result_image_url,
            metadata: request.metadata.0,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TryOnListResponse {
    pub try_ons: Vec<TryOnResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_only_carries_supplied_hints() {
        let request = CreateTryOnRequest {
            product_id: Uuid::new_v4(),
            user_image_id: Uuid::new_v4(),
            pose_hint: Some("standing".to_string()),
            background_hint: None,
        };

        let metadata = request.metadata();
        assert_eq!(metadata["pose"], "standing");
        assert!(metadata.get("background").is_none());
    }
}
