use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

use super::DeletionState;

/// Lifecycle of a virtual try-on request.
///
/// The only legal transitions are pending -> processing and
/// processing -> completed | failed. A request that has left `pending`
/// can never be restarted; re-submission means creating a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "try_on_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TryOnStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TryOnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnStatus::Pending => "pending",
            TryOnStatus::Processing => "processing",
            TryOnStatus::Completed => "completed",
            TryOnStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TryOnStatus::Completed | TryOnStatus::Failed)
    }

    pub fn can_transition_to(&self, next: TryOnStatus) -> bool {
        matches!(
            (self, next),
            (TryOnStatus::Pending, TryOnStatus::Processing)
                | (TryOnStatus::Processing, TryOnStatus::Completed)
                | (TryOnStatus::Processing, TryOnStatus::Failed)
        )
    }
}

impl std::fmt::Display for TryOnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TryOnRequest {
    pub request_id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub user_image_id: Uuid,
    pub result_image_id: Option<Uuid>,
    pub status: TryOnStatus,
    #[schema(value_type = Object)]
    pub metadata: sqlx::types::Json<serde_json::Value>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub deleted_at: Option<chrono::NaiveDateTime>,
}

impl TryOnRequest {
    pub fn deletion_state(&self) -> DeletionState {
        DeletionState::from_timestamp(self.deleted_at)
    }

    pub fn ensure_owned_by(&self, customer_id: Uuid) -> Result<()> {
        if self.customer_id == customer_id {
            Ok(())
        } else {
            Err(StorageError::NotAllowed(
                "try-on request does not belong to this customer".to_string(),
            ))
        }
    }

    pub fn ensure_pending(&self) -> Result<()> {
        if self.status == TryOnStatus::Pending {
            Ok(())
        } else {
            Err(StorageError::InvalidData(format!(
                "generation can only start from pending, request is {}",
                self.status
            )))
        }
    }

    /// Optional generation hint stored under a metadata key, e.g. `pose`
    /// or `background`.
    pub fn hint(&self, key: &str) -> Option<String> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn request_with_status(status: TryOnStatus) -> TryOnRequest {
        let created = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TryOnRequest {
            request_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            user_image_id: Uuid::new_v4(),
            result_image_id: None,
            status,
            metadata: sqlx::types::Json(serde_json::json!({})),
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }

    #[test]
    fn test_legal_transitions() {
        assert!(TryOnStatus::Pending.can_transition_to(TryOnStatus::Processing));
        assert!(TryOnStatus::Processing.can_transition_to(TryOnStatus::Completed));
        assert!(TryOnStatus::Processing.can_transition_to(TryOnStatus::Failed));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!TryOnStatus::Pending.can_transition_to(TryOnStatus::Completed));
        assert!(!TryOnStatus::Pending.can_transition_to(TryOnStatus::Failed));
        assert!(!TryOnStatus::Processing.can_transition_to(TryOnStatus::Processing));
        assert!(!TryOnStatus::Completed.can_transition_to(TryOnStatus::Processing));
        assert!(!TryOnStatus::Failed.can_transition_to(TryOnStatus::Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TryOnStatus::Pending.is_terminal());
        assert!(!TryOnStatus::Processing.is_terminal());
        assert!(TryOnStatus::Completed.is_terminal());
        assert!(TryOnStatus::Failed.is_terminal());
    }

    #[test]
    fn test_ensure_pending_rejects_started_request() {
        let request = request_with_status(TryOnStatus::Processing);
        assert!(matches!(
            request.ensure_pending(),
            Err(StorageError::InvalidData(_))
        ));

        let request = request_with_status(TryOnStatus::Pending);
        assert!(request.ensure_pending().is_ok());
    }

    #[test]
    fn test_hint_reads_metadata_strings() {
        let mut request = request_with_status(TryOnStatus::Pending);
        request.metadata = sqlx::types::Json(serde_json::json!({
            "pose": "standing",
            "background": "",
        }));

        assert_eq!(request.hint("pose").as_deref(), Some("standing"));
        assert_eq!(request.hint("background"), None);
        assert_eq!(request.hint("missing"), None);
    }
}
