use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{DeletionState, GarmentCategory};

/// A customer's declared aesthetic preferences, one row per customer.
/// Preference values are validated against the closed vocabularies at
/// write time, so scoring can treat them as trusted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StyleProfile {
    pub profile_id: Uuid,
    pub customer_id: Uuid,
    pub preferred_styles: Vec<String>,
    pub preferred_colors: Vec<String>,
    pub preferred_occasions: Vec<String>,
    pub disliked_styles: Vec<String>,
    pub disliked_colors: Vec<String>,
    /// Map of garment category -> preferred size label.
    #[schema(value_type = Object)]
    pub size_preferences: sqlx::types::Json<HashMap<String, String>>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub deleted_at: Option<chrono::NaiveDateTime>,
}

impl StyleProfile {
    pub fn deletion_state(&self) -> DeletionState {
        DeletionState::from_timestamp(self.deleted_at)
    }

    pub fn size_preference_for(&self, category: GarmentCategory) -> Option<&str> {
        self.size_preferences
            .get(category.as_str())
            .map(String::as_str)
    }
}
