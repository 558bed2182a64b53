use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::DeletionState;

/// Top-level apparel classification used to select size charts and size
/// preferences. The set is closed; anything else must go through
/// [`GarmentCategory::parse`] and handle the `None` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GarmentCategory {
    Tops,
    Bottoms,
    Dresses,
    Shoes,
}

impl GarmentCategory {
    pub const ALL: [GarmentCategory; 4] = [
        GarmentCategory::Tops,
        GarmentCategory::Bottoms,
        GarmentCategory::Dresses,
        GarmentCategory::Shoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentCategory::Tops => "tops",
            GarmentCategory::Bottoms => "bottoms",
            GarmentCategory::Dresses => "dresses",
            GarmentCategory::Shoes => "shoes",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "tops" => Some(GarmentCategory::Tops),
            "bottoms" => Some(GarmentCategory::Bottoms),
            "dresses" => Some(GarmentCategory::Dresses),
            "shoes" => Some(GarmentCategory::Shoes),
            _ => None,
        }
    }
}

impl fmt::Display for GarmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub product_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: sqlx::types::Json<serde_json::Value>,
    pub created_at: chrono::NaiveDateTime,
    pub deleted_at: Option<chrono::NaiveDateTime>,
}

impl Product {
    pub fn deletion_state(&self) -> DeletionState {
        DeletionState::from_timestamp(self.deleted_at)
    }

    /// String entries of a metadata array, lowercased. Missing keys and
    /// non-array values yield an empty list.
    pub fn metadata_strings(&self, key: &str) -> Vec<String> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_array())
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A single metadata string, lowercased.
    pub fn metadata_str(&self, key: &str) -> Option<String> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub category_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tag {
    pub tag_id: Uuid,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductVariant {
    pub variant_id: Uuid,
    pub product_id: Uuid,
    pub size_label: String,
    pub sku: Option<String>,
}

/// A product with its relations loaded. This is the shape the scoring
/// services operate on.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub variants: Vec<ProductVariant>,
}

impl ProductDetail {
    pub fn category_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| c.name.trim().to_lowercase())
            .collect()
    }

    pub fn tag_values(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| t.value.trim().to_lowercase())
            .collect()
    }

    pub fn offers_size(&self, size_label: &str) -> bool {
        self.variants
            .iter()
            .any(|v| v.size_label.eq_ignore_ascii_case(size_label))
    }

    /// Whether the product carries any category or tag data at all.
    /// Products without either cannot be compared attribute-wise.
    pub fn has_attribute_relations(&self) -> bool {
        !self.categories.is_empty() || !self.tags.is_empty()
    }
}
