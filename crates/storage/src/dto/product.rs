use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{GarmentCategory, Product, ProductDetail, ProductVariant};
use crate::services::style_matching;

/// Request payload for creating a catalog product
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(url)]
    #[validate(length(max = 500))]
    pub thumbnail_url: Option<String>,

    /// Free-form metadata; the scorers read `styles`, `colors`,
    /// `occasions` and `garment_category` keys when present.
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(nested)]
    #[serde(default)]
    pub variants: Vec<CreateVariantRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVariantRequest {
    #[validate(length(min = 1, max = 20))]
    pub size_label: String,

    #[validate(length(max = 64))]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub product_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: chrono::NaiveDateTime,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.product_id,
            title: product.title,
            description: product.description,
            thumbnail_url: product.thumbnail_url,
            metadata: product.metadata.0,
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VariantResponse {
    pub variant_id: Uuid,
    pub size_label: String,
    pub sku: Option<String>,
}

impl From<ProductVariant> for VariantResponse {
    fn from(variant: ProductVariant) -> Self {
        Self {
            variant_id: variant.variant_id,
            size_label: variant.size_label,
            sku: variant.sku,
        }
    }
}

/// Product with loaded relations and the inferred garment category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailResponse {
    pub product_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub variants: Vec<VariantResponse>,
    pub garment_category: GarmentCategory,
    pub created_at: chrono::NaiveDateTime,
}

impl From<ProductDetail> for ProductDetailResponse {
    fn from(detail: ProductDetail) -> Self {
        let garment_category = style_matching::infer_garment_category(&detail);
        Self {
            product_id: detail.product.product_id,
            title: detail.product.title,
            description: detail.product.description,
            thumbnail_url: detail.product.thumbnail_url,
            metadata: detail.product.metadata.0,
            categories: detail.categories.into_iter().map(|c| c.name).collect(),
            tags: detail.tags.into_iter().map(|t| t.value).collect(),
            variants: detail.variants.into_iter().map(VariantResponse::from).collect(),
            garment_category,
            created_at: detail.product.created_at,
        }
    }
}
