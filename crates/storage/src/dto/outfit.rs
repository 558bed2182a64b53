use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Outfit, OutfitDetail};

use super::product::ProductDetailResponse;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOutfitRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "An outfit must contain at least one product"))]
    pub product_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOutfitRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,

    /// Replaces the member list when present; an empty list would
    /// violate the min-one-product invariant and is rejected.
    #[validate(custom(function = "validate_replacement_products"))]
    pub product_ids: Option<Vec<Uuid>>,
}

fn validate_replacement_products(values: &[Uuid]) -> Result<(), ValidationError> {
    if values.is_empty() {
        let mut error = ValidationError::new("empty_product_list");
        error.message = Some("An outfit must contain at least one product".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddOutfitProductRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OutfitResponse {
    pub outfit_id: Uuid,
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<Outfit> for OutfitResponse {
    fn from(outfit: Outfit) -> Self {
        Self {
            outfit_id: outfit.outfit_id,
            name: outfit.name,
            customer_id: outfit.customer_id,
            created_at: outfit.created_at,
            updated_at: outfit.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OutfitDetailResponse {
    pub outfit_id: Uuid,
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub products: Vec<ProductDetailResponse>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<OutfitDetail> for OutfitDetailResponse {
    fn from(detail: OutfitDetail) -> Self {
        Self {
            outfit_id: detail.outfit.outfit_id,
            name: detail.outfit.name,
            customer_id: detail.outfit.customer_id,
            products: detail
                .products
                .into_iter()
                .map(ProductDetailResponse::from)
                .collect(),
            created_at: detail.outfit.created_at,
            updated_at: detail.outfit.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendedOutfitsResponse {
    pub outfits: Vec<OutfitDetailResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_at_least_one_product() {
        let request = CreateOutfitRequest {
            name: "Weekend".to_string(),
            product_ids: vec![],
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("product_ids"));
    }

    #[test]
    fn test_update_rejects_empty_replacement_list() {
        let request = UpdateOutfitRequest {
            name: None,
            product_ids: Some(vec![]),
        };
        assert!(request.validate().is_err());

        let request = UpdateOutfitRequest {
            name: None,
            product_ids: None,
        };
        assert!(request.validate().is_ok());
    }
}
