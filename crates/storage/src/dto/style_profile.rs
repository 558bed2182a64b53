use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{GarmentCategory, StyleProfile};
use crate::services::vocabulary::DEFAULT_VOCABULARY;

use super::product::ProductDetailResponse;

/// Payload for creating or updating a style profile. All preference
/// values must come from the closed vocabularies.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertStyleProfileRequest {
    #[validate(custom(function = "validate_styles"))]
    #[serde(default)]
    pub preferred_styles: Vec<String>,

    #[validate(custom(function = "validate_colors"))]
    #[serde(default)]
    pub preferred_colors: Vec<String>,

    #[validate(custom(function = "validate_occasions"))]
    #[serde(default)]
    pub preferred_occasions: Vec<String>,

    #[validate(custom(function = "validate_styles"))]
    #[serde(default)]
    pub disliked_styles: Vec<String>,

    #[validate(custom(function = "validate_colors"))]
    #[serde(default)]
    pub disliked_colors: Vec<String>,

    /// Map of garment category -> preferred size label.
    #[validate(custom(function = "validate_size_preferences"))]
    #[serde(default)]
    pub size_preferences: HashMap<String, String>,
}

fn validate_styles(values: &[String]) -> Result<(), ValidationError> {
    let unknown = DEFAULT_VOCABULARY.unknown_styles(values);
    if unknown.is_empty() {
        Ok(())
    } else {
        let mut error = ValidationError::new("unknown_style");
        error.message = Some(format!("Unknown styles: {}", unknown.join(", ")).into());
        Err(error)
    }
}

fn validate_colors(values: &[String]) -> Result<(), ValidationError> {
    let unknown = DEFAULT_VOCABULARY.unknown_colors(values);
    if unknown.is_empty() {
        Ok(())
    } else {
        let mut error = ValidationError::new("unknown_color");
        error.message = Some(format!("Unknown colors: {}", unknown.join(", ")).into());
        Err(error)
    }
}

fn validate_occasions(values: &[String]) -> Result<(), ValidationError> {
    let unknown = DEFAULT_VOCABULARY.unknown_occasions(values);
    if unknown.is_empty() {
        Ok(())
    } else {
        let mut error = ValidationError::new("unknown_occasion");
        error.message = Some(format!("Unknown occasions: {}", unknown.join(", ")).into());
        Err(error)
    }
}

fn validate_size_preferences(values: &HashMap<String, String>) -> Result<(), ValidationError> {
    for (category, size_label) in values {
        if GarmentCategory::parse(category).is_none() {
            let mut error = ValidationError::new("unknown_garment_category");
            error.message = Some(format!("Unknown garment category: {}", category).into());
            return Err(error);
        }
        if size_label.trim().is_empty() || size_label.len() > 20 {
            return Err(ValidationError::new("invalid_size_label"));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StyleProfileResponse {
    pub profile_id: Uuid,
    pub customer_id: Uuid,
    pub preferred_styles: Vec<String>,
    pub preferred_colors: Vec<String>,
    pub preferred_occasions: Vec<String>,
    pub disliked_styles: Vec<String>,
    pub disliked_colors: Vec<String>,
    #[schema(value_type = Object)]
    pub size_preferences: HashMap<String, String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<StyleProfile> for StyleProfileResponse {
    fn from(profile: StyleProfile) -> Self {
        Self {
            profile_id: profile.profile_id,
            customer_id: profile.customer_id,
            preferred_styles: profile.preferred_styles,
            preferred_colors: profile.preferred_colors,
            preferred_occasions: profile.preferred_occasions,
            disliked_styles: profile.disliked_styles,
            disliked_colors: profile.disliked_colors,
            size_preferences: profile.size_preferences.0,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// One scored catalog product in a recommendation list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductRecommendation {
    pub product: ProductDetailResponse,
    pub match_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<ProductRecommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UpsertStyleProfileRequest {
        UpsertStyleProfileRequest {
            preferred_styles: vec!["casual".to_string()],
            preferred_colors: vec!["navy".to_string()],
            preferred_occasions: vec!["work".to_string()],
            disliked_styles: vec!["sporty".to_string()],
            disliked_colors: vec![],
            size_preferences: HashMap::from([("tops".to_string(), "M".to_string())]),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_unknown_style_is_rejected() {
        let mut request = valid_request();
        request.preferred_styles.push("goth".to_string());

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("preferred_styles"));
    }

    #[test]
    fn test_unknown_size_preference_category_is_rejected() {
        let mut request = valid_request();
        request
            .size_preferences
            .insert("hats".to_string(), "M".to_string());

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("size_preferences"));
    }
}
