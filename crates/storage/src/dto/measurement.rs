use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{BodyMeasurement, MeasurementField, MeasurementSet, measurement};

/// Upsert payload for a customer's body measurements. Every field is
/// optional; each present field is range-checked on its own.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertMeasurementsRequest {
    #[validate(custom(function = "validate_height"))]
    pub height: Option<Decimal>,

    #[validate(custom(function = "validate_weight"))]
    pub weight: Option<Decimal>,

    #[validate(custom(function = "validate_girth"))]
    pub bust: Option<Decimal>,

    #[validate(custom(function = "validate_girth"))]
    pub waist: Option<Decimal>,

    #[validate(custom(function = "validate_girth"))]
    pub hips: Option<Decimal>,

    #[validate(custom(function = "validate_shoulder_width"))]
    pub shoulder_width: Option<Decimal>,

    #[validate(custom(function = "validate_inseam"))]
    pub inseam: Option<Decimal>,
}

impl UpsertMeasurementsRequest {
    pub fn is_empty(&self) -> bool {
        self.height.is_none()
            && self.weight.is_none()
            && self.bust.is_none()
            && self.waist.is_none()
            && self.hips.is_none()
            && self.shoulder_width.is_none()
            && self.inseam.is_none()
    }

    pub fn to_set(&self) -> MeasurementSet {
        let mut set = MeasurementSet::new();
        let fields = [
            (MeasurementField::Height, self.height),
            (MeasurementField::Weight, self.weight),
            (MeasurementField::Bust, self.bust),
            (MeasurementField::Waist, self.waist),
            (MeasurementField::Hips, self.hips),
            (MeasurementField::ShoulderWidth, self.shoulder_width),
            (MeasurementField::Inseam, self.inseam),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                set.set(field, measurement::decimal_to_f64(value));
            }
        }

        set
    }
}

fn decimal_in_range(value: &Decimal, min: i64, max: i64, code: &'static str) -> Result<(), ValidationError> {
    if *value >= Decimal::from(min) && *value <= Decimal::from(max) {
        Ok(())
    } else {
        Err(ValidationError::new(code))
    }
}

fn validate_height(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(value, 50, 250, "height_out_of_range")
}

fn validate_weight(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(value, 20, 300, "weight_out_of_range")
}

fn validate_girth(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(value, 40, 200, "girth_out_of_range")
}

fn validate_shoulder_width(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(value, 20, 80, "shoulder_width_out_of_range")
}

fn validate_inseam(value: &Decimal) -> Result<(), ValidationError> {
    decimal_in_range(value, 40, 130, "inseam_out_of_range")
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeasurementsResponse {
    pub customer_id: Uuid,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub bust: Option<Decimal>,
    pub waist: Option<Decimal>,
    pub hips: Option<Decimal>,
    pub shoulder_width: Option<Decimal>,
    pub inseam: Option<Decimal>,
    pub updated_at: chrono::NaiveDateTime,
}

impl From<BodyMeasurement> for MeasurementsResponse {
    fn from(measurement: BodyMeasurement) -> Self {
        Self {
            customer_id: measurement.customer_id,
            height: measurement.height,
            weight: measurement.weight,
            bust: measurement.bust,
            waist: measurement.waist,
            hips: measurement.hips,
            shoulder_width: measurement.shoulder_width,
            inseam: measurement.inseam,
            updated_at: measurement.updated_at,
        }
    }
}

/// Request payload for a size recommendation. Inline measurements win
/// over the customer's stored set when both exist.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SizeRecommendationRequest {
    pub product_id: Uuid,

    #[validate(nested)]
    pub measurements: Option<UpsertMeasurementsRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SizeAlternative {
    pub size: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SizeRecommendationResponse {
    pub product_id: Uuid,
    pub garment_category: String,
    pub recommended_size: String,
    pub confidence: f64,
    pub alternative_sizes: Vec<SizeAlternative>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_field_fails_alone() {
        let request = UpsertMeasurementsRequest {
            height: Some(Decimal::from(170)),
            weight: None,
            bust: Some(Decimal::from(300)),
            waist: None,
            hips: None,
            shoulder_width: None,
            inseam: None,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("bust"));
        assert!(!errors.field_errors().contains_key("height"));
    }

    #[test]
    fn test_empty_request_is_valid_and_empty() {
        let request = UpsertMeasurementsRequest {
            height: None,
            weight: None,
            bust: None,
            waist: None,
            hips: None,
            shoulder_width: None,
            inseam: None,
        };

        assert!(request.validate().is_ok());
        assert!(request.is_empty());
        assert!(request.to_set().is_empty());
    }
}
