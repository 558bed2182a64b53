use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::DeletionState;

/// The named body measurements a customer can record. Values are
/// centimeters except `Weight`, which is kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Height,
    Weight,
    Bust,
    Waist,
    Hips,
    ShoulderWidth,
    Inseam,
}

impl MeasurementField {
    pub const ALL: [MeasurementField; 7] = [
        MeasurementField::Height,
        MeasurementField::Weight,
        MeasurementField::Bust,
        MeasurementField::Waist,
        MeasurementField::Hips,
        MeasurementField::ShoulderWidth,
        MeasurementField::Inseam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementField::Height => "height",
            MeasurementField::Weight => "weight",
            MeasurementField::Bust => "bust",
            MeasurementField::Waist => "waist",
            MeasurementField::Hips => "hips",
            MeasurementField::ShoulderWidth => "shoulder_width",
            MeasurementField::Inseam => "inseam",
        }
    }
}

/// One row per customer; every field optional. Range validation happens at
/// the DTO layer, field by field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BodyMeasurement {
    pub measurement_id: Uuid,
    pub customer_id: Uuid,
    pub height: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub bust: Option<Decimal>,
    pub waist: Option<Decimal>,
    pub hips: Option<Decimal>,
    pub shoulder_width: Option<Decimal>,
    pub inseam: Option<Decimal>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub deleted_at: Option<chrono::NaiveDateTime>,
}

impl BodyMeasurement {
    pub fn deletion_state(&self) -> DeletionState {
        DeletionState::from_timestamp(self.deleted_at)
    }

    /// Flatten the row into the sparse set the size matcher consumes.
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
                set.set(field, decimal_to_f64(value));
            }
        }

        set
    }
}

/// Sparse map of supplied measurements, converted to f64 for scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    values: HashMap<MeasurementField, f64>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: MeasurementField, value: f64) {
        self.values.insert(field, value);
    }

    pub fn with(mut self, field: MeasurementField, value: f64) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        self.values.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

pub(crate) fn decimal_to_f64(decimal: Decimal) -> f64 {
    decimal.to_string().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_set_skips_missing_fields() {
        let measurement = BodyMeasurement {
            measurement_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            height: Some(Decimal::from(170)),
            weight: None,
            bust: Some(Decimal::from(90)),
            waist: None,
            hips: None,
            shoulder_width: None,
            inseam: None,
            created_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            deleted_at: None,
        };

        let set = measurement.to_set();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(MeasurementField::Height), Some(170.0));
        assert_eq!(set.get(MeasurementField::Bust), Some(90.0));
        assert_eq!(set.get(MeasurementField::Waist), None);
    }
}
