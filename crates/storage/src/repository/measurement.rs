use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::measurement::UpsertMeasurementsRequest;
use crate::error::{Result, StorageError};
use crate::models::BodyMeasurement;

const MEASUREMENT_COLUMNS: &str = "measurement_id, customer_id, height, weight, bust, waist, \
     hips, shoulder_width, inseam, created_at, updated_at, deleted_at";

pub struct MeasurementRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MeasurementRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Replace the customer's measurement set, creating the row on first
    /// write. A previously soft-deleted row is revived.
    pub async fn upsert(
        &self,
        customer_id: Uuid,
        req: &UpsertMeasurementsRequest,
    ) -> Result<BodyMeasurement> {
        let measurement = sqlx::query_as::<_, BodyMeasurement>(&format!(
            r#"
            INSERT INTO body_measurements
                (customer_id, height, weight, bust, waist, hips, shoulder_width, inseam)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (customer_id) DO UPDATE SET
                height = EXCLUDED.height,
                weight = EXCLUDED.weight,
                bust = EXCLUDED.bust,
                waist = EXCLUDED.waist,
                hips = EXCLUDED.hips,
                shoulder_width = EXCLUDED.shoulder_width,
                inseam = EXCLUDED.inseam,
                updated_at = NOW(),
                deleted_at = NULL
            RETURNING {MEASUREMENT_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(req.height)
        .bind(req.weight)
        .bind(req.bust)
        .bind(req.waist)
        .bind(req.hips)
        .bind(req.shoulder_width)
        .bind(req.inseam)
        .fetch_one(self.pool)
        .await?;

        Ok(measurement)
    }

    pub async fn find_by_customer(&self, customer_id: Uuid) -> Result<BodyMeasurement> {
        let measurement = sqlx::query_as::<_, BodyMeasurement>(&format!(
            r#"
            SELECT {MEASUREMENT_COLUMNS}
            FROM body_measurements
            WHERE customer_id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("measurements"))?;

        Ok(measurement)
    }

    pub async fn delete(&self, customer_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE body_measurements SET deleted_at = NOW() \
             WHERE customer_id = $1 AND deleted_at IS NULL",
        )
        .bind(customer_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingEntity("measurements"));
        }

        Ok(())
    }
}
