use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{TryOnRequest, TryOnStatus};

const TRY_ON_COLUMNS: &str = "request_id, customer_id, product_id, user_image_id, \
     result_image_id, status, metadata, created_at, updated_at, deleted_at";

pub struct TryOnRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TryOnRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
        user_image_id: Uuid,
        metadata: serde_json::Value,
    ) -> Result<TryOnRequest> {
        let request = sqlx::query_as::<_, TryOnRequest>(&format!(
            r#"
            INSERT INTO try_on_requests (customer_id, product_id, user_image_id, status, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TRY_ON_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(product_id)
        .bind(user_image_id)
        .bind(TryOnStatus::Pending)
        .bind(sqlx::types::Json(metadata))
        .fetch_one(self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<TryOnRequest> {
        let request = sqlx::query_as::<_, TryOnRequest>(&format!(
            r#"
            SELECT {TRY_ON_COLUMNS}
            FROM try_on_requests
            WHERE request_id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("try-on request"))?;

        Ok(request)
    }

    pub async fn list_by_customer(&self, customer_id: Uuid) -> Result<Vec<TryOnRequest>> {
        let requests = sqlx::query_as::<_, TryOnRequest>(&format!(
            r#"
            SELECT {TRY_ON_COLUMNS}
            FROM try_on_requests
            WHERE customer_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests still waiting for generation, oldest first. Drained by
    /// the worker.
    pub async fn list_pending(&self, limit: i64) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT request_id
            FROM try_on_requests
            WHERE status = $1 AND deleted_at IS NULL
            ORDER BY created_at
            LIMIT $2
            "#,
        )
        .bind(TryOnStatus::Pending)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Guarded pending -> processing transition. The WHERE clause makes
    /// the check-and-set atomic, so two concurrent starts cannot both
    /// pass.
    pub async fn begin_processing(&self, id: Uuid) -> Result<TryOnRequest> {
        let request = sqlx::query_as::<_, TryOnRequest>(&format!(
            r#"
            UPDATE try_on_requests
            SET status = $2, updated_at = NOW()
            WHERE request_id = $1 AND status = $3 AND deleted_at IS NULL
            RETURNING {TRY_ON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(TryOnStatus::Processing)
        .bind(TryOnStatus::Pending)
        .fetch_optional(self.pool)
        .await?;

        match request {
            Some(request) => Ok(request),
            // Distinguish a missing request from an illegal transition.
            None => {
                let existing = self.find_by_id(id).await?;
                Err(StorageError::InvalidData(format!(
                    "generation can only start from pending, request is {}",
                    existing.status
                )))
            }
        }
    }

    pub async fn complete(&self, id: Uuid, result_image_id: Uuid) -> Result<TryOnRequest> {
        let request = sqlx::query_as::<_, TryOnRequest>(&format!(
            r#"
            UPDATE try_on_requests
            SET status = $2, result_image_id = $3, updated_at = NOW()
            WHERE request_id = $1 AND status = $4 AND deleted_at IS NULL
            RETURNING {TRY_ON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(TryOnStatus::Completed)
        .bind(result_image_id)
        .bind(TryOnStatus::Processing)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            StorageError::InvalidData("only a processing request can complete".to_string())
        })?;

        Ok(request)
    }

    /// Terminal failure; the message lands under `metadata.error` so the
    /// polling client can surface it.
    pub async fn fail(&self, id: Uuid, message: &str) -> Result<TryOnRequest> {
        let request = sqlx::query_as::<_, TryOnRequest>(&format!(
            r#"
            UPDATE try_on_requests
            SET status = $2,
                metadata = jsonb_set(metadata, '{{error}}', to_jsonb($3::text)),
                updated_at = NOW()
            WHERE request_id = $1 AND status = $4 AND deleted_at IS NULL
            RETURNING {TRY_ON_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(TryOnStatus::Failed)
        .bind(message)
        .bind(TryOnStatus::Processing)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            StorageError::InvalidData("only a processing request can fail".to_string())
        })?;

        Ok(request)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE try_on_requests SET deleted_at = NOW() \
             WHERE request_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingEntity("try-on request"));
        }

        Ok(())
    }
}
