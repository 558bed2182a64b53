use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::style_profile::UpsertStyleProfileRequest;
use crate::error::{Result, StorageError};
use crate::models::StyleProfile;

const PROFILE_COLUMNS: &str = "profile_id, customer_id, preferred_styles, preferred_colors, \
     preferred_occasions, disliked_styles, disliked_colors, size_preferences, \
     created_at, updated_at, deleted_at";

pub struct StyleProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StyleProfileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the customer's singleton profile; conflicts with an
    /// existing one.
    pub async fn create(
        &self,
        customer_id: Uuid,
        req: &UpsertStyleProfileRequest,
    ) -> Result<StyleProfile> {
        let profile = sqlx::query_as::<_, StyleProfile>(&format!(
            r#"
            INSERT INTO style_profiles
                (customer_id, preferred_styles, preferred_colors, preferred_occasions,
                 disliked_styles, disliked_colors, size_preferences)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(&req.preferred_styles)
        .bind(&req.preferred_colors)
        .bind(&req.preferred_occasions)
        .bind(&req.disliked_styles)
        .bind(&req.disliked_colors)
        .bind(sqlx::types::Json(&req.size_preferences))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation() {
                StorageError::Duplicate("style profile already exists for this customer".to_string())
            } else {
                error
            }
        })?;

        Ok(profile)
    }

    pub async fn update(
        &self,
        customer_id: Uuid,
        req: &UpsertStyleProfileRequest,
    ) -> Result<StyleProfile> {
        let profile = sqlx::query_as::<_, StyleProfile>(&format!(
            r#"
            UPDATE style_profiles SET
                preferred_styles = $2,
                preferred_colors = $3,
                preferred_occasions = $4,
                disliked_styles = $5,
                disliked_colors = $6,
                size_preferences = $7,
                updated_at = NOW()
            WHERE customer_id = $1 AND deleted_at IS NULL
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(&req.preferred_styles)
        .bind(&req.preferred_colors)
        .bind(&req.preferred_occasions)
        .bind(&req.disliked_styles)
        .bind(&req.disliked_colors)
        .bind(sqlx::types::Json(&req.size_preferences))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("style profile"))?;

        Ok(profile)
    }

    pub async fn find_by_customer(&self, customer_id: Uuid) -> Result<StyleProfile> {
        let profile = sqlx::query_as::<_, StyleProfile>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM style_profiles
            WHERE customer_id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(customer_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("style profile"))?;

        Ok(profile)
    }

    pub async fn delete(&self, customer_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE style_profiles SET deleted_at = NOW() \
             WHERE customer_id = $1 AND deleted_at IS NULL",
        )
        .bind(customer_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingEntity("style profile"));
        }

        Ok(())
    }
}
