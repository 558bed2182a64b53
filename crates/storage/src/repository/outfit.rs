use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::dto::common::PageQuery;
use crate::error::{Result, StorageError};
use crate::models::{Outfit, OutfitDetail, OutfitProduct, ProductDetail};

use super::product::ProductRepository;

const OUTFIT_COLUMNS: &str = "outfit_id, name, customer_id, created_at, updated_at, deleted_at";

pub struct OutfitRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OutfitRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an outfit with its initial members. The caller guarantees
    /// `product_ids` is non-empty; product existence is re-checked here
    /// so a dangling id cannot slip in between validation and insert.
    pub async fn create(
        &self,
        name: &str,
        customer_id: Option<Uuid>,
        product_ids: &[Uuid],
    ) -> Result<Outfit> {
        if product_ids.is_empty() {
            return Err(StorageError::InvalidData(
                "an outfit must contain at least one product".to_string(),
            ));
        }

        ProductRepository::new(self.pool)
            .ensure_all_exist(product_ids)
            .await?;

        let mut tx = self.pool.begin().await?;

        let outfit = sqlx::query_as::<_, Outfit>(&format!(
            r#"
            INSERT INTO outfits (name, customer_id)
            VALUES ($1, $2)
            RETURNING {OUTFIT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_members(&mut tx, outfit.outfit_id, product_ids).await?;

        tx.commit().await?;

        Ok(outfit)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Outfit> {
        let outfit = sqlx::query_as::<_, Outfit>(&format!(
            r#"
            SELECT {OUTFIT_COLUMNS}
            FROM outfits
            WHERE outfit_id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("outfit"))?;

        Ok(outfit)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<OutfitDetail> {
        let outfit = self.find_by_id(id).await?;
        let products = self.load_member_products(outfit.outfit_id).await?;

        Ok(OutfitDetail { outfit, products })
    }

    /// List active outfits, optionally restricted to one customer's.
    pub async fn list(
        &self,
        page: &PageQuery,
        customer_id: Option<Uuid>,
    ) -> Result<(Vec<Outfit>, i64)> {
        let mut count_query =
            QueryBuilder::new("SELECT COUNT(*) FROM outfits WHERE deleted_at IS NULL");
        if let Some(customer_id) = customer_id {
            count_query.push(" AND customer_id = ");
            count_query.push_bind(customer_id);
        }
        let total_items = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        let mut query = QueryBuilder::new(format!(
            "SELECT {OUTFIT_COLUMNS} FROM outfits WHERE deleted_at IS NULL"
        ));
        if let Some(customer_id) = customer_id {
            query.push(" AND customer_id = ");
            query.push_bind(customer_id);
        }
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(page.limit());
        query.push(" OFFSET ");
        query.push_bind(page.offset());

        let outfits: Vec<Outfit> = query.build_query_as().fetch_all(self.pool).await?;

        Ok((outfits, total_items))
    }

    /// Rename and/or replace the member list in one transaction.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        replacement_products: Option<&[Uuid]>,
    ) -> Result<Outfit> {
        if let Some(products) = replacement_products {
            if products.is_empty() {
                return Err(StorageError::InvalidData(
                    "an outfit must contain at least one product".to_string(),
                ));
            }
            ProductRepository::new(self.pool)
                .ensure_all_exist(products)
                .await?;
        }

        let mut tx = self.pool.begin().await?;

        let outfit = sqlx::query_as::<_, Outfit>(&format!(
            r#"
            UPDATE outfits
            SET name = COALESCE($2, name), updated_at = NOW()
            WHERE outfit_id = $1 AND deleted_at IS NULL
            RETURNING {OUTFIT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::MissingEntity("outfit"))?;

        if let Some(products) = replacement_products {
            sqlx::query("DELETE FROM outfit_products WHERE outfit_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            insert_members(&mut tx, id, products).await?;
        }

        tx.commit().await?;

        Ok(outfit)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE outfits SET deleted_at = NOW() WHERE outfit_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingEntity("outfit"));
        }

        Ok(())
    }

    /// Append a product to the outfit.
    pub async fn add_product(&self, outfit_id: Uuid, product_id: Uuid) -> Result<OutfitProduct> {
        ProductRepository::new(self.pool)
            .ensure_all_exist(&[product_id])
            .await?;

        let member = sqlx::query_as::<_, OutfitProduct>(
            r#"
            INSERT INTO outfit_products (outfit_id, product_id, position)
            SELECT $1, $2, COALESCE(MAX(position) + 1, 0)
            FROM outfit_products
            WHERE outfit_id = $1
            RETURNING outfit_id, product_id, position
            "#,
        )
        .bind(outfit_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation() {
                StorageError::Duplicate("product is already part of the outfit".to_string())
            } else {
                error
            }
        })?;

        Ok(member)
    }

    /// Remove a member, refusing to empty the outfit.
    pub async fn remove_product(&self, outfit_id: Uuid, product_id: Uuid) -> Result<()> {
        let is_member = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM outfit_products WHERE outfit_id = $1 AND product_id = $2)",
        )
        .bind(outfit_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;

        if !is_member {
            return Err(StorageError::MissingEntity("outfit product"));
        }

        let member_count = self.count_products(outfit_id).await?;
        if member_count <= 1 {
            return Err(StorageError::InvalidData(
                "removing the last product would leave the outfit empty".to_string(),
            ));
        }

        sqlx::query("DELETE FROM outfit_products WHERE outfit_id = $1 AND product_id = $2")
            .bind(outfit_id)
            .bind(product_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_products(&self, outfit_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM outfit_products WHERE outfit_id = $1",
        )
        .bind(outfit_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Active outfits that already contain the product, newest first.
    pub async fn list_containing_product(
        &self,
        product_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Outfit>> {
        let outfits = sqlx::query_as::<_, Outfit>(
            r#"
            SELECT o.outfit_id, o.name, o.customer_id, o.created_at, o.updated_at, o.deleted_at
            FROM outfits o
            INNER JOIN outfit_products op ON op.outfit_id = o.outfit_id
            WHERE op.product_id = $1 AND o.deleted_at IS NULL
            ORDER BY o.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(outfits)
    }

    /// Recency-ordered fallback when no outfit contains the product.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Outfit>> {
        let outfits = sqlx::query_as::<_, Outfit>(&format!(
            r#"
            SELECT {OUTFIT_COLUMNS}
            FROM outfits
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(outfits)
    }

    /// Member products with relations, in position order.
    pub async fn load_member_products(&self, outfit_id: Uuid) -> Result<Vec<ProductDetail>> {
        let members = sqlx::query_as::<_, OutfitProduct>(
            r#"
            SELECT outfit_id, product_id, position
            FROM outfit_products
            WHERE outfit_id = $1
            ORDER BY position
            "#,
        )
        .bind(outfit_id)
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<Uuid> = members.iter().map(|m| m.product_id).collect();
        let details = ProductRepository::new(self.pool)
            .find_details_by_ids(&ids)
            .await?;

        let mut by_id: HashMap<Uuid, ProductDetail> = details
            .into_iter()
            .map(|d| (d.product.product_id, d))
            .collect();

        Ok(members
            .iter()
            .filter_map(|m| by_id.remove(&m.product_id))
            .collect())
    }
}

async fn insert_members(
    tx: &mut Transaction<'_, Postgres>,
    outfit_id: Uuid,
    product_ids: &[Uuid],
) -> Result<()> {
    for (position, product_id) in product_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO outfit_products (outfit_id, product_id, position)
            VALUES ($1, $2, $3)
            ON CONFLICT (outfit_id, product_id) DO UPDATE SET position = EXCLUDED.position
            "#,
        )
        .bind(outfit_id)
        .bind(product_id)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
