use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::common::PageQuery;
use crate::dto::product::CreateProductRequest;
use crate::error::{Result, StorageError};
use crate::models::{Category, Product, ProductDetail, ProductVariant, Tag};

const PRODUCT_COLUMNS: &str =
    "product_id, title, description, thumbnail_url, metadata, created_at, deleted_at";

#[derive(FromRow)]
struct ProductCategoryRow {
    product_id: Uuid,
    category_id: Uuid,
    name: String,
}

#[derive(FromRow)]
struct ProductTagRow {
    product_id: Uuid,
    tag_id: Uuid,
    value: String,
}

pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product with its categories, tags and variants in one
    /// transaction.
    pub async fn create(&self, req: &CreateProductRequest) -> Result<ProductDetail> {
        let mut tx = self.pool.begin().await?;

        let metadata = req.metadata.clone().unwrap_or_else(|| serde_json::json!({}));

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (title, description, thumbnail_url, metadata)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.thumbnail_url)
        .bind(sqlx::types::Json(metadata))
        .fetch_one(&mut *tx)
        .await?;

        for name in &req.categories {
            let category_id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO categories (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING category_id
                "#,
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO product_categories (product_id, category_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(product.product_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await?;
        }

        for value in &req.tags {
            let tag_id = sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO tags (value)
                VALUES ($1)
                ON CONFLICT (value) DO UPDATE SET value = EXCLUDED.value
                RETURNING tag_id
                "#,
            )
            .bind(value)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO product_tags (product_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(product.product_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
        }

        for (position, variant) in req.variants.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_variants (product_id, size_label, sku, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(product.product_id)
            .bind(&variant.size_label)
            .bind(&variant.sku)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.find_detail(product.product_id).await
    }

    pub async fn list(&self, page: &PageQuery) -> Result<(Vec<Product>, i64)> {
        let total_items = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE deleted_at IS NULL",
        )
        .fetch_one(self.pool)
        .await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((products, total_items))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE product_id = $1 AND deleted_at IS NULL
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("product"))?;

        Ok(product)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<ProductDetail> {
        let product = self.find_by_id(id).await?;
        let mut details = self.load_details(vec![product]).await?;

        details.pop().ok_or(StorageError::MissingEntity("product"))
    }

    pub async fn find_details_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ProductDetail>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE product_id = ANY($1) AND deleted_at IS NULL
            "#
        ))
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        self.load_details(products).await
    }

    /// Every active product with relations loaded; the working set the
    /// recommendation scorer iterates.
    pub async fn list_details_active(&self) -> Result<Vec<ProductDetail>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        self.load_details(products).await
    }

    /// Check that every id refers to an active product.
    pub async fn ensure_all_exist(&self, ids: &[Uuid]) -> Result<()> {
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        let found = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE product_id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(&unique)
        .fetch_one(self.pool)
        .await?;

        if found as usize != unique.len() {
            return Err(StorageError::MissingEntity("product"));
        }

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW() WHERE product_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::MissingEntity("product"));
        }

        Ok(())
    }

    /// Attach categories, tags and variants to a batch of products with
    /// one query per relation.
    async fn load_details(&self, products: Vec<Product>) -> Result<Vec<ProductDetail>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.product_id).collect();

        let category_rows = sqlx::query_as::<_, ProductCategoryRow>(
            r#"
            SELECT pc.product_id, c.category_id, c.name
            FROM product_categories pc
            INNER JOIN categories c ON c.category_id = pc.category_id
            WHERE pc.product_id = ANY($1)
            ORDER BY c.name
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let tag_rows = sqlx::query_as::<_, ProductTagRow>(
            r#"
            SELECT pt.product_id, t.tag_id, t.value
            FROM product_tags pt
            INNER JOIN tags t ON t.tag_id = pt.tag_id
            WHERE pt.product_id = ANY($1)
            ORDER BY t.value
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let variants = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT variant_id, product_id, size_label, sku
            FROM product_variants
            WHERE product_id = ANY($1)
            ORDER BY position
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut categories_by_product: HashMap<Uuid, Vec<Category>> = HashMap::new();
        for row in category_rows {
            categories_by_product
                .entry(row.product_id)
                .or_default()
                .push(Category {
                    category_id: row.category_id,
                    name: row.name,
                });
        }

        let mut tags_by_product: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for row in tag_rows {
            tags_by_product.entry(row.product_id).or_default().push(Tag {
                tag_id: row.tag_id,
                value: row.value,
            });
        }

        let mut variants_by_product: HashMap<Uuid, Vec<ProductVariant>> = HashMap::new();
        for variant in variants {
            variants_by_product
                .entry(variant.product_id)
                .or_default()
                .push(variant);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let product_id = product.product_id;
                ProductDetail {
                    product,
                    categories: categories_by_product.remove(&product_id).unwrap_or_default(),
                    tags: tags_by_product.remove(&product_id).unwrap_or_default(),
                    variants: variants_by_product.remove(&product_id).unwrap_or_default(),
                }
            })
            .collect())
    }
}
