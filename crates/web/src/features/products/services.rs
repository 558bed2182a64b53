use sqlx::PgPool;
use storage::{
    dto::common::PageQuery,
    dto::product::CreateProductRequest,
    error::Result,
    models::{Product, ProductDetail},
    repository::product::ProductRepository,
};
use uuid::Uuid;

/// List active products, paginated
pub async fn list_products(pool: &PgPool, page: &PageQuery) -> Result<(Vec<Product>, i64)> {
    let repo = ProductRepository::new(pool);
    repo.list(page).await
}

/// Get a product with categories, tags and variants
pub async fn get_product_detail(pool: &PgPool, product_id: Uuid) -> Result<ProductDetail> {
    let repo = ProductRepository::new(pool);
    repo.find_detail(product_id).await
}

/// Create a catalog product
pub async fn create_product(pool: &PgPool, request: &CreateProductRequest) -> Result<ProductDetail> {
    let repo = ProductRepository::new(pool);
    repo.create(request).await
}

/// Soft-delete a product
pub async fn delete_product(pool: &PgPool, product_id: Uuid) -> Result<()> {
    let repo = ProductRepository::new(pool);
    repo.delete(product_id).await
}
