use sqlx::PgPool;
use storage::{
    dto::style_profile::UpsertStyleProfileRequest,
    error::Result,
    models::{ProductDetail, StyleProfile},
    repository::{
        customer::CustomerRepository, product::ProductRepository,
        style_profile::StyleProfileRepository,
    },
    services::{style_matching, vocabulary::DEFAULT_VOCABULARY},
};
use uuid::Uuid;

/// Create the customer's style profile; conflicts if one exists
pub async fn create_profile(
    pool: &PgPool,
    customer_id: Uuid,
    request: &UpsertStyleProfileRequest,
) -> Result<StyleProfile> {
    CustomerRepository::new(pool).ensure_exists(customer_id).await?;

    let repo = StyleProfileRepository::new(pool);
    repo.create(customer_id, request).await
}

/// Update the existing style profile
pub async fn update_profile(
    pool: &PgPool,
    customer_id: Uuid,
    request: &UpsertStyleProfileRequest,
) -> Result<StyleProfile> {
    let repo = StyleProfileRepository::new(pool);
    repo.update(customer_id, request).await
}

/// Get the customer's style profile
pub async fn get_profile(pool: &PgPool, customer_id: Uuid) -> Result<StyleProfile> {
    let repo = StyleProfileRepository::new(pool);
    repo.find_by_customer(customer_id).await
}

/// Score every active catalog product against the profile and return the
/// best matches, highest score first (ties broken by recency).
pub async fn recommend_products(
    pool: &PgPool,
    customer_id: Uuid,
    limit: usize,
) -> Result<Vec<(ProductDetail, f64)>> {
    let profile = StyleProfileRepository::new(pool)
        .find_by_customer(customer_id)
        .await?;

    let products = ProductRepository::new(pool).list_details_active().await?;

    let mut scored: Vec<(ProductDetail, f64)> = products
        .into_iter()
        .map(|product| {
            let score = style_matching::match_score(&product, &profile, &DEFAULT_VOCABULARY);
            (product, score)
        })
        .collect();

    scored.sort_by(|(a, score_a), (b, score_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.product.created_at.cmp(&a.product.created_at))
    });
    scored.truncate(limit);

    Ok(scored)
}
