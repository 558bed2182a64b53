use sqlx::PgPool;
use storage::{
    dto::common::PageQuery,
    dto::outfit::{CreateOutfitRequest, UpdateOutfitRequest},
    error::Result,
    models::{Outfit, OutfitDetail, ProductDetail},
    repository::{
        customer::CustomerRepository, outfit::OutfitRepository, product::ProductRepository,
    },
    services::outfit_similarity,
};
use uuid::Uuid;

use crate::events::{DomainEvent, EventBus, names};

/// Create an outfit owned by the customer
pub async fn create_outfit(
    pool: &PgPool,
    events: &EventBus,
    customer_id: Uuid,
    request: &CreateOutfitRequest,
) -> Result<OutfitDetail> {
    CustomerRepository::new(pool).ensure_exists(customer_id).await?;

    let repo = OutfitRepository::new(pool);
    let outfit = repo
        .create(&request.name, Some(customer_id), &request.product_ids)
        .await?;

    events.publish(
        DomainEvent::new(names::OUTFIT_CREATED)
            .entity(outfit.outfit_id)
            .customer(customer_id)
            .payload(serde_json::json!({
                "product_count": request.product_ids.len(),
            })),
    );

    repo.find_detail(outfit.outfit_id).await
}

/// List active outfits, optionally only the customer's own
pub async fn list_outfits(
    pool: &PgPool,
    page: &PageQuery,
    customer_id: Option<Uuid>,
) -> Result<(Vec<Outfit>, i64)> {
    let repo = OutfitRepository::new(pool);
    repo.list(page, customer_id).await
}

/// Get an outfit with its member products
pub async fn get_outfit(pool: &PgPool, outfit_id: Uuid) -> Result<OutfitDetail> {
    let repo = OutfitRepository::new(pool);
    repo.find_detail(outfit_id).await
}

/// Rename an outfit and/or replace its member list
pub async fn update_outfit(
    pool: &PgPool,
    events: &EventBus,
    customer_id: Uuid,
    outfit_id: Uuid,
    request: &UpdateOutfitRequest,
) -> Result<OutfitDetail> {
    let repo = OutfitRepository::new(pool);

    let outfit = repo.find_by_id(outfit_id).await?;
    outfit.ensure_owned_by(customer_id)?;

    repo.update(
        outfit_id,
        request.name.as_deref(),
        request.product_ids.as_deref(),
    )
    .await?;

    events.publish(
        DomainEvent::new(names::OUTFIT_UPDATED)
            .entity(outfit_id)
            .customer(customer_id),
    );

    repo.find_detail(outfit_id).await
}

/// Soft-delete an outfit
pub async fn delete_outfit(
    pool: &PgPool,
    events: &EventBus,
    customer_id: Uuid,
    outfit_id: Uuid,
) -> Result<()> {
    let repo = OutfitRepository::new(pool);

    let outfit = repo.find_by_id(outfit_id).await?;
    outfit.ensure_owned_by(customer_id)?;

    repo.delete(outfit_id).await?;

    events.publish(
        DomainEvent::new(names::OUTFIT_DELETED)
            .entity(outfit_id)
            .customer(customer_id),
    );

    Ok(())
}

/// Append a product to an outfit
pub async fn add_product(
    pool: &PgPool,
    events: &EventBus,
    customer_id: Uuid,
    outfit_id: Uuid,
    product_id: Uuid,
) -> Result<OutfitDetail> {
    let repo = OutfitRepository::new(pool);

    let outfit = repo.find_by_id(outfit_id).await?;
    outfit.ensure_owned_by(customer_id)?;

    repo.add_product(outfit_id, product_id).await?;

    events.publish(
        DomainEvent::new(names::OUTFIT_UPDATED)
            .entity(outfit_id)
            .customer(customer_id)
            .payload(serde_json::json!({ "added_product": product_id })),
    );

    repo.find_detail(outfit_id).await
}

/// Remove a product; the outfit must keep at least one member
pub async fn remove_product(
    pool: &PgPool,
    events: &EventBus,
    customer_id: Uuid,
    outfit_id: Uuid,
    product_id: Uuid,
) -> Result<OutfitDetail> {
    let repo = OutfitRepository::new(pool);

    let outfit = repo.find_by_id(outfit_id).await?;
    outfit.ensure_owned_by(customer_id)?;

    repo.remove_product(outfit_id, product_id).await?;

    events.publish(
        DomainEvent::new(names::OUTFIT_UPDATED)
            .entity(outfit_id)
            .customer(customer_id)
            .payload(serde_json::json!({ "removed_product": product_id })),
    );

    repo.find_detail(outfit_id).await
}

/// Outfits to show on a product page: those already containing the
/// product, falling back to the most recent outfits when none do.
pub async fn recommended_for_product(
    pool: &PgPool,
    product_id: Uuid,
    limit: i64,
) -> Result<Vec<OutfitDetail>> {
    ProductRepository::new(pool).find_by_id(product_id).await?;

    let repo = OutfitRepository::new(pool);

    let mut outfits = repo.list_containing_product(product_id, limit).await?;
    if outfits.is_empty() {
        outfits = repo.list_recent(limit).await?;
    }

    let mut details = Vec::with_capacity(outfits.len());
    for outfit in outfits {
        let products = repo.load_member_products(outfit.outfit_id).await?;
        details.push(OutfitDetail { outfit, products });
    }

    Ok(details)
}

/// Catalog products ranked by similarity to the outfit's current
/// members, best first. Existing members are excluded.
pub async fn suggest_products(
    pool: &PgPool,
    outfit_id: Uuid,
    limit: usize,
) -> Result<Vec<(ProductDetail, f64)>> {
    let detail = OutfitRepository::new(pool).find_detail(outfit_id).await?;

    let member_ids: Vec<Uuid> = detail
        .products
        .iter()
        .map(|p| p.product.product_id)
        .collect();

    let candidates = ProductRepository::new(pool).list_details_active().await?;

    let mut scored: Vec<(ProductDetail, f64)> = candidates
        .into_iter()
        .filter(|candidate| !member_ids.contains(&candidate.product.product_id))
        .map(|candidate| {
            let score = outfit_similarity::similarity(&detail.products, &candidate);
            (candidate, score)
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
