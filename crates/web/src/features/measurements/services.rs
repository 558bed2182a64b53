use sqlx::PgPool;
use storage::{
    dto::measurement::{
        SizeAlternative, SizeRecommendationRequest, SizeRecommendationResponse,
        UpsertMeasurementsRequest,
    },
    error::Result,
    models::BodyMeasurement,
    repository::{
        customer::CustomerRepository, measurement::MeasurementRepository,
        product::ProductRepository,
    },
    services::{size_chart::DEFAULT_SIZE_CHART, size_recommendation, style_matching},
};
use uuid::Uuid;

/// Create or replace the customer's measurement set
pub async fn upsert_measurements(
    pool: &PgPool,
    customer_id: Uuid,
    request: &UpsertMeasurementsRequest,
) -> Result<BodyMeasurement> {
    CustomerRepository::new(pool).ensure_exists(customer_id).await?;

    let repo = MeasurementRepository::new(pool);
    repo.upsert(customer_id, request).await
}

/// Get the customer's stored measurements
pub async fn get_measurements(pool: &PgPool, customer_id: Uuid) -> Result<BodyMeasurement> {
    let repo = MeasurementRepository::new(pool);
    repo.find_by_customer(customer_id).await
}

/// Recommend a size for a product.
///
/// Inline measurements win; otherwise the customer's stored set is used.
/// The garment category comes from the product's own declaration when it
/// has one (even an unknown one, which triggers the low-confidence
/// fallback) and from inference otherwise.
pub async fn recommend_size(
    pool: &PgPool,
    customer_id: Uuid,
    request: &SizeRecommendationRequest,
) -> Result<SizeRecommendationResponse> {
    let product = ProductRepository::new(pool)
        .find_detail(request.product_id)
        .await?;

    let available_sizes: Vec<String> = product
        .variants
        .iter()
        .map(|v| v.size_label.clone())
        .collect();

    let measurements = match &request.measurements {
        Some(inline) if !inline.is_empty() => inline.to_set(),
        _ => {
            MeasurementRepository::new(pool)
                .find_by_customer(customer_id)
                .await?
                .to_set()
        }
    };

    let category = product
        .product
        .metadata_str("garment_category")
        .unwrap_or_else(|| style_matching::infer_garment_category(&product).to_string());

    let recommendation = size_recommendation::recommend(
        &DEFAULT_SIZE_CHART,
        &category,
        &measurements,
        &available_sizes,
    )?;

    Ok(SizeRecommendationResponse {
        product_id: request.product_id,
        garment_category: category,
        recommended_size: recommendation.size,
        confidence: recommendation.confidence,
        alternative_sizes: recommendation
            .alternatives
            .into_iter()
            .map(|a| SizeAlternative {
                size: a.size,
                confidence: a.confidence,
            })
            .collect(),
    })
}
