use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::dto::product::ProductDetailResponse;
use storage::dto::style_profile::{
    ProductRecommendation, RecommendationsResponse, StyleProfileResponse,
    UpsertStyleProfileRequest,
};
use utoipa::IntoParams;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CustomerId;
use crate::state::AppState;

use super::services;

const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
const MAX_RECOMMENDATION_LIMIT: usize = 50;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecommendationQuery {
    /// Maximum number of recommendations to return
    pub limit: Option<usize>,
}

#[utoipa::path(
    post,
    path = "/api/style-profile",
    request_body = UpsertStyleProfileRequest,
    responses(
        (status = 201, description = "Style profile created", body = StyleProfileResponse),
        (status = 400, description = "A preference is outside the vocabulary"),
        (status = 409, description = "Profile already exists")
    ),
    tag = "style-profile"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Json(req): Json<UpsertStyleProfileRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let profile = services::create_profile(state.db.pool(), customer_id, &req).await?;

    Ok((StatusCode::CREATED, Json(StyleProfileResponse::from(profile))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/style-profile",
    request_body = UpsertStyleProfileRequest,
    responses(
        (status = 200, description = "Style profile updated", body = StyleProfileResponse),
        (status = 400, description = "A preference is outside the vocabulary"),
        (status = 404, description = "No profile to update")
    ),
    tag = "style-profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Json(req): Json<UpsertStyleProfileRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let profile = services::update_profile(state.db.pool(), customer_id, &req).await?;

    Ok(Json(StyleProfileResponse::from(profile)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/style-profile",
    responses(
        (status = 200, description = "The customer's style profile", body = StyleProfileResponse),
        (status = 404, description = "No profile recorded")
    ),
    tag = "style-profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
) -> Result<Response, WebError> {
    let profile = services::get_profile(state.db.pool(), customer_id).await?;

    Ok(Json(StyleProfileResponse::from(profile)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/style-profile/recommendations",
    params(RecommendationQuery),
    responses(
        (status = 200, description = "Catalog products ranked by profile affinity", body = RecommendationsResponse),
        (status = 404, description = "No profile recorded")
    ),
    tag = "style-profile"
)]
pub async fn get_recommendations(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Query(query): Query<RecommendationQuery>,
) -> Result<Response, WebError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
        .min(MAX_RECOMMENDATION_LIMIT);

    let scored = services::recommend_products(state.db.pool(), customer_id, limit).await?;

    let recommendations: Vec<ProductRecommendation> = scored
        .into_iter()
        .map(|(product, match_score)| ProductRecommendation {
            product: ProductDetailResponse::from(product),
            match_score,
        })
        .collect();

    Ok(Json(RecommendationsResponse { recommendations }).into_response())
}
