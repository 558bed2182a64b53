use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::measurement::{
    MeasurementsResponse, SizeRecommendationRequest, SizeRecommendationResponse,
    UpsertMeasurementsRequest,
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CustomerId;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    put,
    path = "/api/measurements",
    request_body = UpsertMeasurementsRequest,
    responses(
        (status = 200, description = "Measurements stored", body = MeasurementsResponse),
        (status = 400, description = "A measurement is out of range"),
        (status = 404, description = "Customer not found")
    ),
    tag = "measurements"
)]
pub async fn upsert_measurements(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Json(req): Json<UpsertMeasurementsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let measurement = services::upsert_measurements(state.db.pool(), customer_id, &req).await?;

    Ok(Json(MeasurementsResponse::from(measurement)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/measurements",
    responses(
        (status = 200, description = "Stored measurements", body = MeasurementsResponse),
        (status = 404, description = "No measurements recorded")
    ),
    tag = "measurements"
)]
pub async fn get_measurements(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
) -> Result<Response, WebError> {
    let measurement = services::get_measurements(state.db.pool(), customer_id).await?;

    Ok(Json(MeasurementsResponse::from(measurement)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/size-recommendations",
    request_body = SizeRecommendationRequest,
    responses(
        (status = 200, description = "Best size with confidence and alternatives", body = SizeRecommendationResponse),
        (status = 404, description = "Product, variants or measurements missing")
    ),
    tag = "measurements"
)]
pub async fn recommend_size(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Json(req): Json<SizeRecommendationRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let recommendation = services::recommend_size(state.db.pool(), customer_id, &req).await?;

    Ok(Json(recommendation).into_response())
}
