use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::try_on::{CreateTryOnRequest, TryOnListResponse, TryOnResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CustomerId;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/try-on",
    request_body = CreateTryOnRequest,
    responses(
        (status = 202, description = "Request accepted; generation runs out-of-band", body = TryOnResponse),
        (status = 404, description = "Customer, product or uploaded image not found"),
        (status = 500, description = "Try-on service not configured")
    ),
    tag = "try-on"
)]
pub async fn create_try_on(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Json(req): Json<CreateTryOnRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record = services::create_try_on(
        state.db.pool(),
        state.events.clone(),
        state.pipeline.clone(),
        customer_id,
        &req,
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(TryOnResponse::from_request(record, None)),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/try-on/{request_id}",
    params(
        ("request_id" = Uuid, Path, description = "Try-on request id")
    ),
    responses(
        (status = 200, description = "Current state of the request", body = TryOnResponse),
        (status = 403, description = "Request belongs to another customer"),
        (status = 404, description = "Request not found")
    ),
    tag = "try-on"
)]
pub async fn get_try_on(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Path(request_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let (record, result_image_url) =
        services::get_try_on(state.db.pool(), customer_id, request_id).await?;

    Ok(Json(TryOnResponse::from_request(record, result_image_url)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/try-on",
    responses(
        (status = 200, description = "The customer's try-on requests, newest first", body = TryOnListResponse)
    ),
    tag = "try-on"
)]
pub async fn list_try_ons(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
) -> Result<Response, WebError> {
    let records = services::list_try_ons(state.db.pool(), customer_id).await?;

    let try_ons: Vec<TryOnResponse> = records
        .into_iter()
        .map(|(record, url)| TryOnResponse::from_request(record, url))
        .collect();

    Ok(Json(TryOnListResponse { try_ons }).into_response())
}
