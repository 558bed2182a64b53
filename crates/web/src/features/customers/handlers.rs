use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::customer::{CustomerResponse, RegisterCustomerRequest};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = RegisterCustomerRequest,
    responses(
        (status = 201, description = "Customer registered successfully", body = CustomerResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "customers"
)]
pub async fn register_customer(
    State(state): State<AppState>,
    Json(req): Json<RegisterCustomerRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let customer = services::register(state.db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/customers/{customer_id}",
    params(
        ("customer_id" = Uuid, Path, description = "Customer id")
    ),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let customer = services::get_customer(state.db.pool(), customer_id).await?;

    Ok(Json(CustomerResponse::from(customer)).into_response())
}
