use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::dto::common::{PageQuery, Paged};
use storage::dto::product::{CreateProductRequest, ProductDetailResponse, ProductResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/products",
    params(PageQuery),
    responses(
        (status = 200, description = "List catalog products", body = Paged<ProductResponse>)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Response, WebError> {
    page.ensure_valid().map_err(WebError::BadRequest)?;

    let (products, total_items) = services::list_products(state.db.pool(), &page).await?;

    let items: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

    Ok(Json(Paged::new(items, &page, total_items)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product with relations", body = ProductDetailResponse),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::get_product_detail(state.db.pool(), product_id).await?;

    Ok(Json(ProductDetailResponse::from(detail)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Product created successfully", body = ProductDetailResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let detail = services::create_product(state.db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(ProductDetailResponse::from(detail))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/products/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Product deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_product(state.db.pool(), product_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
