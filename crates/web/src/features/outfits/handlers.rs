use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::dto::common::{PageQuery, Paged};
use storage::dto::outfit::{
    AddOutfitProductRequest, CreateOutfitRequest, OutfitDetailResponse, OutfitResponse,
    RecommendedOutfitsResponse, UpdateOutfitRequest,
};
use storage::dto::product::ProductDetailResponse;
use storage::dto::style_profile::ProductRecommendation;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CustomerId;
use crate::state::AppState;

use super::services;

const DEFAULT_RECOMMENDED_OUTFITS: i64 = 5;
const DEFAULT_SUGGESTED_PRODUCTS: usize = 10;

#[derive(Debug, Deserialize, IntoParams)]
pub struct OutfitListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Restrict the list to the calling customer's outfits
    #[serde(default)]
    pub mine: bool,
}

#[utoipa::path(
    post,
    path = "/api/outfits",
    request_body = CreateOutfitRequest,
    responses(
        (status = 201, description = "Outfit created", body = OutfitDetailResponse),
        (status = 400, description = "Validation error or empty product list"),
        (status = 404, description = "Customer or product not found")
    ),
    tag = "outfits"
)]
pub async fn create_outfit(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Json(req): Json<CreateOutfitRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let detail =
        services::create_outfit(state.db.pool(), &state.events, customer_id, &req).await?;

    Ok((StatusCode::CREATED, Json(OutfitDetailResponse::from(detail))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/outfits",
    params(OutfitListQuery),
    responses(
        (status = 200, description = "Active outfits", body = Paged<OutfitResponse>)
    ),
    tag = "outfits"
)]
pub async fn list_outfits(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Query(query): Query<OutfitListQuery>,
) -> Result<Response, WebError> {
    let page = PageQuery {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(24),
    };
    page.ensure_valid().map_err(WebError::BadRequest)?;

    let owner = query.mine.then_some(customer_id);
    let (outfits, total_items) = services::list_outfits(state.db.pool(), &page, owner).await?;

    let items: Vec<OutfitResponse> = outfits.into_iter().map(OutfitResponse::from).collect();

    Ok(Json(Paged::new(items, &page, total_items)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/outfits/{outfit_id}",
    params(
        ("outfit_id" = Uuid, Path, description = "Outfit id")
    ),
    responses(
        (status = 200, description = "Outfit with member products", body = OutfitDetailResponse),
        (status = 404, description = "Outfit not found")
    ),
    tag = "outfits"
)]
pub async fn get_outfit(
    State(state): State<AppState>,
    Path(outfit_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::get_outfit(state.db.pool(), outfit_id).await?;

    Ok(Json(OutfitDetailResponse::from(detail)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/outfits/{outfit_id}",
    params(
        ("outfit_id" = Uuid, Path, description = "Outfit id")
    ),
    request_body = UpdateOutfitRequest,
    responses(
        (status = 200, description = "Outfit updated", body = OutfitDetailResponse),
        (status = 400, description = "Validation error or empty replacement list"),
        (status = 403, description = "Outfit belongs to another customer"),
        (status = 404, description = "Outfit not found")
    ),
    tag = "outfits"
)]
pub async fn update_outfit(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Path(outfit_id): Path<Uuid>,
    Json(req): Json<UpdateOutfitRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let detail = services::update_outfit(
        state.db.pool(),
        &state.events,
        customer_id,
        outfit_id,
        &req,
    )
    .await?;

    Ok(Json(OutfitDetailResponse::from(detail)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/outfits/{outfit_id}",
    params(
        ("outfit_id" = Uuid, Path, description = "Outfit id")
    ),
    responses(
        (status = 204, description = "Outfit deleted"),
        (status = 403, description = "Outfit belongs to another customer"),
        (status = 404, description = "Outfit not found")
    ),
    tag = "outfits"
)]
pub async fn delete_outfit(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Path(outfit_id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_outfit(state.db.pool(), &state.events, customer_id, outfit_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/outfits/{outfit_id}/products",
    params(
        ("outfit_id" = Uuid, Path, description = "Outfit id")
    ),
    request_body = AddOutfitProductRequest,
    responses(
        (status = 200, description = "Product added", body = OutfitDetailResponse),
        (status = 403, description = "Outfit belongs to another customer"),
        (status = 404, description = "Outfit or product not found"),
        (status = 409, description = "Product already in the outfit")
    ),
    tag = "outfits"
)]
pub async fn add_outfit_product(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Path(outfit_id): Path<Uuid>,
    Json(req): Json<AddOutfitProductRequest>,
) -> Result<Response, WebError> {
    let detail = services::add_product(
        state.db.pool(),
        &state.events,
        customer_id,
        outfit_id,
        req.product_id,
    )
    .await?;

    Ok(Json(OutfitDetailResponse::from(detail)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/outfits/{outfit_id}/products/{product_id}",
    params(
        ("outfit_id" = Uuid, Path, description = "Outfit id"),
        ("product_id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product removed", body = OutfitDetailResponse),
        (status = 400, description = "Removal would leave the outfit empty"),
        (status = 403, description = "Outfit belongs to another customer"),
        (status = 404, description = "Outfit or membership not found")
    ),
    tag = "outfits"
)]
pub async fn remove_outfit_product(
    State(state): State<AppState>,
    CustomerId(customer_id): CustomerId,
    Path((outfit_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    let detail = services::remove_product(
        state.db.pool(),
        &state.events,
        customer_id,
        outfit_id,
        product_id,
    )
    .await?;

    Ok(Json(OutfitDetailResponse::from(detail)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/products/{product_id}/recommended-outfits",
    params(
        ("product_id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Outfits featuring the product, or recent outfits as fallback", body = RecommendedOutfitsResponse),
        (status = 404, description = "Product not found")
    ),
    tag = "outfits"
)]
pub async fn recommended_outfits(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let details = services::recommended_for_product(
        state.db.pool(),
        product_id,
        DEFAULT_RECOMMENDED_OUTFITS,
    )
    .await?;

    let outfits: Vec<OutfitDetailResponse> = details
        .into_iter()
        .map(OutfitDetailResponse::from)
        .collect();

    Ok(Json(RecommendedOutfitsResponse { outfits }).into_response())
}

#[utoipa::path(
    get,
    path = "/api/outfits/{outfit_id}/suggested-products",
    params(
        ("outfit_id" = Uuid, Path, description = "Outfit id")
    ),
    responses(
        (status = 200, description = "Catalog products ranked by similarity to the outfit", body = Vec<ProductRecommendation>),
        (status = 404, description = "Outfit not found")
    ),
    tag = "outfits"
)]
pub async fn suggested_products(
    State(state): State<AppState>,
    Path(outfit_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let scored =
        services::suggest_products(state.db.pool(), outfit_id, DEFAULT_SUGGESTED_PRODUCTS).await?;

    let suggestions: Vec<ProductRecommendation> = scored
        .into_iter()
        .map(|(product, match_score)| ProductRecommendation {
            product: ProductDetailResponse::from(product),
            match_score,
        })
        .collect();

    Ok(Json(suggestions).into_response())
}
