use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::handlers::{
    add_outfit_product, create_outfit, delete_outfit, get_outfit, list_outfits,
    recommended_outfits, remove_outfit_product, suggested_products, update_outfit,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_outfits))
        .route("/", post(create_outfit))
        .route("/:outfit_id", get(get_outfit))
        .route("/:outfit_id", put(update_outfit))
        .route("/:outfit_id", delete(delete_outfit))
        .route("/:outfit_id/products", post(add_outfit_product))
        .route(
            "/:outfit_id/products/:product_id",
            delete(remove_outfit_product),
        )
        .route("/:outfit_id/suggested-products", get(suggested_products))
}

/// Outfit routes that hang off the product resource.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/:product_id/recommended-outfits", get(recommended_outfits))
}
