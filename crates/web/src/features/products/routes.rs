use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use super::handlers::{create_product, delete_product, get_product, list_products};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_product))
        .route("/:product_id", delete(delete_product))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/", get(list_products))
        .route("/:product_id", get(get_product))
        .merge(protected)
}
