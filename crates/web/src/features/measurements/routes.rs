use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{get_measurements, recommend_size, upsert_measurements};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_measurements))
        .route("/", put(upsert_measurements))
}

pub fn recommendation_routes() -> Router<AppState> {
    Router::new().route("/", post(recommend_size))
}
