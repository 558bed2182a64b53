use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{create_profile, get_profile, get_recommendations, update_profile};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/", post(create_profile))
        .route("/", put(update_profile))
        .route("/recommendations", get(get_recommendations))
}
