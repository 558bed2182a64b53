use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{create_try_on, get_try_on, list_try_ons};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_try_on))
        .route("/", get(list_try_ons))
        .route("/:request_id", get(get_try_on))
}
