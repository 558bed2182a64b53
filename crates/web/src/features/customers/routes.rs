use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{get_customer, register_customer};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register_customer))
        .route("/:customer_id", get(get_customer))
}
