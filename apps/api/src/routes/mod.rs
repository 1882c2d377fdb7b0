pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::requirements::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/health", get(health::health_handler))
        .route("/process", post(handlers::handle_process))
        .with_state(state)
}
