pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/sessions/:id", get(handlers::handle_get_session))
        .route(
            "/api/v1/sessions/:id/candidate",
            put(handlers::handle_submit_candidate),
        )
        .route(
            "/api/v1/sessions/:id/candidate/dummy",
            post(handlers::handle_dummy_candidate),
        )
        .route(
            "/api/v1/sessions/:id/messages",
            post(handlers::handle_message),
        )
        .with_state(state)
}
