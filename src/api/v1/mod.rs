//! Versioned public API

use axum::{
    routing::{get, post, put},
    Router,
};

use super::state::AppState;

pub mod generate;
pub mod webhooks;

/// Routes under `/v1`
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate::create_generation))
        .route("/generations", get(generate::list_generations))
        .route(
            "/webhooks",
            put(webhooks::create_webhook)
                .get(webhooks::list_webhooks)
                .patch(webhooks::update_webhook)
                .delete(webhooks::delete_webhook),
        )
        .route("/webhooks/{id}/deliveries", get(webhooks::list_deliveries))
}
