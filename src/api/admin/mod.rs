//! Key management API

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub mod api_keys;

/// Routes under `/admin`
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/keys",
            post(api_keys::create_api_key).get(api_keys::list_api_keys),
        )
        .route(
            "/keys/{id}",
            get(api_keys::get_api_key)
                .patch(api_keys::update_api_key)
                .delete(api_keys::delete_api_key),
        )
        .route("/keys/{id}/revoke", post(api_keys::revoke_api_key))
}
