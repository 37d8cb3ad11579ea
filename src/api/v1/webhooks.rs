//! Webhook subscription endpoints
//!
//! All routes require the `webhooks_manage` scope. Subscriptions are
//! account scoped; other accounts' subscriptions look like they do not
//! exist.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::middleware::{require_scope, RequireApiKey};
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateWebhookRequest, DeliveryAttemptResponse, Json, ListQuery,
    UpdateWebhookRequest, WebhookIdQuery, WebhookResponse,
};
use crate::domain::api_key::Scope;
use crate::domain::webhook::{WebhookId, WebhookSubscription};

const DEFAULT_DELIVERY_LIMIT: usize = 50;
const MAX_DELIVERY_LIMIT: usize = 200;

/// `PUT /v1/webhooks`
pub async fn create_webhook(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Json(request): Json<CreateWebhookRequest>,
) -> Result<(StatusCode, Json<WebhookResponse>), ApiError> {
    require_scope(&api_key, Scope::WebhooksManage)?;

    let mut subscription = WebhookSubscription::new(
        WebhookId::generate(),
        api_key.account_id().clone(),
        request.name,
        request.url,
    )
    .with_events(request.events)
    .with_active(request.active);

    if let Some(secret) = request.secret {
        subscription = subscription.with_secret(secret);
    }
    for (name, value) in request.headers {
        subscription = subscription.with_header(name, value);
    }

    let created = state.webhook_service.create(subscription).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// `GET /v1/webhooks`
pub async fn list_webhooks(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
) -> Result<Json<Vec<WebhookResponse>>, ApiError> {
    require_scope(&api_key, Scope::WebhooksManage)?;

    let subscriptions = state.webhook_service.list(api_key.account_id()).await?;
    Ok(Json(subscriptions.into_iter().map(Into::into).collect()))
}

/// `PATCH /v1/webhooks?id=...`
pub async fn update_webhook(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Query(query): Query<WebhookIdQuery>,
    Json(request): Json<UpdateWebhookRequest>,
) -> Result<Json<WebhookResponse>, ApiError> {
    require_scope(&api_key, Scope::WebhooksManage)?;

    let id = WebhookId::from(query.id);
    let mut subscription = state.webhook_service.get(api_key.account_id(), &id).await?;

    if let Some(name) = request.name {
        subscription.name = name;
    }
    if let Some(url) = request.url {
        subscription.url = url;
    }
    if let Some(events) = request.events {
        subscription.events = events;
    }
    if let Some(secret) = request.secret {
        subscription.secret = Some(secret);
    }
    if let Some(headers) = request.headers {
        subscription.headers = headers;
    }
    if let Some(active) = request.active {
        subscription.active = active;
    }

    let updated = state
        .webhook_service
        .update(api_key.account_id(), subscription)
        .await?;
    Ok(Json(updated.into()))
}

/// `DELETE /v1/webhooks?id=...`
pub async fn delete_webhook(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Query(query): Query<WebhookIdQuery>,
) -> Result<StatusCode, ApiError> {
    require_scope(&api_key, Scope::WebhooksManage)?;

    let id = WebhookId::from(query.id);
    state
        .webhook_service
        .delete(api_key.account_id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/webhooks/{id}/deliveries`
pub async fn list_deliveries(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Path(id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DeliveryAttemptResponse>>, ApiError> {
    require_scope(&api_key, Scope::WebhooksManage)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_DELIVERY_LIMIT)
        .min(MAX_DELIVERY_LIMIT);

    let attempts = state
        .webhook_service
        .deliveries(api_key.account_id(), &WebhookId::from(id), limit)
        .await?;
    Ok(Json(attempts.into_iter().map(Into::into).collect()))
}
