//! API key management endpoints
//!
//! Guarded by the `keys_manage` scope of the calling key. All operations
//! act on the caller's own account.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::middleware::{require_scope, RequireApiKey};
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ApiKeyResponse, CreateApiKeyRequest, CreatedApiKeyResponse, Json,
    UpdateApiKeyRequest,
};
use crate::domain::api_key::{ApiKeyId, Scope};

fn parse_key_id(id: &str) -> Result<ApiKeyId, ApiError> {
    ApiKeyId::new(id).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// `POST /admin/keys`
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireApiKey(caller): RequireApiKey,
    Json(request): Json<CreateApiKeyRequest>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), ApiError> {
    require_scope(&caller, Scope::KeysManage)?;

    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let scopes: HashSet<Scope> = if request.scopes.is_empty() {
        HashSet::from([Scope::Generate])
    } else {
        request.scopes.iter().copied().collect()
    };

    let issued = state
        .api_key_service
        .issue(
            caller.account_id().clone(),
            &request.name,
            scopes,
            request.rate_limit,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedApiKeyResponse {
            key: ApiKeyResponse::from(&issued.api_key),
            secret: issued.secret,
        }),
    ))
}

/// `GET /admin/keys`
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireApiKey(caller): RequireApiKey,
) -> Result<Json<Vec<ApiKeyResponse>>, ApiError> {
    require_scope(&caller, Scope::KeysManage)?;

    let keys = state.api_key_service.list(caller.account_id()).await?;
    Ok(Json(keys.iter().map(ApiKeyResponse::from).collect()))
}

/// `GET /admin/keys/{id}`
pub async fn get_api_key(
    State(state): State<AppState>,
    RequireApiKey(caller): RequireApiKey,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    require_scope(&caller, Scope::KeysManage)?;

    let key_id = parse_key_id(&id)?;
    let key = state
        .api_key_service
        .get(caller.account_id(), &key_id)
        .await?;
    Ok(Json(ApiKeyResponse::from(&key)))
}

/// `PATCH /admin/keys/{id}`
pub async fn update_api_key(
    State(state): State<AppState>,
    RequireApiKey(caller): RequireApiKey,
    Path(id): Path<String>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    require_scope(&caller, Scope::KeysManage)?;

    let key_id = parse_key_id(&id)?;

    if let Some(scopes) = &request.scopes {
        state
            .api_key_service
            .update_scopes(
                caller.account_id(),
                &key_id,
                scopes.iter().copied().collect(),
            )
            .await?;
    }

    if let Some(rate_limit) = request.rate_limit {
        state
            .api_key_service
            .update_rate_limit(caller.account_id(), &key_id, rate_limit)
            .await?;
    }

    let key = state
        .api_key_service
        .get(caller.account_id(), &key_id)
        .await?;
    Ok(Json(ApiKeyResponse::from(&key)))
}

/// `POST /admin/keys/{id}/revoke`
pub async fn revoke_api_key(
    State(state): State<AppState>,
    RequireApiKey(caller): RequireApiKey,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    require_scope(&caller, Scope::KeysManage)?;

    let key_id = parse_key_id(&id)?;
    let revoked = state
        .api_key_service
        .revoke(caller.account_id(), &key_id)
        .await?;
    Ok(Json(ApiKeyResponse::from(&revoked)))
}

/// `DELETE /admin/keys/{id}`
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireApiKey(caller): RequireApiKey,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_scope(&caller, Scope::KeysManage)?;

    let key_id = parse_key_id(&id)?;
    state
        .api_key_service
        .delete(caller.account_id(), &key_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::types::ApiErrorCode;
    use crate::domain::account::AccountId;
    use crate::domain::api_key::ApiKey;
    use crate::domain::credentials::mock::MockCredentialProvider;
    use crate::domain::generation::engine::stub::StubEngine;
    use crate::infrastructure::api_key::{
        ApiKeyGenerator, ApiKeyService, FixedWindowRateLimiter, InMemoryApiKeyRepository,
    };
    use crate::infrastructure::generation::InMemoryGenerationHistory;
    use crate::infrastructure::webhook::{
        EventPublisher, InMemoryDeliveryLog, InMemoryWebhookRepository, WebhookService,
    };

    fn test_state() -> AppState {
        let rate_limiter = Arc::new(FixedWindowRateLimiter::new());
        let api_key_service = ApiKeyService::new(
            Arc::new(InMemoryApiKeyRepository::new()),
            rate_limiter.clone(),
        )
        .with_generator(ApiKeyGenerator::test());

        let webhook_repo = Arc::new(InMemoryWebhookRepository::new());
        let delivery_log = Arc::new(InMemoryDeliveryLog::new());
        let publisher = EventPublisher::new(webhook_repo.clone(), delivery_log.clone());

        AppState::new(
            Arc::new(api_key_service),
            Arc::new(WebhookService::new(webhook_repo, delivery_log)),
            rate_limiter,
            Arc::new(MockCredentialProvider::new()),
            Arc::new(StubEngine::succeeding()),
            Arc::new(InMemoryGenerationHistory::new()),
            publisher,
        )
    }

    async fn admin_key(state: &AppState, account: &str) -> ApiKey {
        state
            .api_key_service
            .issue(
                AccountId::new(account).unwrap(),
                "Admin Key",
                HashSet::from([Scope::KeysManage]),
                None,
            )
            .await
            .unwrap()
            .api_key
    }

    #[tokio::test]
    async fn test_create_returns_secret_once() {
        let state = test_state();
        let caller = admin_key(&state, "acct-1").await;

        let (status, created) = create_api_key(
            State(state.clone()),
            RequireApiKey(caller.clone()),
            Json(CreateApiKeyRequest {
                name: "CI Key".to_string(),
                scopes: vec![Scope::Generate],
                rate_limit: Some(120),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(created.secret.starts_with("mk_test_"));
        assert_eq!(created.key.rate_limit, 120);

        // Listing never exposes the secret again
        let listed = list_api_keys(State(state), RequireApiKey(caller))
            .await
            .unwrap();
        let json = serde_json::to_string(&*listed).unwrap();
        assert!(!json.contains(&created.secret));
    }

    #[tokio::test]
    async fn test_create_defaults_to_generate_scope() {
        let state = test_state();
        let caller = admin_key(&state, "acct-1").await;

        let (_, created) = create_api_key(
            State(state),
            RequireApiKey(caller),
            Json(CreateApiKeyRequest {
                name: "Default Key".to_string(),
                scopes: vec![],
                rate_limit: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(created.key.scopes, vec![Scope::Generate]);
    }

    #[tokio::test]
    async fn test_requires_keys_manage_scope() {
        let state = test_state();
        let caller = state
            .api_key_service
            .issue(
                AccountId::new("acct-1").unwrap(),
                "Plain Key",
                HashSet::from([Scope::Generate]),
                None,
            )
            .await
            .unwrap()
            .api_key;

        let err = list_api_keys(State(state), RequireApiKey(caller))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::InsufficientScope);
    }

    #[tokio::test]
    async fn test_revoke_and_delete() {
        let state = test_state();
        let caller = admin_key(&state, "acct-1").await;

        let (_, created) = create_api_key(
            State(state.clone()),
            RequireApiKey(caller.clone()),
            Json(CreateApiKeyRequest {
                name: "Ephemeral".to_string(),
                scopes: vec![Scope::Generate],
                rate_limit: None,
            }),
        )
        .await
        .unwrap();

        let revoked = revoke_api_key(
            State(state.clone()),
            RequireApiKey(caller.clone()),
            Path(created.key.id.clone()),
        )
        .await
        .unwrap();
        assert!(!revoked.active);

        // The revoked secret no longer authenticates
        assert!(state
            .api_key_service
            .validate(&created.secret)
            .await
            .unwrap()
            .is_none());

        let status = delete_api_key(
            State(state.clone()),
            RequireApiKey(caller.clone()),
            Path(created.key.id.clone()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = get_api_key(State(state), RequireApiKey(caller), Path(created.key.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_scopes_and_rate_limit() {
        let state = test_state();
        let caller = admin_key(&state, "acct-1").await;

        let (_, created) = create_api_key(
            State(state.clone()),
            RequireApiKey(caller.clone()),
            Json(CreateApiKeyRequest {
                name: "Adjustable".to_string(),
                scopes: vec![Scope::Generate],
                rate_limit: Some(60),
            }),
        )
        .await
        .unwrap();

        let updated = update_api_key(
            State(state),
            RequireApiKey(caller),
            Path(created.key.id.clone()),
            Json(UpdateApiKeyRequest {
                scopes: Some(vec![Scope::Generate, Scope::WebhooksManage]),
                rate_limit: Some(240),
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.rate_limit, 240);
        assert!(updated.scopes.contains(&Scope::WebhooksManage));
    }

    #[tokio::test]
    async fn test_cross_account_key_is_invisible() {
        let state = test_state();
        let owner = admin_key(&state, "acct-1").await;
        let outsider = admin_key(&state, "acct-2").await;

        let (_, created) = create_api_key(
            State(state.clone()),
            RequireApiKey(owner),
            Json(CreateApiKeyRequest {
                name: "Private".to_string(),
                scopes: vec![Scope::Generate],
                rate_limit: None,
            }),
        )
        .await
        .unwrap();

        let err = get_api_key(
            State(state),
            RequireApiKey(outsider),
            Path(created.key.id.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
