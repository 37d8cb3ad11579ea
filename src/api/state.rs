//! Application state for shared services

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::account::AccountId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, Scope};
use crate::domain::credentials::CredentialProvider;
use crate::domain::generation::{GenerationEngine, GenerationHistoryRepository};
use crate::domain::rate_limit::RateLimiter;
use crate::domain::DomainError;
use crate::infrastructure::api_key::{ApiKeyService, IssuedApiKey};
use crate::infrastructure::webhook::{EventPublisher, WebhookService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub api_key_service: Arc<dyn ApiKeyServiceTrait>,
    pub webhook_service: Arc<WebhookService>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub credential_provider: Arc<dyn CredentialProvider>,
    pub engine: Arc<dyn GenerationEngine>,
    pub history: Arc<dyn GenerationHistoryRepository>,
    pub publisher: EventPublisher,
}

/// Trait for API key service operations
#[async_trait::async_trait]
pub trait ApiKeyServiceTrait: Send + Sync {
    async fn validate(&self, key: &str) -> Result<Option<ApiKey>, DomainError>;
    async fn issue(
        &self,
        account_id: AccountId,
        name: &str,
        scopes: HashSet<Scope>,
        rate_limit: Option<u32>,
    ) -> Result<IssuedApiKey, DomainError>;
    async fn get(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<ApiKey, DomainError>;
    async fn list(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError>;
    async fn revoke(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<ApiKey, DomainError>;
    async fn delete(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<(), DomainError>;
    async fn update_rate_limit(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        requests_per_minute: u32,
    ) -> Result<ApiKey, DomainError>;
    async fn update_scopes(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        scopes: HashSet<Scope>,
    ) -> Result<ApiKey, DomainError>;
}

#[async_trait::async_trait]
impl<R: ApiKeyRepository + 'static> ApiKeyServiceTrait for ApiKeyService<R> {
    async fn validate(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        ApiKeyService::validate(self, key).await
    }

    async fn issue(
        &self,
        account_id: AccountId,
        name: &str,
        scopes: HashSet<Scope>,
        rate_limit: Option<u32>,
    ) -> Result<IssuedApiKey, DomainError> {
        let id = ApiKeyId::new(uuid::Uuid::new_v4().to_string())
            .map_err(|e| DomainError::internal(format!("Generated key ID was invalid: {}", e)))?;
        ApiKeyService::issue(self, id, account_id, name, scopes, rate_limit).await
    }

    async fn get(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        ApiKeyService::get(self, account_id, id).await
    }

    async fn list(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError> {
        ApiKeyService::list(self, account_id).await
    }

    async fn revoke(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        ApiKeyService::revoke(self, account_id, id).await
    }

    async fn delete(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<(), DomainError> {
        ApiKeyService::delete(self, account_id, id).await
    }

    async fn update_rate_limit(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        requests_per_minute: u32,
    ) -> Result<ApiKey, DomainError> {
        ApiKeyService::update_rate_limit(self, account_id, id, requests_per_minute).await
    }

    async fn update_scopes(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        scopes: HashSet<Scope>,
    ) -> Result<ApiKey, DomainError> {
        ApiKeyService::update_scopes(self, account_id, id, scopes).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(
        api_key_service: Arc<dyn ApiKeyServiceTrait>,
        webhook_service: Arc<WebhookService>,
        rate_limiter: Arc<dyn RateLimiter>,
        credential_provider: Arc<dyn CredentialProvider>,
        engine: Arc<dyn GenerationEngine>,
        history: Arc<dyn GenerationHistoryRepository>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            api_key_service,
            webhook_service,
            rate_limiter,
            credential_provider,
            engine,
            history,
            publisher,
        }
    }
}
