//! API key management service
//!
//! Issues keys, authenticates presented secrets and applies lifecycle
//! changes. Lifecycle changes are announced as key.* events through the
//! publisher; event payloads never contain secret material.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::account::AccountId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository, Scope};
use crate::domain::event::{DomainEvent, EventType};
use crate::domain::rate_limit::RateLimiter;
use crate::domain::DomainError;
use crate::infrastructure::webhook::EventPublisher;

use super::generator::ApiKeyGenerator;

/// Result of issuing a new API key
#[derive(Debug)]
pub struct IssuedApiKey {
    /// The stored key entity (hash and prefix only)
    pub api_key: ApiKey,
    /// The full secret, returned exactly once
    pub secret: String,
}

/// API key management service
pub struct ApiKeyService<R>
where
    R: ApiKeyRepository,
{
    repository: Arc<R>,
    generator: ApiKeyGenerator,
    rate_limiter: Arc<dyn RateLimiter>,
    publisher: Option<EventPublisher>,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    pub fn new(repository: Arc<R>, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::production(),
            rate_limiter,
            publisher: None,
        }
    }

    /// Use a custom generator (test prefixes, deterministic secrets)
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Announce key lifecycle changes through a publisher
    pub fn with_publisher(mut self, publisher: EventPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Issue a new API key. The returned secret is never recoverable.
    pub async fn issue(
        &self,
        id: ApiKeyId,
        account_id: AccountId,
        name: impl Into<String>,
        scopes: HashSet<Scope>,
        rate_limit: Option<u32>,
    ) -> Result<IssuedApiKey, DomainError> {
        let name = name.into();
        info!(key_id = %id, account_id = %account_id, "Issuing API key");

        let generated = self.generator.generate();
        self.store_issued(id, account_id, name, scopes, rate_limit, generated)
            .await
    }

    /// Issue a key with a known secret portion (integration tests)
    pub async fn issue_with_secret(
        &self,
        id: ApiKeyId,
        account_id: AccountId,
        name: impl Into<String>,
        secret: &str,
        scopes: HashSet<Scope>,
        rate_limit: Option<u32>,
    ) -> Result<IssuedApiKey, DomainError> {
        let generated = self.generator.from_secret(secret);
        self.store_issued(id, account_id, name.into(), scopes, rate_limit, generated)
            .await
    }

    async fn store_issued(
        &self,
        id: ApiKeyId,
        account_id: AccountId,
        name: String,
        scopes: HashSet<Scope>,
        rate_limit: Option<u32>,
        generated: super::generator::GeneratedApiKey,
    ) -> Result<IssuedApiKey, DomainError> {
        let mut api_key = ApiKey::new(
            id.clone(),
            account_id.clone(),
            &name,
            &generated.hash,
            &generated.prefix,
        )
        .with_scopes(scopes);

        if let Some(limit) = rate_limit {
            api_key = api_key.with_rate_limit(limit);
        }

        let created = self.repository.create(api_key).await?;

        self.emit(
            EventType::KeyCreated,
            serde_json::json!({
                "key_id": id.as_str(),
                "account_id": account_id.as_str(),
                "name": name,
            }),
        );

        Ok(IssuedApiKey {
            api_key: created,
            secret: generated.key,
        })
    }

    /// Authenticate a presented secret.
    ///
    /// Returns `None` for anything that does not resolve to an active key
    /// with a matching hash; the caller cannot tell which check failed.
    pub async fn validate(&self, key_secret: &str) -> Result<Option<ApiKey>, DomainError> {
        let Some(prefix) = ApiKeyGenerator::extract_prefix(key_secret) else {
            debug!("Presented key has no recognizable prefix");
            return Ok(None);
        };

        let Some(key) = self.repository.get_by_prefix(prefix).await? else {
            debug!(prefix = %prefix, "No key found for prefix");
            return Ok(None);
        };

        if !self.generator.verify_key(key_secret, key.secret_hash()) {
            debug!(key_id = %key.id(), "API key hash verification failed");
            return Ok(None);
        }

        if !key.is_active() {
            debug!(key_id = %key.id(), "API key is revoked");
            return Ok(None);
        }

        if let Err(e) = self.repository.record_usage(key.id()).await {
            warn!(key_id = %key.id(), error = %e, "Failed to record API key usage");
        }

        Ok(Some(key))
    }

    /// Get a key by ID, scoped to its owning account
    pub async fn get(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        self.repository
            .get(id)
            .await?
            .filter(|k| k.account_id() == account_id)
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))
    }

    /// List an account's keys
    pub async fn list(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list_by_account(account_id).await
    }

    /// Revoke a key so it can no longer authenticate
    pub async fn revoke(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
    ) -> Result<ApiKey, DomainError> {
        info!(key_id = %id, "Revoking API key");

        let mut key = self.get(account_id, id).await?;
        key.revoke();
        let updated = self.repository.update(&key).await?;

        self.rate_limiter.reset(id.as_str()).await;
        self.emit(
            EventType::KeyRemoved,
            serde_json::json!({
                "key_id": id.as_str(),
                "account_id": account_id.as_str(),
            }),
        );

        Ok(updated)
    }

    /// Permanently delete a key
    pub async fn delete(&self, account_id: &AccountId, id: &ApiKeyId) -> Result<(), DomainError> {
        info!(key_id = %id, "Deleting API key");

        self.get(account_id, id).await?;
        self.repository.delete(id).await?;
        self.rate_limiter.reset(id.as_str()).await;

        self.emit(
            EventType::KeyRemoved,
            serde_json::json!({
                "key_id": id.as_str(),
                "account_id": account_id.as_str(),
            }),
        );

        Ok(())
    }

    /// Change a key's per-minute rate limit
    pub async fn update_rate_limit(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        requests_per_minute: u32,
    ) -> Result<ApiKey, DomainError> {
        if requests_per_minute == 0 {
            return Err(DomainError::validation(
                "Rate limit must be at least 1 request per minute",
            ));
        }

        let mut key = self.get(account_id, id).await?;
        key.set_rate_limit(requests_per_minute);
        let updated = self.repository.update(&key).await?;

        // A fresh window under the new limit
        self.rate_limiter.reset(id.as_str()).await;
        self.emit_updated(account_id, id);

        Ok(updated)
    }

    /// Replace a key's scope set
    pub async fn update_scopes(
        &self,
        account_id: &AccountId,
        id: &ApiKeyId,
        scopes: HashSet<Scope>,
    ) -> Result<ApiKey, DomainError> {
        if scopes.is_empty() {
            return Err(DomainError::validation("A key needs at least one scope"));
        }

        let mut key = self.get(account_id, id).await?;
        key.set_scopes(scopes);
        let updated = self.repository.update(&key).await?;

        self.emit_updated(account_id, id);
        Ok(updated)
    }

    fn emit_updated(&self, account_id: &AccountId, id: &ApiKeyId) {
        self.emit(
            EventType::KeyUpdated,
            serde_json::json!({
                "key_id": id.as_str(),
                "account_id": account_id.as_str(),
            }),
        );
    }

    fn emit(&self, event_type: EventType, data: serde_json::Value) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(DomainEvent::new(event_type, data, "key-service"));
        }
    }
}
