//! In-memory API key repository

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::account::AccountId;
use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::DomainError;

/// HashMap-backed repository, suitable for a single gateway instance
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    keys: RwLock<HashMap<String, ApiKey>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.get(id.as_str()).cloned())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Option<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        Ok(keys.values().find(|k| k.key_prefix() == prefix).cloned())
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        let id = api_key.id().as_str().to_string();

        if keys.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                id
            )));
        }

        keys.insert(id, api_key.clone());
        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let mut keys = self.keys.write().await;
        let id = api_key.id().as_str().to_string();

        if !keys.contains_key(&id) {
            return Err(DomainError::not_found(format!("API key '{}' not found", id)));
        }

        keys.insert(id, api_key.clone());
        Ok(api_key.clone())
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        let mut keys = self.keys.write().await;
        Ok(keys.remove(id.as_str()).is_some())
    }

    async fn list_by_account(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError> {
        let keys = self.keys.read().await;
        let mut result: Vec<ApiKey> = keys
            .values()
            .filter(|k| k.account_id() == account_id)
            .cloned()
            .collect();
        result.sort_by_key(|k| k.created_at());
        Ok(result)
    }

    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError> {
        let mut keys = self.keys.write().await;

        match keys.get_mut(id.as_str()) {
            Some(key) => {
                key.record_usage();
                Ok(())
            }
            None => Err(DomainError::not_found(format!("API key '{}' not found", id))),
        }
    }
}
