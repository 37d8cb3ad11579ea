//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId};
use crate::domain::account::AccountId;
use crate::domain::DomainError;

/// Repository trait for API key storage
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Get an API key by its key prefix (for lookup during authentication)
    async fn get_by_prefix(&self, prefix: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// List the keys belonging to an account
    async fn list_by_account(&self, account_id: &AccountId) -> Result<Vec<ApiKey>, DomainError>;

    /// Record usage of an API key (usage counter + last used timestamp)
    async fn record_usage(&self, id: &ApiKeyId) -> Result<(), DomainError>;
}
