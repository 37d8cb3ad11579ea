//! Generation history

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::Provider;
use crate::domain::account::AccountId;
use crate::domain::api_key::ApiKeyId;
use crate::domain::DomainError;

/// Record of a successful generation, kept per account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    pub account_id: AccountId,
    pub api_key_id: ApiKeyId,
    pub prompt: String,
    pub provider: Provider,
    pub image_url: String,
    pub generation_time_ms: u64,
    pub cost_micros: u64,
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    pub fn new(
        account_id: AccountId,
        api_key_id: ApiKeyId,
        prompt: impl Into<String>,
        provider: Provider,
        image_url: impl Into<String>,
        generation_time_ms: u64,
        cost_micros: u64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id,
            api_key_id,
            prompt: prompt.into(),
            provider,
            image_url: image_url.into(),
            generation_time_ms,
            cost_micros,
            created_at: Utc::now(),
        }
    }
}

/// Repository for generation history
#[async_trait]
pub trait GenerationHistoryRepository: Send + Sync + Debug {
    /// Append a record
    async fn append(&self, record: GenerationRecord) -> Result<(), DomainError>;

    /// List an account's records, newest first
    async fn list_by_account(
        &self,
        account_id: &AccountId,
        limit: usize,
    ) -> Result<Vec<GenerationRecord>, DomainError>;
}
