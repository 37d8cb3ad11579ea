//! In-memory generation history

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::account::AccountId;
use crate::domain::generation::{GenerationHistoryRepository, GenerationRecord};
use crate::domain::DomainError;

/// Vec-backed history, suitable for a single gateway instance
#[derive(Debug, Default)]
pub struct InMemoryGenerationHistory {
    records: RwLock<Vec<GenerationRecord>>,
}

impl InMemoryGenerationHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenerationHistoryRepository for InMemoryGenerationHistory {
    async fn append(&self, record: GenerationRecord) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        records.push(record);
        Ok(())
    }

    async fn list_by_account(
        &self,
        account_id: &AccountId,
        limit: usize,
    ) -> Result<Vec<GenerationRecord>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(records
            .iter()
            .rev()
            .filter(|r| &r.account_id == account_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::ApiKeyId;
    use crate::domain::generation::Provider;

    fn record(account: &str, prompt: &str) -> GenerationRecord {
        GenerationRecord::new(
            AccountId::new(account).unwrap(),
            ApiKeyId::new("key-1").unwrap(),
            prompt,
            Provider::OpenAi,
            "https://images.example.com/x.png",
            1000,
            4000,
        )
    }

    #[tokio::test]
    async fn test_append_and_list_newest_first() {
        let history = InMemoryGenerationHistory::new();

        history.append(record("acct-1", "first")).await.unwrap();
        history.append(record("acct-1", "second")).await.unwrap();
        history.append(record("acct-2", "other")).await.unwrap();

        let account = AccountId::new("acct-1").unwrap();
        let records = history.list_by_account(&account, 10).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prompt, "second");
    }

    #[tokio::test]
    async fn test_limit_is_applied() {
        let history = InMemoryGenerationHistory::new();
        for i in 0..5 {
            history
                .append(record("acct-1", &format!("p{}", i)))
                .await
                .unwrap();
        }

        let account = AccountId::new("acct-1").unwrap();
        let records = history.list_by_account(&account, 3).await.unwrap();
        assert_eq!(records.len(), 3);
    }
}
