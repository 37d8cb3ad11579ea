//! In-memory webhook repositories

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::account::AccountId;
use crate::domain::event::EventType;
use crate::domain::webhook::{
    DeliveryAttempt, DeliveryLog, WebhookId, WebhookRepository, WebhookSubscription,
};
use crate::domain::DomainError;

/// In-memory subscription store
#[derive(Debug, Default)]
pub struct InMemoryWebhookRepository {
    subscriptions: RwLock<HashMap<String, WebhookSubscription>>,
}

impl InMemoryWebhookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookRepository for InMemoryWebhookRepository {
    async fn create(
        &self,
        subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, DomainError> {
        let mut subs = self
            .subscriptions
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        let id = subscription.id.as_str().to_string();
        if subs.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Webhook '{}' already exists",
                id
            )));
        }

        subs.insert(id, subscription.clone());
        Ok(subscription)
    }

    async fn update(
        &self,
        subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, DomainError> {
        let mut subs = self
            .subscriptions
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        let id = subscription.id.as_str().to_string();
        if !subs.contains_key(&id) {
            return Err(DomainError::not_found(format!("Webhook '{}' not found", id)));
        }

        subs.insert(id, subscription.clone());
        Ok(subscription)
    }

    async fn delete(&self, id: &WebhookId) -> Result<(), DomainError> {
        let mut subs = self
            .subscriptions
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        subs.remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(format!("Webhook '{}' not found", id)))
    }

    async fn find_by_id(&self, id: &WebhookId) -> Result<Option<WebhookSubscription>, DomainError> {
        let subs = self
            .subscriptions
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(subs.get(id.as_str()).cloned())
    }

    async fn list_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<WebhookSubscription>, DomainError> {
        let subs = self
            .subscriptions
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        let mut result: Vec<WebhookSubscription> = subs
            .values()
            .filter(|s| &s.account_id == account_id)
            .cloned()
            .collect();
        result.sort_by_key(|s| s.created_at);
        Ok(result)
    }

    async fn find_active_by_event(
        &self,
        event: EventType,
    ) -> Result<Vec<WebhookSubscription>, DomainError> {
        let subs = self
            .subscriptions
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(subs
            .values()
            .filter(|s| s.is_active() && s.is_subscribed_to(event))
            .cloned()
            .collect())
    }
}

/// In-memory append-only delivery log
#[derive(Debug, Default)]
pub struct InMemoryDeliveryLog {
    attempts: RwLock<Vec<DeliveryAttempt>>,
}

impl InMemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryLog for InMemoryDeliveryLog {
    async fn append(&self, attempt: DeliveryAttempt) -> Result<(), DomainError> {
        let mut attempts = self
            .attempts
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        attempts.push(attempt);
        Ok(())
    }

    async fn list_by_subscription(
        &self,
        subscription_id: &WebhookId,
        limit: usize,
    ) -> Result<Vec<DeliveryAttempt>, DomainError> {
        let attempts = self
            .attempts
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(attempts
            .iter()
            .rev()
            .filter(|a| &a.subscription_id == subscription_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(id: &str, account: &str, events: Vec<EventType>) -> WebhookSubscription {
        WebhookSubscription::new(
            id,
            AccountId::new(account).unwrap(),
            format!("Hook {}", id),
            "https://example.com/hook",
        )
        .with_events(events)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryWebhookRepository::new();
        let sub = subscription("hook-1", "acct-1", vec![EventType::Custom]);

        repo.create(sub).await.unwrap();

        let found = repo.find_by_id(&"hook-1".into()).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = InMemoryWebhookRepository::new();
        let result = repo.delete(&"missing".into()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_active_by_event_filters_inactive_and_unsubscribed() {
        let repo = InMemoryWebhookRepository::new();

        repo.create(subscription(
            "hook-a",
            "acct-1",
            vec![EventType::GenerationCompleted],
        ))
        .await
        .unwrap();

        repo.create(
            subscription(
                "hook-b",
                "acct-1",
                vec![EventType::GenerationCompleted, EventType::KeyCreated],
            )
            .with_active(false),
        )
        .await
        .unwrap();

        repo.create(subscription("hook-c", "acct-2", vec![EventType::KeyCreated]))
            .await
            .unwrap();

        let matched = repo
            .find_active_by_event(EventType::GenerationCompleted)
            .await
            .unwrap();

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id.as_str(), "hook-a");
    }

    #[tokio::test]
    async fn test_matching_is_repeatable_without_writes() {
        let repo = InMemoryWebhookRepository::new();
        repo.create(subscription("hook-1", "acct-1", vec![EventType::Custom]))
            .await
            .unwrap();

        let first = repo.find_active_by_event(EventType::Custom).await.unwrap();
        let second = repo.find_active_by_event(EventType::Custom).await.unwrap();

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn test_delivery_log_appends_and_lists_newest_first() {
        let log = InMemoryDeliveryLog::new();

        log.append(DeliveryAttempt::responded(
            "hook-1".into(),
            EventType::Custom,
            200,
        ))
        .await
        .unwrap();
        log.append(DeliveryAttempt::unreachable("hook-1".into(), EventType::Custom))
            .await
            .unwrap();
        log.append(DeliveryAttempt::responded(
            "hook-2".into(),
            EventType::Custom,
            500,
        ))
        .await
        .unwrap();

        let attempts = log.list_by_subscription(&"hook-1".into(), 10).await.unwrap();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].status_code, 0);
    }
}
