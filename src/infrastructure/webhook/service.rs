//! Webhook subscription registry
//!
//! Account-scoped CRUD over subscriptions. A subscription belonging to a
//! different account is indistinguishable from a missing one.

use std::sync::Arc;
use tracing::info;

use crate::domain::account::AccountId;
use crate::domain::webhook::{
    DeliveryAttempt, DeliveryLog, WebhookId, WebhookRepository, WebhookSubscription,
};
use crate::domain::DomainError;

/// Registry service over the subscription store and delivery log
pub struct WebhookService {
    repository: Arc<dyn WebhookRepository>,
    delivery_log: Arc<dyn DeliveryLog>,
}

impl WebhookService {
    pub fn new(repository: Arc<dyn WebhookRepository>, delivery_log: Arc<dyn DeliveryLog>) -> Self {
        Self {
            repository,
            delivery_log,
        }
    }

    /// Register a new subscription
    pub async fn create(
        &self,
        subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, DomainError> {
        validate_subscription(&subscription)?;

        let created = self.repository.create(subscription).await?;
        info!(
            subscription_id = %created.id,
            account_id = %created.account_id,
            events = created.events.len(),
            "Webhook subscription created"
        );
        Ok(created)
    }

    /// Fetch a subscription owned by the account
    pub async fn get(
        &self,
        account_id: &AccountId,
        id: &WebhookId,
    ) -> Result<WebhookSubscription, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|s| &s.account_id == account_id)
            .ok_or_else(|| DomainError::not_found(format!("Webhook '{}' not found", id)))
    }

    /// List the account's subscriptions
    pub async fn list(&self, account_id: &AccountId) -> Result<Vec<WebhookSubscription>, DomainError> {
        self.repository.list_by_account(account_id).await
    }

    /// Update a subscription owned by the account
    pub async fn update(
        &self,
        account_id: &AccountId,
        mut subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, DomainError> {
        let existing = self.get(account_id, &subscription.id).await?;

        // Ownership and creation time never change
        subscription.account_id = existing.account_id;
        subscription.created_at = existing.created_at;
        subscription.touch();

        validate_subscription(&subscription)?;

        let updated = self.repository.update(subscription).await?;
        info!(subscription_id = %updated.id, "Webhook subscription updated");
        Ok(updated)
    }

    /// Delete a subscription owned by the account
    pub async fn delete(&self, account_id: &AccountId, id: &WebhookId) -> Result<(), DomainError> {
        self.get(account_id, id).await?;
        self.repository.delete(id).await?;
        info!(subscription_id = %id, "Webhook subscription deleted");
        Ok(())
    }

    /// List delivery attempts made against a subscription the account owns
    pub async fn deliveries(
        &self,
        account_id: &AccountId,
        id: &WebhookId,
        limit: usize,
    ) -> Result<Vec<DeliveryAttempt>, DomainError> {
        self.get(account_id, id).await?;
        self.delivery_log.list_by_subscription(id, limit).await
    }
}

fn validate_subscription(subscription: &WebhookSubscription) -> Result<(), DomainError> {
    if subscription.name.trim().is_empty() {
        return Err(DomainError::validation("Name is required"));
    }

    let url = reqwest::Url::parse(&subscription.url)
        .map_err(|_| DomainError::validation("URL must be a valid absolute URL"))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(DomainError::validation(
            "URL must use the http or https scheme",
        ));
    }

    if subscription.events.is_empty() {
        return Err(DomainError::validation(
            "At least one event must be subscribed",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventType;
    use crate::infrastructure::webhook::{InMemoryDeliveryLog, InMemoryWebhookRepository};

    fn service() -> WebhookService {
        WebhookService::new(
            Arc::new(InMemoryWebhookRepository::new()),
            Arc::new(InMemoryDeliveryLog::new()),
        )
    }

    fn account(id: &str) -> AccountId {
        AccountId::new(id).unwrap()
    }

    fn subscription(id: &str, account_id: &str) -> WebhookSubscription {
        WebhookSubscription::new(
            id,
            account(account_id),
            format!("Hook {}", id),
            "https://example.com/hook",
        )
        .with_event(EventType::GenerationCompleted)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        service.create(subscription("hook-1", "acct-1")).await.unwrap();

        let found = service.get(&account("acct-1"), &"hook-1".into()).await.unwrap();
        assert_eq!(found.name, "Hook hook-1");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_url() {
        let service = service();

        let mut sub = subscription("hook-1", "acct-1");
        sub.url = "not-a-url".to_string();
        assert!(matches!(
            service.create(sub).await,
            Err(DomainError::Validation { .. })
        ));

        let mut sub = subscription("hook-2", "acct-1");
        sub.url = "ftp://example.com/hook".to_string();
        assert!(matches!(
            service.create(sub).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_events() {
        let service = service();

        let mut sub = subscription("hook-1", "acct-1");
        sub.events.clear();
        assert!(matches!(
            service.create(sub).await,
            Err(DomainError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_other_account_sees_not_found() {
        let service = service();
        service.create(subscription("hook-1", "acct-1")).await.unwrap();

        let result = service.get(&account("acct-2"), &"hook-1".into()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let result = service.delete(&account("acct-2"), &"hook-1".into()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_preserves_ownership() {
        let service = service();
        service.create(subscription("hook-1", "acct-1")).await.unwrap();

        let mut updated = service
            .get(&account("acct-1"), &"hook-1".into())
            .await
            .unwrap();
        updated.name = "Renamed".to_string();
        updated.account_id = account("acct-2");

        let saved = service.update(&account("acct-1"), updated).await.unwrap();
        assert_eq!(saved.name, "Renamed");
        assert_eq!(saved.account_id, account("acct-1"));
    }

    #[tokio::test]
    async fn test_delete_removes_subscription() {
        let service = service();
        service.create(subscription("hook-1", "acct-1")).await.unwrap();

        service.delete(&account("acct-1"), &"hook-1".into()).await.unwrap();

        let result = service.get(&account("acct-1"), &"hook-1".into()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_deliveries_requires_ownership() {
        let service = service();
        service.create(subscription("hook-1", "acct-1")).await.unwrap();

        let result = service
            .deliveries(&account("acct-2"), &"hook-1".into(), 10)
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));

        let attempts = service
            .deliveries(&account("acct-1"), &"hook-1".into(), 10)
            .await
            .unwrap();
        assert!(attempts.is_empty());
    }
}
