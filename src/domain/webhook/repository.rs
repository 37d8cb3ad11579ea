//! Webhook repository traits

use super::{DeliveryAttempt, WebhookId, WebhookSubscription};
use crate::domain::account::AccountId;
use crate::domain::error::DomainError;
use crate::domain::event::EventType;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Repository for webhook subscription persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebhookRepository: Send + Sync {
    /// Creates a new subscription
    async fn create(
        &self,
        subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, DomainError>;

    /// Updates an existing subscription
    async fn update(
        &self,
        subscription: WebhookSubscription,
    ) -> Result<WebhookSubscription, DomainError>;

    /// Deletes a subscription by ID
    async fn delete(&self, id: &WebhookId) -> Result<(), DomainError>;

    /// Finds a subscription by ID
    async fn find_by_id(&self, id: &WebhookId) -> Result<Option<WebhookSubscription>, DomainError>;

    /// Lists subscriptions belonging to an account
    async fn list_by_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<WebhookSubscription>, DomainError>;

    /// Finds active subscriptions for an event type, across all accounts
    async fn find_active_by_event(
        &self,
        event: EventType,
    ) -> Result<Vec<WebhookSubscription>, DomainError>;
}

/// Append-only log of delivery attempts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    /// Appends a delivery attempt
    async fn append(&self, attempt: DeliveryAttempt) -> Result<(), DomainError>;

    /// Lists attempts made against a subscription, newest first
    async fn list_by_subscription(
        &self,
        subscription_id: &WebhookId,
        limit: usize,
    ) -> Result<Vec<DeliveryAttempt>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_webhook_repository() {
        let mut mock = MockWebhookRepository::new();

        mock.expect_find_active_by_event()
            .returning(|_| Ok(vec![]));

        let result = mock.find_active_by_event(EventType::Custom).await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_delivery_log() {
        let mut mock = MockDeliveryLog::new();

        mock.expect_append().returning(|_| Ok(()));

        let attempt = DeliveryAttempt::responded("hook-1".into(), EventType::Custom, 200);
        assert!(mock.append(attempt).await.is_ok());
    }
}
