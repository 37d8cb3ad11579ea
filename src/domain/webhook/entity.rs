//! Webhook domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::account::AccountId;
use crate::domain::event::EventType;

/// Unique identifier for a webhook subscription
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WebhookId(String);

impl WebhookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WebhookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WebhookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WebhookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A subscriber endpoint registered to receive event notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSubscription {
    /// Unique identifier
    pub id: WebhookId,
    /// Account that owns this subscription
    pub account_id: AccountId,
    /// Display name
    pub name: String,
    /// Target URL, must be absolute http(s)
    pub url: String,
    /// Event types to be notified about
    pub events: Vec<EventType>,
    /// Secret for HMAC signature verification
    pub secret: Option<String>,
    /// Custom headers included in every delivery
    pub headers: HashMap<String, String>,
    /// Whether the subscription receives deliveries
    pub active: bool,
    /// When the subscription was created
    pub created_at: DateTime<Utc>,
    /// When the subscription was last updated
    pub updated_at: DateTime<Utc>,
}

impl WebhookSubscription {
    /// Creates a new active subscription
    pub fn new(
        id: impl Into<WebhookId>,
        account_id: AccountId,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            account_id,
            name: name.into(),
            url: url.into(),
            events: Vec::new(),
            secret: None,
            headers: HashMap::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the secret for HMAC signatures
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Adds an event type to subscribe to
    pub fn with_event(mut self, event: EventType) -> Self {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
        self
    }

    /// Sets the full event list
    pub fn with_events(mut self, events: Vec<EventType>) -> Self {
        self.events = events;
        self
    }

    /// Adds a custom header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Checks if the subscription wants a given event type
    pub fn is_subscribed_to(&self, event: EventType) -> bool {
        self.events.contains(&event)
    }

    /// A subscription only receives deliveries while active
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Append-only record of a single delivery attempt
///
/// Exactly one attempt is logged per matching subscription each time an
/// event is published, whatever the outcome. A status code of zero means
/// the request never produced an HTTP response (timeout or transport
/// failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    /// Unique identifier
    pub id: String,
    /// Subscription the delivery targeted
    pub subscription_id: WebhookId,
    /// Event type that was delivered
    pub event_type: EventType,
    /// HTTP status code received, 0 when no response arrived
    pub status_code: u16,
    /// Whether the endpoint answered with a 2xx status
    pub success: bool,
    /// When the attempt finished
    pub delivered_at: DateTime<Utc>,
}

impl DeliveryAttempt {
    /// Records an attempt that received an HTTP response
    pub fn responded(subscription_id: WebhookId, event_type: EventType, status_code: u16) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subscription_id,
            event_type,
            status_code,
            success: (200..300).contains(&status_code),
            delivered_at: Utc::now(),
        }
    }

    /// Records an attempt that timed out or never connected
    pub fn unreachable(subscription_id: WebhookId, event_type: EventType) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subscription_id,
            event_type,
            status_code: 0,
            success: false,
            delivered_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AccountId {
        AccountId::new("acct-1").unwrap()
    }

    #[test]
    fn test_subscription_creation() {
        let sub = WebhookSubscription::new("hook-1", account(), "My Hook", "https://example.com/h");

        assert_eq!(sub.id.as_str(), "hook-1");
        assert_eq!(sub.url, "https://example.com/h");
        assert!(sub.is_active());
        assert!(sub.events.is_empty());
    }

    #[test]
    fn test_subscription_event_matching() {
        let sub = WebhookSubscription::new("hook-1", account(), "My Hook", "https://example.com/h")
            .with_event(EventType::GenerationCompleted)
            .with_event(EventType::KeyRemoved);

        assert!(sub.is_subscribed_to(EventType::GenerationCompleted));
        assert!(sub.is_subscribed_to(EventType::KeyRemoved));
        assert!(!sub.is_subscribed_to(EventType::SystemError));
    }

    #[test]
    fn test_subscription_with_event_deduplicates() {
        let sub = WebhookSubscription::new("hook-1", account(), "My Hook", "https://example.com/h")
            .with_event(EventType::Custom)
            .with_event(EventType::Custom);

        assert_eq!(sub.events.len(), 1);
    }

    #[test]
    fn test_attempt_success_classification() {
        let ok = DeliveryAttempt::responded("hook-1".into(), EventType::Custom, 204);
        assert!(ok.success);

        let client_err = DeliveryAttempt::responded("hook-1".into(), EventType::Custom, 404);
        assert!(!client_err.success);
        assert_eq!(client_err.status_code, 404);
    }

    #[test]
    fn test_attempt_unreachable_has_zero_status() {
        let attempt = DeliveryAttempt::unreachable("hook-1".into(), EventType::GenerationFailed);
        assert_eq!(attempt.status_code, 0);
        assert!(!attempt.success);
    }
}
