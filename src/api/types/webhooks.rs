//! Webhook endpoint request and response types
//!
//! Subscription secrets go in but never come back out; responses only
//! carry a `hasSecret` flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::event::EventType;
use crate::domain::webhook::{DeliveryAttempt, WebhookSubscription};

fn default_active() -> bool {
    true
}

/// Request body for `PUT /v1/webhooks`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    pub name: String,
    pub url: String,
    pub events: Vec<EventType>,
    pub secret: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Request body for `PATCH /v1/webhooks?id=...`; absent fields keep
/// their current value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub events: Option<Vec<EventType>>,
    pub secret: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub active: Option<bool>,
}

/// Query parameter selecting a subscription
#[derive(Debug, Deserialize)]
pub struct WebhookIdQuery {
    pub id: String,
}

/// Subscription as returned to API clients
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub id: String,
    pub name: String,
    pub url: String,
    pub events: Vec<EventType>,
    pub has_secret: bool,
    pub headers: HashMap<String, String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WebhookSubscription> for WebhookResponse {
    fn from(subscription: WebhookSubscription) -> Self {
        Self {
            id: subscription.id.as_str().to_string(),
            name: subscription.name,
            url: subscription.url,
            events: subscription.events,
            has_secret: subscription.secret.is_some(),
            headers: subscription.headers,
            active: subscription.active,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

/// One delivery attempt from the append-only log
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAttemptResponse {
    pub id: String,
    pub event_type: EventType,
    pub status_code: u16,
    pub success: bool,
    pub delivered_at: DateTime<Utc>,
}

impl From<DeliveryAttempt> for DeliveryAttemptResponse {
    fn from(attempt: DeliveryAttempt) -> Self {
        Self {
            id: attempt.id,
            event_type: attempt.event_type,
            status_code: attempt.status_code,
            success: attempt.success,
            delivered_at: attempt.delivered_at,
        }
    }
}
