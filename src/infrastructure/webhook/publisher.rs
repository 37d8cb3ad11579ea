//! Event publication and delivery fan-out
//!
//! Publishing never blocks the caller: `publish` hands the event to a
//! spawned dispatch task and returns. Dispatch spawns one delivery worker
//! per matching active subscription and waits for all of them to settle;
//! a slow or failing endpoint only affects its own attempt. Exactly one
//! `DeliveryAttempt` is appended per target, whatever the outcome.

use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::event::DomainEvent;
use crate::domain::webhook::{
    DeliveryAttempt, DeliveryLog, WebhookRepository, WebhookSubscription,
};
use crate::domain::DomainError;

use super::signature;

const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fans events out to subscribed webhook endpoints
#[derive(Clone)]
pub struct EventPublisher {
    webhook_repo: Arc<dyn WebhookRepository>,
    delivery_log: Arc<dyn DeliveryLog>,
    http_client: Client,
    delivery_timeout: Duration,
    default_secret: Option<String>,
}

impl EventPublisher {
    pub fn new(webhook_repo: Arc<dyn WebhookRepository>, delivery_log: Arc<dyn DeliveryLog>) -> Self {
        Self {
            webhook_repo,
            delivery_log,
            http_client: Client::new(),
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            default_secret: None,
        }
    }

    /// Set the per-delivery timeout
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Secret used to sign deliveries for subscriptions without their own
    pub fn with_default_secret(mut self, secret: impl Into<String>) -> Self {
        self.default_secret = Some(secret.into());
        self
    }

    /// Publish an event without waiting for deliveries.
    ///
    /// Failures are logged, never surfaced; event notification must not
    /// affect the operation that produced the event.
    pub fn publish(&self, event: DomainEvent) {
        let publisher = self.clone();
        tokio::spawn(async move {
            if let Err(e) = publisher.dispatch(event).await {
                warn!(error = %e, "Event dispatch failed");
            }
        });
    }

    /// Deliver an event to every matching active subscription and wait for
    /// all attempts to settle
    pub async fn dispatch(&self, event: DomainEvent) -> Result<Vec<DeliveryAttempt>, DomainError> {
        let subscriptions = self
            .webhook_repo
            .find_active_by_event(event.event_type)
            .await?;

        if subscriptions.is_empty() {
            debug!(event_type = %event.event_type, "No subscriptions for event");
            return Ok(vec![]);
        }

        // Serialized once; every delivery signs and sends these exact bytes
        let payload = serde_json::to_string(&event)
            .map_err(|e| DomainError::internal(format!("Failed to serialize event: {}", e)))?;

        let handles: Vec<_> = subscriptions
            .into_iter()
            .map(|subscription| {
                let worker = self.clone();
                let event = event.clone();
                let payload = payload.clone();
                tokio::spawn(async move { worker.deliver(subscription, event, payload).await })
            })
            .collect();

        let mut attempts = Vec::new();
        for result in join_all(handles).await {
            match result {
                Ok(attempt) => attempts.push(attempt),
                Err(e) => warn!(error = %e, "Delivery worker panicked"),
            }
        }

        info!(
            event_type = %event.event_type,
            deliveries = attempts.len(),
            succeeded = attempts.iter().filter(|a| a.success).count(),
            "Event dispatched"
        );

        Ok(attempts)
    }

    /// Deliver to a single subscription and log the attempt
    async fn deliver(
        &self,
        subscription: WebhookSubscription,
        event: DomainEvent,
        payload: String,
    ) -> DeliveryAttempt {
        let mut request = self
            .http_client
            .post(&subscription.url)
            .timeout(self.delivery_timeout)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Event", event.event_type.as_str())
            .header("X-Webhook-Timestamp", event.timestamp.to_rfc3339());

        let secret = subscription.secret.as_ref().or(self.default_secret.as_ref());
        if let Some(secret) = secret {
            request = request.header(
                signature::SIGNATURE_HEADER,
                signature::sign(secret, payload.as_bytes()),
            );
        }

        for (key, value) in &subscription.headers {
            request = request.header(key, value);
        }

        let attempt = match request.body(payload).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let attempt = DeliveryAttempt::responded(
                    subscription.id.clone(),
                    event.event_type,
                    status,
                );

                if attempt.success {
                    info!(
                        subscription_id = %subscription.id,
                        status = status,
                        "Webhook delivery succeeded"
                    );
                } else {
                    warn!(
                        subscription_id = %subscription.id,
                        status = status,
                        "Webhook endpoint answered with an error"
                    );
                }

                attempt
            }
            Err(e) => {
                warn!(
                    subscription_id = %subscription.id,
                    error = %e,
                    "Webhook delivery did not reach the endpoint"
                );
                DeliveryAttempt::unreachable(subscription.id.clone(), event.event_type)
            }
        };

        if let Err(e) = self.delivery_log.append(attempt.clone()).await {
            warn!(
                subscription_id = %subscription.id,
                error = %e,
                "Failed to log delivery attempt"
            );
        }

        attempt
    }
}
