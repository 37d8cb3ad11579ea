//! Webhook infrastructure: registry service, event publisher, payload
//! signing and in-memory stores

pub mod in_memory;
pub mod publisher;
pub mod service;
pub mod signature;

pub use in_memory::{InMemoryDeliveryLog, InMemoryWebhookRepository};
pub use publisher::EventPublisher;
pub use service::WebhookService;
