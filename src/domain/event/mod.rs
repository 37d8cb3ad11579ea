//! Domain events emitted by the gateway
//!
//! Events are immutable envelopes. They are produced by the dispatcher
//! and the key management service and consumed by the webhook publisher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of events the gateway publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// An image generation finished successfully
    #[serde(rename = "generation.completed")]
    GenerationCompleted,
    /// An image generation failed at the provider
    #[serde(rename = "generation.failed")]
    GenerationFailed,
    /// A new API key was issued
    #[serde(rename = "key.created")]
    KeyCreated,
    /// An API key's scopes or limits changed
    #[serde(rename = "key.updated")]
    KeyUpdated,
    /// An API key was revoked or deleted
    #[serde(rename = "key.removed")]
    KeyRemoved,
    /// A system level error occurred
    #[serde(rename = "system.error")]
    SystemError,
    /// Scheduled maintenance notification
    #[serde(rename = "system.maintenance")]
    SystemMaintenance,
    /// Application defined event
    #[serde(rename = "custom")]
    Custom,
}

impl EventType {
    /// Returns all known event types
    pub fn all() -> Vec<Self> {
        vec![
            Self::GenerationCompleted,
            Self::GenerationFailed,
            Self::KeyCreated,
            Self::KeyUpdated,
            Self::KeyRemoved,
            Self::SystemError,
            Self::SystemMaintenance,
            Self::Custom,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerationCompleted => "generation.completed",
            Self::GenerationFailed => "generation.failed",
            Self::KeyCreated => "key.created",
            Self::KeyUpdated => "key.updated",
            Self::KeyRemoved => "key.removed",
            Self::SystemError => "system.error",
            Self::SystemMaintenance => "system.maintenance",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event envelope delivered to webhook subscribers
///
/// Constructed once, never mutated. The serialized form of this struct
/// is the exact payload that gets signed and delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID
    pub id: String,
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Event-specific data
    pub data: serde_json::Value,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// Component that produced the event
    pub source: String,
}

impl DomainEvent {
    /// Creates a new event with a fresh ID and the current timestamp
    pub fn new(event_type: EventType, data: serde_json::Value, source: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event_type,
            data,
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serde_uses_dotted_names() {
        let json = serde_json::to_string(&EventType::GenerationCompleted).unwrap();
        assert_eq!(json, "\"generation.completed\"");

        let parsed: EventType = serde_json::from_str("\"key.removed\"").unwrap();
        assert_eq!(parsed, EventType::KeyRemoved);
    }

    #[test]
    fn test_event_type_all() {
        assert_eq!(EventType::all().len(), 8);
    }

    #[test]
    fn test_event_creation() {
        let event = DomainEvent::new(
            EventType::GenerationCompleted,
            serde_json::json!({"generation_id": "gen-1"}),
            "gateway",
        );

        assert_eq!(event.event_type, EventType::GenerationCompleted);
        assert_eq!(event.source, "gateway");
        assert!(!event.id.is_empty());
    }

    #[test]
    fn test_event_payload_shape() {
        let event = DomainEvent::new(EventType::Custom, serde_json::json!({"k": "v"}), "test");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "custom");
        assert_eq!(value["data"]["k"], "v");
        assert!(value["timestamp"].is_string());
    }
}
