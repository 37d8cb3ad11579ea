//! API Key domain
//!
//! Domain types and traits for the gateway's API keys: the key entity
//! with its scope set and per-minute rate limit, identifier validation,
//! and the repository trait the store implements.

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{ApiKey, ApiKeyId, Scope};
pub use repository::ApiKeyRepository;
pub use validation::{validate_api_key_id, ApiKeyValidationError};
