//! Infrastructure layer - Concrete implementations of domain traits

pub mod api_key;
pub mod credentials;
pub mod generation;
pub mod logging;
pub mod webhook;
