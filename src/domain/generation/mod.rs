//! Image generation domain
//!
//! Request/result types, the engine trait the gateway dispatches to,
//! and the per-account generation history.

pub mod engine;
mod history;
mod request;

pub use engine::GenerationEngine;
pub use history::{GenerationHistoryRepository, GenerationRecord};
pub use request::{GenerationRequest, GenerationResult, Provider};
