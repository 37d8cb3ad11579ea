//! Generation infrastructure

pub mod http_engine;
pub mod in_memory;

pub use http_engine::HttpGenerationEngine;
pub use in_memory::InMemoryGenerationHistory;
