//! Rate limiting seam
//!
//! The dispatcher depends only on this trait, so a shared-store limiter
//! can replace the in-process one without touching the admission path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Debug;

/// Outcome of a rate limit admission check
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitDecision {
    /// Whether the request was admitted
    pub allowed: bool,
    /// Requests left in the current window after this decision
    pub remaining: u32,
    /// The limit applied
    pub limit: u32,
    /// When the current window resets
    pub resets_at: DateTime<Utc>,
}

/// Admission control for authenticated requests
#[async_trait]
pub trait RateLimiter: Send + Sync + Debug {
    /// Atomically check and consume one slot for a key.
    ///
    /// When the window has capacity the counter is incremented and the
    /// decision is allowed; at capacity nothing is consumed and the
    /// decision carries the window reset time.
    async fn admit(&self, key_id: &str, limit: u32) -> RateLimitDecision;

    /// Drop any window state held for a key
    async fn reset(&self, key_id: &str);
}
