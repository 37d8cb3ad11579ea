//! Fixed window rate limiter
//!
//! One counter per key, reset every window. The whole admit path runs
//! under a single write lock so check-and-increment is atomic: two
//! concurrent requests can never both take the last slot.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::rate_limit::{RateLimitDecision, RateLimiter};

const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// In-process fixed window rate limiter
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    windows: RwLock<HashMap<String, Window>>,
    window_duration: Duration,
}

impl FixedWindowRateLimiter {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Create a limiter with a custom window length
    pub fn with_window(window_duration: Duration) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            window_duration,
        }
    }
}

impl Default for FixedWindowRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn admit(&self, key_id: &str, limit: u32) -> RateLimitDecision {
        let mut windows = self.windows.write().await;
        let now = Instant::now();

        let window = windows.entry(key_id.to_string()).or_insert(Window {
            count: 0,
            started_at: now,
        });

        // Expired windows reset before evaluation
        if now.duration_since(window.started_at) >= self.window_duration {
            window.count = 0;
            window.started_at = now;
        }

        let elapsed = now.duration_since(window.started_at);
        let resets_in = self.window_duration.saturating_sub(elapsed);
        let resets_at = Utc::now()
            + chrono::Duration::from_std(resets_in).unwrap_or_else(|_| chrono::Duration::zero());

        if window.count >= limit {
            debug!(key_id = %key_id, limit = limit, "Rate limit exceeded");
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit,
                resets_at,
            };
        }

        window.count += 1;

        RateLimitDecision {
            allowed: true,
            remaining: limit - window.count,
            limit,
            resets_at,
        }
    }

    async fn reset(&self, key_id: &str) {
        self.windows.write().await.remove(key_id);
    }
}
