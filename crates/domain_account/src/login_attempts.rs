//! Brute-force protection for the login endpoint
//!
//! Failed logins are counted per client key (the caller's address). Reaching
//! the limit blocks the key for a fixed window; the entry is discarded once
//! the window has passed, so the count starts over.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BLOCK_DURATION_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, Default)]
struct AttemptState {
    failures: u32,
    blocked_until: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct LoginAttemptTracker {
    max_attempts: u32,
    block_duration: Duration,
    attempts: RwLock<HashMap<String, AttemptState>>,
}

impl LoginAttemptTracker {
    pub fn new(max_attempts: u32, block_duration: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            block_duration,
            attempts: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn is_blocked(&self, key: &str) -> bool {
        self.is_blocked_at(key, Utc::now()).await
    }

    pub async fn is_blocked_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut attempts = self.attempts.write().await;
        match attempts.get(key).and_then(|state| state.blocked_until) {
            Some(until) if now < until => true,
            Some(_) => {
                attempts.remove(key);
                false
            }
            None => false,
        }
    }

    /// Records a failed login and returns the failure count for the key
    pub async fn register_failure(&self, key: &str) -> u32 {
        self.register_failure_at(key, Utc::now()).await
    }

    pub async fn register_failure_at(&self, key: &str, now: DateTime<Utc>) -> u32 {
        let mut attempts = self.attempts.write().await;
        let state = attempts.entry(key.to_string()).or_default();
        state.failures += 1;
        if state.failures >= self.max_attempts && state.blocked_until.is_none() {
            state.blocked_until = Some(now + self.block_duration);
            warn!(client = %key, failures = state.failures, "Client blocked after repeated login failures");
        }
        state.failures
    }

    pub async fn reset(&self, key: &str) {
        self.attempts.write().await.remove(key);
    }

    pub async fn failures(&self, key: &str) -> u32 {
        self.attempts
            .read()
            .await
            .get(key)
            .map_or(0, |state| state.failures)
    }
}

impl Default for LoginAttemptTracker {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::seconds(DEFAULT_BLOCK_DURATION_SECS),
        )
    }
}
