//! Circuit breaker for outbound integrations
//!
//! After `failure_threshold` consecutive failures the circuit opens and calls
//! are refused until `reset_timeout_secs` has elapsed. The next call is then let
//! through (half-open); `success_threshold` successes close the circuit again,
//! while another failure re-opens it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::CircuitBreakerConfig;

/// Observable circuit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    failure_count: AtomicU64,
    success_count: AtomicU64,
    is_open: AtomicBool,
    opened_at: RwLock<Option<Instant>>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            failure_count: AtomicU64::new(0),
            success_count: AtomicU64::new(0),
            is_open: AtomicBool::new(false),
            opened_at: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    pub async fn state(&self) -> CircuitState {
        if !self.is_open.load(Ordering::Relaxed) {
            return CircuitState::Closed;
        }

        let opened_at = self.opened_at.read().await;
        match *opened_at {
            Some(time) if time.elapsed() >= Duration::from_secs(self.config.reset_timeout_secs) => {
                CircuitState::HalfOpen
            }
            _ => CircuitState::Open,
        }
    }

    /// Returns true if a call may be attempted
    pub async fn is_available(&self) -> bool {
        self.state().await != CircuitState::Open
    }

    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Relaxed);
        if !self.is_open.load(Ordering::Relaxed) {
            return;
        }

        let successes = self.success_count.fetch_add(1, Ordering::Relaxed) + 1;
        if successes >= u64::from(self.config.success_threshold) {
            self.is_open.store(false, Ordering::Relaxed);
            self.success_count.store(0, Ordering::Relaxed);
        }
    }

    pub async fn record_failure(&self) {
        self.success_count.store(0, Ordering::Relaxed);
        let failures = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        if failures >= u64::from(self.config.failure_threshold) {
            self.is_open.store(true, Ordering::Relaxed);
            *self.opened_at.write().await = Some(Instant::now());
        }
    }
}
