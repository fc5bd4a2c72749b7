//! Authentication counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct AuthMetrics {
    login_success: AtomicU64,
    login_failure: AtomicU64,
    password_change: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub login_success_total: u64,
    pub login_failure_total: u64,
    pub password_change_total: u64,
}

impl AuthMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_login_success(&self) {
        self.login_success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_login_failure(&self) {
        self.login_failure.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_password_change(&self) {
        self.password_change.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            login_success_total: self.login_success.load(Ordering::Relaxed),
            login_failure_total: self.login_failure.load(Ordering::Relaxed),
            password_change_total: self.password_change.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_counter_names() {
        let metrics = AuthMetrics::new();
        metrics.record_login_failure();
        metrics.record_login_failure();
        metrics.record_password_change();

        let json = serde_json::to_value(metrics.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "login_success_total": 0,
                "login_failure_total": 2,
                "password_change_total": 1
            })
        );
    }
}
