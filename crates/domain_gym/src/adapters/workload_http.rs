//! Trainer workload service client
//!
//! Posts [`WorkloadEvent`]s as JSON to `{base_url}/update`. Calls go through a
//! circuit breaker; while it is open events are refused locally with
//! `PortError::ServiceUnavailable` and the caller logs them.
//!
//! # Error Handling
//!
//! - 400/422 -> `PortError::Validation`
//! - 401/403 -> `PortError::Unauthorized`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`
//! - Connect failures -> `PortError::Connection`

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, CircuitBreaker, CircuitBreakerConfig, CircuitState, DomainPort,
    HealthCheckResult, HealthCheckable, PortError,
};

use crate::workload::{WorkloadEvent, WorkloadNotifier};

const SERVICE_NAME: &str = "trainer-workload";

/// Configuration for the workload client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadClientConfig {
    /// Base URL of the workload API, without the `/update` suffix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub circuit_breaker: CircuitBreakerConfig,
}

impl Default for WorkloadClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 5,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct HttpWorkloadNotifier {
    config: WorkloadClientConfig,
    client: Client,
    circuit_breaker: CircuitBreaker,
}

impl HttpWorkloadNotifier {
    pub fn new(config: WorkloadClientConfig) -> Result<Self, PortError> {
        if config.base_url.trim().is_empty() {
            return Err(PortError::validation_field(
                "workload service URL must not be empty",
                "base_url",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortError::Internal {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        let circuit_breaker = CircuitBreaker::new(config.circuit_breaker.clone());

        Ok(Self {
            config,
            client,
            circuit_breaker,
        })
    }

    pub fn update_url(&self) -> String {
        format!("{}/update", self.config.base_url.trim_end_matches('/'))
    }

    pub async fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state().await
    }

    async fn send(&self, event: &WorkloadEvent, authorization: Option<&str>) -> Result<(), PortError> {
        let mut request = self.client.post(self.update_url()).json(event);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;
        map_status(response.status())
    }

    fn map_transport_error(&self, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: "notify_workload".to_string(),
                duration_ms: self.config.timeout_secs * 1000,
            }
        } else if error.is_connect() {
            PortError::Connection {
                message: format!("cannot reach {}", SERVICE_NAME),
                source: Some(Box::new(error)),
            }
        } else {
            PortError::Internal {
                message: "workload request failed".to_string(),
                source: Some(Box::new(error)),
            }
        }
    }
}

fn map_status(status: StatusCode) -> Result<(), PortError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            PortError::validation(format!("workload service rejected event ({})", status))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized {
            message: format!("workload service refused credentials ({})", status),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: SERVICE_NAME.to_string(),
        },
        s => PortError::internal(format!("unexpected workload response {}", s)),
    })
}

impl DomainPort for HttpWorkloadNotifier {}

#[async_trait]
impl HealthCheckable for HttpWorkloadNotifier {
    async fn health_check(&self) -> HealthCheckResult {
        let (status, message) = match self.circuit_breaker.state().await {
            CircuitState::Closed => (AdapterHealth::Healthy, "Circuit closed"),
            CircuitState::HalfOpen => (AdapterHealth::Degraded, "Circuit half-open"),
            CircuitState::Open => (AdapterHealth::Unhealthy, "Circuit breaker is open"),
        };
        HealthCheckResult::new(SERVICE_NAME, status, 0).with_message(message)
    }
}

#[async_trait]
impl WorkloadNotifier for HttpWorkloadNotifier {
    #[instrument(skip_all, fields(trainer = %event.trainer_username, action = ?event.action_type))]
    async fn notify(&self, event: &WorkloadEvent, authorization: Option<&str>) -> Result<(), PortError> {
        if !self.circuit_breaker.is_available().await {
            return Err(PortError::ServiceUnavailable {
                service: format!("{} (circuit open)", SERVICE_NAME),
            });
        }

        let start = Instant::now();
        let result = self.send(event, authorization).await;
        match &result {
            Ok(()) => {
                self.circuit_breaker.record_success();
                debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Workload event delivered");
            }
            Err(e) if e.is_transient() => self.circuit_breaker.record_failure().await,
            Err(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(HttpWorkloadNotifier::new(WorkloadClientConfig::default()).is_err());
    }

    #[test]
    fn test_update_url_joins_once() {
        let notifier = HttpWorkloadNotifier::new(WorkloadClientConfig {
            base_url: "http://localhost:8081/api/v1/workload/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(notifier.update_url(), "http://localhost:8081/api/v1/workload/update");
    }

    #[test]
    fn test_status_mapping() {
        assert!(map_status(StatusCode::OK).is_ok());
        assert!(matches!(map_status(StatusCode::FORBIDDEN), Err(PortError::Unauthorized { .. })));
        assert!(map_status(StatusCode::BAD_GATEWAY).unwrap_err().is_transient());
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST),
            Err(PortError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_opens_circuit() {
        let notifier = HttpWorkloadNotifier::new(WorkloadClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: 1,
                reset_timeout_secs: 60,
                success_threshold: 1,
            },
        })
        .unwrap();
        let event = WorkloadEvent {
            trainer_username: "Mia.Stone".to_string(),
            first_name: "Mia".to_string(),
            last_name: "Stone".to_string(),
            is_active: true,
            training_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            training_duration: 60,
            action_type: crate::workload::WorkloadAction::Add,
        };

        assert!(notifier.notify(&event, None).await.is_err());
        assert_eq!(notifier.circuit_state().await, CircuitState::Open);
        assert!(!notifier.health_check().await.is_healthy());
    }
}
