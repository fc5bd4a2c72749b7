//! Trainer workload notifications
//!
//! Every scheduled or cancelled training is reported to the trainer-workload
//! service so it can keep monthly hour summaries per trainer. Delivery is best
//! effort: the gym records stay authoritative and a failed notification never
//! rolls back the training change.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::trainer::Trainer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkloadAction {
    Add,
    Delete,
}

/// Payload posted to the workload service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadEvent {
    pub trainer_username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub training_date: NaiveDate,
    pub training_duration: i32,
    pub action_type: WorkloadAction,
}

impl WorkloadEvent {
    pub fn new(trainer: &Trainer, training_date: NaiveDate, training_duration: i32, action: WorkloadAction) -> Self {
        Self {
            trainer_username: trainer.user.username.clone(),
            first_name: trainer.user.first_name.clone(),
            last_name: trainer.user.last_name.clone(),
            is_active: trainer.user.is_active,
            training_date,
            training_duration,
            action_type: action,
        }
    }
}

#[async_trait]
pub trait WorkloadNotifier: DomainPort + HealthCheckable {
    /// Delivers one event, forwarding the caller's `Authorization` header value
    async fn notify(&self, event: &WorkloadEvent, authorization: Option<&str>) -> Result<(), PortError>;
}

/// Used when no workload service is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWorkloadNotifier;

impl DomainPort for NoopWorkloadNotifier {}

#[async_trait]
impl HealthCheckable for NoopWorkloadNotifier {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("workload-noop", AdapterHealth::Healthy, 0)
            .with_message("Workload notifications disabled")
    }
}

#[async_trait]
impl WorkloadNotifier for NoopWorkloadNotifier {
    async fn notify(&self, event: &WorkloadEvent, _authorization: Option<&str>) -> Result<(), PortError> {
        debug!(
            trainer = %event.trainer_username,
            action = ?event.action_type,
            "Workload service not configured, event skipped"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_uses_camel_case_and_uppercase_action() {
        let event = WorkloadEvent {
            trainer_username: "Mia.Stone".to_string(),
            first_name: "Mia".to_string(),
            last_name: "Stone".to_string(),
            is_active: true,
            training_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            training_duration: 60,
            action_type: WorkloadAction::Delete,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["trainerUsername"], "Mia.Stone");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["trainingDate"], "2024-03-10");
        assert_eq!(json["trainingDuration"], 60);
        assert_eq!(json["actionType"], "DELETE");
    }
}
