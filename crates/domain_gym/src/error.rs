//! Gym domain errors

use core_kernel::{PortError, TemporalError};
use domain_account::AccountError;
use thiserror::Error;

/// Errors that can occur in the gym domain
#[derive(Debug, Error)]
pub enum GymError {
    #[error("Trainee not found: {0}")]
    TraineeNotFound(String),

    #[error("Trainer not found: {0}")]
    TrainerNotFound(String),

    #[error("Training not found: {0}")]
    TrainingNotFound(String),

    #[error("Training type not found: {0}")]
    TrainingTypeNotFound(String),

    #[error("No trainings found for the specified criteria.")]
    NoTrainingsFound,

    #[error("{0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl GymError {
    pub fn validation(message: impl Into<String>) -> Self {
        GymError::Validation(message.into())
    }

    /// Creates a Validation error from a list of rule violations
    pub fn validation_failed(errors: Vec<String>) -> Self {
        GymError::Validation(errors.join(" "))
    }

    pub fn trainee_not_found(username: impl Into<String>) -> Self {
        GymError::TraineeNotFound(username.into())
    }

    pub fn trainer_not_found(username: impl Into<String>) -> Self {
        GymError::TrainerNotFound(username.into())
    }

    /// Returns true for any of the missing-entity variants
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GymError::TraineeNotFound(_)
                | GymError::TrainerNotFound(_)
                | GymError::TrainingNotFound(_)
                | GymError::TrainingTypeNotFound(_)
                | GymError::NoTrainingsFound
        )
    }
}
