//! Gym validation rules
//!
//! # Rules
//!
//! ## Registration and profile updates
//! - First and last name are required
//! - Date of birth, when given, must lie in the past
//! - Updates and status changes name the username they apply to
//!
//! ## Trainings
//! - Trainee and trainer usernames are required
//! - Training name is required and duration must be positive
//!
//! ## Training queries
//! - The owning username is required
//! - Optional filters, when supplied, must not be blank

use chrono::{NaiveDate, Utc};

use crate::error::GymError;
use crate::trainee::{NewTrainee, TraineeUpdate};
use crate::trainer::{NewTrainer, TrainerUpdate};
use crate::training::{NewTraining, TraineeTrainingQuery, TrainerTrainingQuery};

/// Result of a validation pass
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.is_valid {
            self.is_valid = false;
        }
        self.errors.extend(other.errors);
    }

    /// Converts into a domain error if any rule failed
    pub fn into_result(self) -> Result<(), GymError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(GymError::validation_failed(self.errors))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub struct GymValidator;

impl GymValidator {
    pub fn validate_names(first_name: &str, last_name: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if is_blank(first_name) {
            result.add_error("First name is required.");
        }
        if is_blank(last_name) {
            result.add_error("Last name is required.");
        }
        result
    }

    fn validate_date_of_birth(date_of_birth: Option<NaiveDate>) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if let Some(dob) = date_of_birth {
            if dob >= Utc::now().date_naive() {
                result.add_error("Date of birth must be in the past.");
            }
        }
        result
    }

    fn require_username(username: &str, message: &str) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if is_blank(username) {
            result.add_error(message);
        }
        result
    }

    pub fn validate_new_trainee(trainee: &NewTrainee) -> ValidationResult {
        let mut result = Self::validate_names(&trainee.first_name, &trainee.last_name);
        result.merge(Self::validate_date_of_birth(trainee.date_of_birth));
        result
    }

    pub fn validate_new_trainer(trainer: &NewTrainer) -> ValidationResult {
        Self::validate_names(&trainer.first_name, &trainer.last_name)
    }

    pub fn validate_trainee_update(update: &TraineeUpdate) -> ValidationResult {
        let mut result = Self::require_username(&update.username, "Trainee username is required.");
        result.merge(Self::validate_names(&update.first_name, &update.last_name));
        result.merge(Self::validate_date_of_birth(update.date_of_birth));
        result
    }

    pub fn validate_trainer_update(update: &TrainerUpdate) -> ValidationResult {
        let mut result = Self::require_username(&update.username, "Trainer username is required.");
        result.merge(Self::validate_names(&update.first_name, &update.last_name));
        result
    }

    pub fn validate_trainee_username(username: &str) -> ValidationResult {
        Self::require_username(username, "Trainee username is required.")
    }

    pub fn validate_trainer_username(username: &str) -> ValidationResult {
        Self::require_username(username, "Trainer username is required.")
    }

    pub fn validate_new_training(training: &NewTraining) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if is_blank(&training.trainee_username) {
            result.add_error("Trainee username is required.");
        }
        if is_blank(&training.trainer_username) {
            result.add_error("Trainer username is required.");
        }
        if is_blank(&training.name) {
            result.add_error("Training name is required.");
        }
        if training.duration <= 0 {
            result.add_error("Training duration must be positive.");
        }
        result
    }

    pub fn validate_trainee_query(query: &TraineeTrainingQuery) -> ValidationResult {
        let mut result = Self::require_username(
            &query.trainee_username,
            "Trainee username is required for fetching training list.",
        );
        if query.trainer_username.as_deref().is_some_and(is_blank) {
            result.add_error("Trainer name cannot be empty if provided.");
        }
        if query.training_type.as_deref().is_some_and(is_blank) {
            result.add_error("Training type cannot be empty if provided.");
        }
        result
    }

    pub fn validate_trainer_query(query: &TrainerTrainingQuery) -> ValidationResult {
        let mut result = Self::require_username(
            &query.trainer_username,
            "Trainer username is required for fetching training list.",
        );
        if query.trainee_username.as_deref().is_some_and(is_blank) {
            result.add_error("Trainee name cannot be empty if provided.");
        }
        result
    }

    pub fn validate_trainer_assignment(trainee_username: &str, trainer_usernames: &[String]) -> ValidationResult {
        let mut result = Self::validate_trainee_username(trainee_username);
        if trainer_usernames.iter().any(|name| is_blank(name)) {
            result.add_error("Trainer usernames must not be blank.");
        }
        result
    }
}
