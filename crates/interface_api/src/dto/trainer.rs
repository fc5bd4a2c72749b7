//! Trainer DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::TrainingTypeId;
use domain_gym::{NewTrainer, Trainer, TrainerProfile, TrainerUpdate};

use super::trainee::TraineeSummary;
use super::training::TrainingTypeResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainerRegistrationRequest {
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    #[validate(range(min = 1, message = "Training type id must be positive."))]
    pub training_type_id: i64,
}

impl From<TrainerRegistrationRequest> for NewTrainer {
    fn from(request: TrainerRegistrationRequest) -> Self {
        NewTrainer {
            first_name: request.first_name,
            last_name: request.last_name,
            specialization_id: TrainingTypeId::new(request.training_type_id),
        }
    }
}

/// Profile update; the specialization cannot be changed
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainerRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    pub is_active: bool,
}

impl From<UpdateTrainerRequest> for TrainerUpdate {
    fn from(request: UpdateTrainerRequest) -> Self {
        TrainerUpdate {
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            is_active: request.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
}

impl From<&Trainer> for TrainerSummary {
    fn from(trainer: &Trainer) -> Self {
        Self {
            username: trainer.user.username.clone(),
            first_name: trainer.user.first_name.clone(),
            last_name: trainer.user.last_name.clone(),
            specialization: trainer.specialization.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerProfileResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: TrainingTypeResponse,
    pub is_active: bool,
    pub trainees: Vec<TraineeSummary>,
}

impl From<TrainerProfile> for TrainerProfileResponse {
    fn from(profile: TrainerProfile) -> Self {
        let TrainerProfile { trainer, trainees } = profile;
        Self {
            trainees: trainees.iter().map(TraineeSummary::from).collect(),
            is_active: trainer.is_active(),
            specialization: trainer.specialization.into(),
            username: trainer.user.username,
            first_name: trainer.user.first_name,
            last_name: trainer.user.last_name,
        }
    }
}
