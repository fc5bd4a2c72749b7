//! Trainee DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_gym::{NewTrainee, Trainee, TraineeProfile, TraineeUpdate};

use super::trainer::TrainerSummary;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TraineeRegistrationRequest {
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl From<TraineeRegistrationRequest> for NewTrainee {
    fn from(request: TraineeRegistrationRequest) -> Self {
        NewTrainee {
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            address: request.address,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTraineeRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "First name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required."))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_active: bool,
}

impl From<UpdateTraineeRequest> for TraineeUpdate {
    fn from(request: UpdateTraineeRequest) -> Self {
        TraineeUpdate {
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            date_of_birth: request.date_of_birth,
            address: request.address,
            is_active: request.is_active,
        }
    }
}

/// Replaces the trainee's trainer list; an empty list clears it
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainersRequest {
    #[validate(length(min = 1, message = "Trainee username is required."))]
    pub trainee_username: String,
    #[serde(default)]
    pub trainer_usernames: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraineeSummary {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Trainee> for TraineeSummary {
    fn from(trainee: &Trainee) -> Self {
        Self {
            username: trainee.user.username.clone(),
            first_name: trainee.user.first_name.clone(),
            last_name: trainee.user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraineeProfileResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_active: bool,
    pub trainers: Vec<TrainerSummary>,
}

impl From<TraineeProfile> for TraineeProfileResponse {
    fn from(profile: TraineeProfile) -> Self {
        let TraineeProfile { trainee, trainers } = profile;
        Self {
            trainers: trainers.iter().map(TrainerSummary::from).collect(),
            is_active: trainee.is_active(),
            username: trainee.user.username,
            first_name: trainee.user.first_name,
            last_name: trainee.user.last_name,
            date_of_birth: trainee.date_of_birth,
            address: trainee.address,
        }
    }
}
