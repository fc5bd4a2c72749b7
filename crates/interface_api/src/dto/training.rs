//! Training DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{Period, TemporalError};
use domain_gym::{NewTraining, TraineeTrainingQuery, TrainerTrainingQuery, Training, TrainingType};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTrainingRequest {
    #[validate(length(min = 1, message = "Trainee username is required."))]
    pub trainee_username: String,
    #[validate(length(min = 1, message = "Trainer username is required."))]
    pub trainer_username: String,
    #[validate(length(min = 1, message = "Training name is required."))]
    pub training_name: String,
    pub training_date: NaiveDate,
    #[validate(range(min = 1, message = "Training duration must be positive."))]
    pub training_duration: i32,
}

impl From<AddTrainingRequest> for NewTraining {
    fn from(request: AddTrainingRequest) -> Self {
        NewTraining {
            trainee_username: request.trainee_username,
            trainer_username: request.trainer_username,
            name: request.training_name,
            date: request.training_date,
            duration: request.training_duration,
        }
    }
}

/// Query string of `GET /training/trainee`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraineeTrainingsParams {
    pub trainee_name: Option<String>,
    pub period_from: Option<String>,
    pub period_to: Option<String>,
    pub trainer_name: Option<String>,
    pub training_type: Option<String>,
}

impl TryFrom<TraineeTrainingsParams> for TraineeTrainingQuery {
    type Error = TemporalError;

    fn try_from(params: TraineeTrainingsParams) -> Result<Self, Self::Error> {
        Ok(TraineeTrainingQuery {
            period: Period::parse(params.period_from.as_deref(), params.period_to.as_deref())?,
            trainee_username: params.trainee_name.unwrap_or_default(),
            trainer_username: params.trainer_name,
            training_type: params.training_type,
        })
    }
}

/// Query string of `GET /training/trainer`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerTrainingsParams {
    pub trainer_name: Option<String>,
    pub period_from: Option<String>,
    pub period_to: Option<String>,
    pub trainee_name: Option<String>,
}

impl TryFrom<TrainerTrainingsParams> for TrainerTrainingQuery {
    type Error = TemporalError;

    fn try_from(params: TrainerTrainingsParams) -> Result<Self, Self::Error> {
        Ok(TrainerTrainingQuery {
            period: Period::parse(params.period_from.as_deref(), params.period_to.as_deref())?,
            trainer_username: params.trainer_name.unwrap_or_default(),
            trainee_username: params.trainee_name,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResponse {
    pub id: i64,
    pub training_name: String,
    pub training_date: NaiveDate,
    pub training_type: String,
    pub training_duration: i32,
    pub trainee_username: String,
    pub trainer_username: String,
}

impl From<Training> for TrainingResponse {
    fn from(training: Training) -> Self {
        Self {
            id: training.id.value(),
            training_name: training.name,
            training_date: training.date,
            training_type: training.training_type.name,
            training_duration: training.duration,
            trainee_username: training.trainee.username,
            trainer_username: training.trainer.username,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingCreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingTypeResponse {
    pub training_type_id: i64,
    pub training_type: String,
}

impl From<TrainingType> for TrainingTypeResponse {
    fn from(training_type: TrainingType) -> Self {
        Self {
            training_type_id: training_type.id.value(),
            training_type: training_type.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainee_params_parse_period() {
        let params = TraineeTrainingsParams {
            trainee_name: Some("Anna.Lee".to_string()),
            period_from: Some("2024-01-01".to_string()),
            period_to: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        let query = TraineeTrainingQuery::try_from(params).unwrap();
        assert_eq!(query.trainee_username, "Anna.Lee");
        assert_eq!(query.period.from(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(query.period.to(), NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_reversed_period_rejected() {
        let params = TrainerTrainingsParams {
            trainer_name: Some("Mia.Stone".to_string()),
            period_from: Some("2024-02-01".to_string()),
            period_to: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            TrainerTrainingQuery::try_from(params),
            Err(TemporalError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let params = TrainerTrainingsParams {
            trainer_name: Some("Mia.Stone".to_string()),
            period_from: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            TrainerTrainingQuery::try_from(params),
            Err(TemporalError::InvalidDate { .. })
        ));
    }
}
