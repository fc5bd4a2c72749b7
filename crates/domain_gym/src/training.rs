//! Trainings and training queries

use chrono::NaiveDate;
use core_kernel::{Period, TraineeId, TrainerId, TrainingId, TrainingTypeId};

use crate::training_type::TrainingType;

/// Name and username of a training participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Training {
    pub id: TrainingId,
    pub trainee: Participant,
    pub trainer: Participant,
    pub name: String,
    pub training_type: TrainingType,
    pub date: NaiveDate,
    /// Minutes
    pub duration: i32,
}

/// Input for scheduling a training
#[derive(Debug, Clone)]
pub struct NewTraining {
    pub trainee_username: String,
    pub trainer_username: String,
    pub name: String,
    pub date: NaiveDate,
    pub duration: i32,
}

#[derive(Debug, Clone)]
pub struct NewTrainingRecord {
    pub trainee_id: TraineeId,
    pub trainer_id: TrainerId,
    pub name: String,
    pub training_type_id: TrainingTypeId,
    pub date: NaiveDate,
    pub duration: i32,
}

/// Trainings of one trainee, optionally narrowed by period, trainer and type
#[derive(Debug, Clone, Default)]
pub struct TraineeTrainingQuery {
    pub trainee_username: String,
    pub period: Period,
    pub trainer_username: Option<String>,
    pub training_type: Option<String>,
}

impl TraineeTrainingQuery {
    pub fn matches(&self, training: &Training) -> bool {
        training.trainee.username == self.trainee_username
            && self.period.contains(training.date)
            && self
                .trainer_username
                .as_deref()
                .map_or(true, |name| training.trainer.username == name)
            && self
                .training_type
                .as_deref()
                .map_or(true, |name| training.training_type.matches_name(name))
    }
}

/// Trainings of one trainer, optionally narrowed by period and trainee
#[derive(Debug, Clone, Default)]
pub struct TrainerTrainingQuery {
    pub trainer_username: String,
    pub period: Period,
    pub trainee_username: Option<String>,
}

impl TrainerTrainingQuery {
    pub fn matches(&self, training: &Training) -> bool {
        training.trainer.username == self.trainer_username
            && self.period.contains(training.date)
            && self
                .trainee_username
                .as_deref()
                .map_or(true, |name| training.trainee.username == name)
    }
}
