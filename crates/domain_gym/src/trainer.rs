//! Trainers

use core_kernel::{TrainerId, TrainingTypeId};
use domain_account::{NewUser, User};

use crate::trainee::Trainee;
use crate::training_type::TrainingType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainer {
    pub id: TrainerId,
    pub user: User,
    pub specialization: TrainingType,
}

impl Trainer {
    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn is_active(&self) -> bool {
        self.user.is_active
    }
}

/// Registration input
#[derive(Debug, Clone)]
pub struct NewTrainer {
    pub first_name: String,
    pub last_name: String,
    pub specialization_id: TrainingTypeId,
}

/// Profile update; username and specialization are fixed at registration
#[derive(Debug, Clone)]
pub struct TrainerUpdate {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewTrainerRecord {
    pub user: NewUser,
    pub specialization_id: TrainingTypeId,
}

/// A trainer together with the trainees assigned to them
#[derive(Debug, Clone)]
pub struct TrainerProfile {
    pub trainer: Trainer,
    pub trainees: Vec<Trainee>,
}
