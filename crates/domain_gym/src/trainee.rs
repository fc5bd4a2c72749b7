//! Trainees

use chrono::NaiveDate;
use core_kernel::TraineeId;
use domain_account::{NewUser, User};

use crate::trainer::Trainer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trainee {
    pub id: TraineeId,
    pub user: User,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl Trainee {
    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn is_active(&self) -> bool {
        self.user.is_active
    }
}

/// Registration input
#[derive(Debug, Clone, Default)]
pub struct NewTrainee {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// Profile update; the username itself never changes
#[derive(Debug, Clone)]
pub struct TraineeUpdate {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub is_active: bool,
}

/// Row set persisted on registration
#[derive(Debug, Clone)]
pub struct NewTraineeRecord {
    pub user: NewUser,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// A trainee together with the trainers assigned to them
#[derive(Debug, Clone)]
pub struct TraineeProfile {
    pub trainee: Trainee,
    pub trainers: Vec<Trainer>,
}
