//! Gym Domain Ports
//!
//! Storage operations the gym services need. The PostgreSQL adapter in
//! `infra_db` implements them all on one pool; [`crate::memory::InMemoryGym`]
//! implements them on process memory.
//!
//! Lookups by username return `Ok(None)` when nothing matches; mutations
//! keyed by username return `Ok(false)`/`Ok(None)` so services can raise the
//! right not-found error.

use async_trait::async_trait;
use std::sync::Arc;

use core_kernel::{
    DomainPort, HealthCheckable, PortError, TraineeId, TrainerId, TrainingId, TrainingTypeId,
};
use domain_account::{AccountPort, TokenPort};

use crate::trainee::{NewTraineeRecord, Trainee, TraineeUpdate};
use crate::trainer::{NewTrainerRecord, Trainer, TrainerUpdate};
use crate::training::{NewTrainingRecord, TraineeTrainingQuery, Training, TrainerTrainingQuery};
use crate::training_type::TrainingType;
use crate::workload::WorkloadNotifier;

#[async_trait]
pub trait TraineePort: DomainPort {
    /// Inserts the user and trainee rows atomically
    ///
    /// Returns `PortError::Conflict` when the username is already taken.
    async fn create_trainee(&self, record: NewTraineeRecord) -> Result<Trainee, PortError>;

    async fn find_trainee(&self, username: &str) -> Result<Option<Trainee>, PortError>;

    async fn update_trainee(&self, update: &TraineeUpdate) -> Result<Option<Trainee>, PortError>;

    async fn set_trainee_active(&self, username: &str, is_active: bool) -> Result<bool, PortError>;

    /// Deletes the trainee, its user, trainer links and trainings
    async fn delete_trainee(&self, username: &str) -> Result<bool, PortError>;

    async fn trainers_of(&self, trainee_id: TraineeId) -> Result<Vec<Trainer>, PortError>;

    /// Replaces the trainee's trainer set
    async fn replace_trainers(&self, trainee_id: TraineeId, trainer_ids: &[TrainerId]) -> Result<(), PortError>;
}

#[async_trait]
pub trait TrainerPort: DomainPort {
    async fn create_trainer(&self, record: NewTrainerRecord) -> Result<Trainer, PortError>;

    async fn find_trainer(&self, username: &str) -> Result<Option<Trainer>, PortError>;

    /// Returns the trainers among `usernames` that exist
    async fn find_trainers(&self, usernames: &[String]) -> Result<Vec<Trainer>, PortError>;

    async fn update_trainer(&self, update: &TrainerUpdate) -> Result<Option<Trainer>, PortError>;

    async fn set_trainer_active(&self, username: &str, is_active: bool) -> Result<bool, PortError>;

    async fn trainees_of(&self, trainer_id: TrainerId) -> Result<Vec<Trainee>, PortError>;

    /// Active trainers not yet assigned to the trainee
    async fn unassigned_active_trainers(&self, trainee_id: TraineeId) -> Result<Vec<Trainer>, PortError>;
}

#[async_trait]
pub trait TrainingPort: DomainPort {
    async fn create_training(&self, record: NewTrainingRecord) -> Result<Training, PortError>;

    async fn find_training(&self, id: TrainingId) -> Result<Option<Training>, PortError>;

    async fn delete_training(&self, id: TrainingId) -> Result<bool, PortError>;

    async fn trainee_trainings(&self, query: &TraineeTrainingQuery) -> Result<Vec<Training>, PortError>;

    async fn trainer_trainings(&self, query: &TrainerTrainingQuery) -> Result<Vec<Training>, PortError>;
}

#[async_trait]
pub trait TrainingTypePort: DomainPort {
    async fn list_training_types(&self) -> Result<Vec<TrainingType>, PortError>;

    async fn find_training_type(&self, id: TrainingTypeId) -> Result<Option<TrainingType>, PortError>;
}

/// Every port the application services are wired with
#[derive(Clone)]
pub struct GymPorts {
    pub accounts: Arc<dyn AccountPort>,
    pub tokens: Arc<dyn TokenPort>,
    pub trainees: Arc<dyn TraineePort>,
    pub trainers: Arc<dyn TrainerPort>,
    pub trainings: Arc<dyn TrainingPort>,
    pub training_types: Arc<dyn TrainingTypePort>,
    pub workload: Arc<dyn WorkloadNotifier>,
    /// Health of the backing store
    pub store_health: Arc<dyn HealthCheckable>,
}

impl GymPorts {
    /// Wires every storage port to one adapter
    pub fn from_store<S>(store: Arc<S>, workload: Arc<dyn WorkloadNotifier>) -> Self
    where
        S: AccountPort
            + TokenPort
            + TraineePort
            + TrainerPort
            + TrainingPort
            + TrainingTypePort
            + HealthCheckable,
    {
        Self {
            accounts: store.clone(),
            tokens: store.clone(),
            trainees: store.clone(),
            trainers: store.clone(),
            trainings: store.clone(),
            training_types: store.clone(),
            workload,
            store_health: store,
        }
    }
}
