//! Gym use cases
//!
//! Services validate input, resolve usernames through the ports and translate
//! missing rows into the matching not-found error. Registration generates the
//! username and password; the plain password leaves the service exactly once,
//! in the returned [`Credentials`].

use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{PortError, TrainingId, TrainingTypeId};
use domain_account::{
    base_username, next_available_username, AccountPort, CredentialsPolicy, NewUser,
    PasswordHasher, Role,
};

use crate::error::GymError;
use crate::ports::GymPorts;
use crate::trainee::{NewTrainee, NewTraineeRecord, Trainee, TraineeProfile, TraineeUpdate};
use crate::trainer::{NewTrainer, NewTrainerRecord, Trainer, TrainerProfile, TrainerUpdate};
use crate::training::{
    NewTraining, NewTrainingRecord, TraineeTrainingQuery, Training, TrainerTrainingQuery,
};
use crate::training_type::TrainingType;
use crate::validation::GymValidator;
use crate::workload::{WorkloadAction, WorkloadEvent};

/// Attempts made when a generated username collides with a concurrent registration
pub const REGISTRATION_ATTEMPTS: usize = 3;

/// Username and plain password handed back after registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Produces the user row for a new trainee or trainer
#[derive(Clone)]
pub struct CredentialsFactory {
    accounts: Arc<dyn AccountPort>,
    policy: CredentialsPolicy,
    hasher: PasswordHasher,
}

impl CredentialsFactory {
    pub fn new(accounts: Arc<dyn AccountPort>, policy: CredentialsPolicy, hasher: PasswordHasher) -> Self {
        Self {
            accounts,
            policy,
            hasher,
        }
    }

    /// Returns `First.Last` or the first free serial variant of it
    pub async fn unique_username(&self, first_name: &str, last_name: &str) -> Result<String, GymError> {
        let base = base_username(first_name, last_name);
        let taken = self.accounts.usernames_starting_with(&base).await?;
        Ok(next_available_username(&base, &taken))
    }

    pub async fn new_user(
        &self,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> Result<(NewUser, Credentials), GymError> {
        let username = self.unique_username(first_name, last_name).await?;
        let password = self.policy.random_password();
        let password_hash = self.hasher.hash(&password).await?;

        let user = NewUser {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            username: username.clone(),
            password_hash,
            role,
        };
        Ok((user, Credentials { username, password }))
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct TraineeService {
    ports: GymPorts,
    credentials: CredentialsFactory,
}

impl TraineeService {
    pub fn new(ports: GymPorts, credentials: CredentialsFactory) -> Self {
        Self { ports, credentials }
    }

    #[instrument(skip_all, fields(first_name = %input.first_name, last_name = %input.last_name))]
    pub async fn register(&self, input: NewTrainee) -> Result<(Trainee, Credentials), GymError> {
        GymValidator::validate_new_trainee(&input).into_result()?;

        let mut attempt = 1;
        loop {
            let (user, credentials) = self
                .credentials
                .new_user(&input.first_name, &input.last_name, Role::Trainee)
                .await?;
            let record = NewTraineeRecord {
                user,
                date_of_birth: input.date_of_birth,
                address: trimmed(input.address.clone()),
            };

            match self.ports.trainees.create_trainee(record).await {
                Ok(trainee) => {
                    info!(username = %trainee.username(), "Trainee registered");
                    return Ok((trainee, credentials));
                }
                Err(e) if e.is_conflict() && attempt < REGISTRATION_ATTEMPTS => {
                    warn!(username = %credentials.username, attempt, "Username taken concurrently, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn require(&self, username: &str) -> Result<Trainee, GymError> {
        GymValidator::validate_trainee_username(username).into_result()?;
        self.ports
            .trainees
            .find_trainee(username)
            .await?
            .ok_or_else(|| GymError::trainee_not_found(username))
    }

    async fn profile_of(&self, trainee: Trainee) -> Result<TraineeProfile, GymError> {
        let trainers = self.ports.trainees.trainers_of(trainee.id).await?;
        Ok(TraineeProfile { trainee, trainers })
    }

    pub async fn profile(&self, username: &str) -> Result<TraineeProfile, GymError> {
        let trainee = self.require(username).await?;
        self.profile_of(trainee).await
    }

    #[instrument(skip_all, fields(username = %update.username))]
    pub async fn update(&self, update: TraineeUpdate) -> Result<TraineeProfile, GymError> {
        GymValidator::validate_trainee_update(&update).into_result()?;
        let update = TraineeUpdate {
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
            address: trimmed(update.address),
            ..update
        };

        let trainee = self
            .ports
            .trainees
            .update_trainee(&update)
            .await?
            .ok_or_else(|| GymError::trainee_not_found(&update.username))?;
        info!("Trainee profile updated");
        self.profile_of(trainee).await
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, username: &str, is_active: bool) -> Result<(), GymError> {
        GymValidator::validate_trainee_username(username).into_result()?;
        if !self.ports.trainees.set_trainee_active(username, is_active).await? {
            return Err(GymError::trainee_not_found(username));
        }
        info!("Trainee status changed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, username: &str) -> Result<(), GymError> {
        GymValidator::validate_trainee_username(username).into_result()?;
        if !self.ports.trainees.delete_trainee(username).await? {
            return Err(GymError::trainee_not_found(username));
        }
        info!("Trainee deleted");
        Ok(())
    }

    pub async fn unassigned_trainers(&self, username: &str) -> Result<Vec<Trainer>, GymError> {
        let trainee = self.require(username).await?;
        Ok(self.ports.trainers.unassigned_active_trainers(trainee.id).await?)
    }

    /// Replaces the trainee's trainers and returns the new list
    #[instrument(skip(self))]
    pub async fn replace_trainers(
        &self,
        username: &str,
        trainer_usernames: &[String],
    ) -> Result<Vec<Trainer>, GymError> {
        GymValidator::validate_trainer_assignment(username, trainer_usernames).into_result()?;
        let trainee = self.require(username).await?;

        let trainers = self.ports.trainers.find_trainers(trainer_usernames).await?;
        let missing: Vec<&str> = trainer_usernames
            .iter()
            .map(String::as_str)
            .filter(|name| !trainers.iter().any(|t| t.username() == *name))
            .collect();
        if !missing.is_empty() {
            return Err(GymError::trainer_not_found(missing.join(", ")));
        }

        let mut ids: Vec<_> = trainers.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        self.ports.trainees.replace_trainers(trainee.id, &ids).await?;
        info!(count = ids.len(), "Trainee trainers replaced");

        Ok(self.ports.trainees.trainers_of(trainee.id).await?)
    }
}

pub struct TrainerService {
    ports: GymPorts,
    credentials: CredentialsFactory,
}

impl TrainerService {
    pub fn new(ports: GymPorts, credentials: CredentialsFactory) -> Self {
        Self { ports, credentials }
    }

    #[instrument(skip_all, fields(first_name = %input.first_name, last_name = %input.last_name))]
    pub async fn register(&self, input: NewTrainer) -> Result<(Trainer, Credentials), GymError> {
        GymValidator::validate_new_trainer(&input).into_result()?;
        self.require_training_type(input.specialization_id).await?;

        let mut attempt = 1;
        loop {
            let (user, credentials) = self
                .credentials
                .new_user(&input.first_name, &input.last_name, Role::Trainer)
                .await?;
            let record = NewTrainerRecord {
                user,
                specialization_id: input.specialization_id,
            };

            match self.ports.trainers.create_trainer(record).await {
                Ok(trainer) => {
                    info!(username = %trainer.username(), "Trainer registered");
                    return Ok((trainer, credentials));
                }
                Err(e) if e.is_conflict() && attempt < REGISTRATION_ATTEMPTS => {
                    warn!(username = %credentials.username, attempt, "Username taken concurrently, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn require_training_type(&self, id: TrainingTypeId) -> Result<TrainingType, GymError> {
        self.ports
            .training_types
            .find_training_type(id)
            .await?
            .ok_or_else(|| GymError::TrainingTypeNotFound(id.to_string()))
    }

    async fn require(&self, username: &str) -> Result<Trainer, GymError> {
        GymValidator::validate_trainer_username(username).into_result()?;
        self.ports
            .trainers
            .find_trainer(username)
            .await?
            .ok_or_else(|| GymError::trainer_not_found(username))
    }

    async fn profile_of(&self, trainer: Trainer) -> Result<TrainerProfile, GymError> {
        let trainees = self.ports.trainers.trainees_of(trainer.id).await?;
        Ok(TrainerProfile { trainer, trainees })
    }

    pub async fn profile(&self, username: &str) -> Result<TrainerProfile, GymError> {
        let trainer = self.require(username).await?;
        self.profile_of(trainer).await
    }

    #[instrument(skip_all, fields(username = %update.username))]
    pub async fn update(&self, update: TrainerUpdate) -> Result<TrainerProfile, GymError> {
        GymValidator::validate_trainer_update(&update).into_result()?;
        let update = TrainerUpdate {
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
            ..update
        };

        let trainer = self
            .ports
            .trainers
            .update_trainer(&update)
            .await?
            .ok_or_else(|| GymError::trainer_not_found(&update.username))?;
        info!("Trainer profile updated");
        self.profile_of(trainer).await
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, username: &str, is_active: bool) -> Result<(), GymError> {
        GymValidator::validate_trainer_username(username).into_result()?;
        if !self.ports.trainers.set_trainer_active(username, is_active).await? {
            return Err(GymError::trainer_not_found(username));
        }
        info!("Trainer status changed");
        Ok(())
    }
}

pub struct TrainingService {
    ports: GymPorts,
}

impl TrainingService {
    pub fn new(ports: GymPorts) -> Self {
        Self { ports }
    }

    /// Schedules a training and reports it to the workload service
    ///
    /// `authorization` is the caller's raw `Authorization` header, forwarded
    /// with the workload event.
    #[instrument(skip(self, input, authorization), fields(trainee = %input.trainee_username, trainer = %input.trainer_username))]
    pub async fn add(&self, input: NewTraining, authorization: Option<&str>) -> Result<Training, GymError> {
        GymValidator::validate_new_training(&input).into_result()?;

        let trainee = self
            .ports
            .trainees
            .find_trainee(&input.trainee_username)
            .await?
            .ok_or_else(|| GymError::trainee_not_found(&input.trainee_username))?;
        let trainer = self
            .ports
            .trainers
            .find_trainer(&input.trainer_username)
            .await?
            .ok_or_else(|| GymError::trainer_not_found(&input.trainer_username))?;

        let training = self
            .ports
            .trainings
            .create_training(NewTrainingRecord {
                trainee_id: trainee.id,
                trainer_id: trainer.id,
                name: input.name.trim().to_string(),
                training_type_id: trainer.specialization.id,
                date: input.date,
                duration: input.duration,
            })
            .await?;
        info!(training_id = %training.id, "Training added");

        let event = WorkloadEvent::new(&trainer, training.date, training.duration, WorkloadAction::Add);
        self.notify(&event, authorization).await;
        Ok(training)
    }

    #[instrument(skip(self, authorization))]
    pub async fn delete(&self, id: TrainingId, authorization: Option<&str>) -> Result<(), GymError> {
        let training = self
            .ports
            .trainings
            .find_training(id)
            .await?
            .ok_or_else(|| GymError::TrainingNotFound(id.to_string()))?;

        if !self.ports.trainings.delete_training(id).await? {
            return Err(GymError::TrainingNotFound(id.to_string()));
        }
        info!("Training deleted");

        if let Some(trainer) = self.ports.trainers.find_trainer(&training.trainer.username).await? {
            let event = WorkloadEvent::new(&trainer, training.date, training.duration, WorkloadAction::Delete);
            self.notify(&event, authorization).await;
        }
        Ok(())
    }

    async fn notify(&self, event: &WorkloadEvent, authorization: Option<&str>) {
        if let Err(e) = self.ports.workload.notify(event, authorization).await {
            log_notification_failure(event, &e);
        }
    }

    pub async fn trainee_trainings(&self, query: &TraineeTrainingQuery) -> Result<Vec<Training>, GymError> {
        GymValidator::validate_trainee_query(query).into_result()?;
        if self.ports.trainees.find_trainee(&query.trainee_username).await?.is_none() {
            return Err(GymError::trainee_not_found(&query.trainee_username));
        }

        let trainings = self.ports.trainings.trainee_trainings(query).await?;
        if trainings.is_empty() {
            return Err(GymError::NoTrainingsFound);
        }
        Ok(trainings)
    }

    pub async fn trainer_trainings(&self, query: &TrainerTrainingQuery) -> Result<Vec<Training>, GymError> {
        GymValidator::validate_trainer_query(query).into_result()?;
        if self.ports.trainers.find_trainer(&query.trainer_username).await?.is_none() {
            return Err(GymError::trainer_not_found(&query.trainer_username));
        }

        let trainings = self.ports.trainings.trainer_trainings(query).await?;
        if trainings.is_empty() {
            return Err(GymError::NoTrainingsFound);
        }
        Ok(trainings)
    }
}

fn log_notification_failure(event: &WorkloadEvent, error: &PortError) {
    warn!(
        trainer = %event.trainer_username,
        action = ?event.action_type,
        error = %error,
        "Workload notification failed, training change kept"
    );
}

pub struct TrainingTypeService {
    ports: GymPorts,
}

impl TrainingTypeService {
    pub fn new(ports: GymPorts) -> Self {
        Self { ports }
    }

    pub async fn list(&self) -> Result<Vec<TrainingType>, GymError> {
        Ok(self.ports.training_types.list_training_types().await?)
    }
}
