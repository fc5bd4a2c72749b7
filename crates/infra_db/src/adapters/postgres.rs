//! PostgreSQL Gym Adapter
//!
//! One adapter over one pool serves every storage port, so that the services
//! can be wired with `GymPorts::from_store`.
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - constraint violations -> `PortError::Validation`
//! - connection problems -> `PortError::Connection` / `ServiceUnavailable`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::time::Instant;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, TraineeId, TrainerId,
    TrainingId, TrainingTypeId, UserId,
};
use domain_account::{AccountPort, NewToken, StoredToken, TokenPort, User};
use domain_gym::{
    NewTraineeRecord, NewTrainerRecord, NewTrainingRecord, Trainee, TraineePort, TraineeTrainingQuery,
    TraineeUpdate, Trainer, TrainerPort, TrainerTrainingQuery, TrainerUpdate, Training, TrainingPort,
    TrainingType, TrainingTypePort,
};

use crate::error::DatabaseError;
use crate::repositories::{
    TokenRepository, TraineeRepository, TraineeRow, TrainerRepository, TrainerRow,
    TrainingRepository, TrainingTypeRepository, UserRepository,
};

const ADAPTER_ID: &str = "postgres-gym-adapter";

/// PostgreSQL-backed implementation of every account and gym port
#[derive(Debug, Clone)]
pub struct PostgresGymAdapter {
    pool: PgPool,
    users: UserRepository,
    tokens: TokenRepository,
    trainees: TraineeRepository,
    trainers: TrainerRepository,
    trainings: TrainingRepository,
    training_types: TrainingTypeRepository,
}

impl PostgresGymAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            tokens: TokenRepository::new(pool.clone()),
            trainees: TraineeRepository::new(pool.clone()),
            trainers: TrainerRepository::new(pool.clone()),
            trainings: TrainingRepository::new(pool.clone()),
            training_types: TrainingTypeRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_to_port_error(error: DatabaseError) -> PortError {
    PortError::from(error)
}

fn trainees(rows: Vec<TraineeRow>) -> Result<Vec<Trainee>, PortError> {
    rows.into_iter()
        .map(|row| row.into_trainee().map_err(db_to_port_error))
        .collect()
}

fn trainers(rows: Vec<TrainerRow>) -> Result<Vec<Trainer>, PortError> {
    rows.into_iter()
        .map(|row| row.into_trainer().map_err(db_to_port_error))
        .collect()
}

impl DomainPort for PostgresGymAdapter {}

#[async_trait]
impl HealthCheckable for PostgresGymAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, latency_ms),
            Err(e) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Unhealthy, latency_ms)
                .with_message(format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl AccountPort for PostgresGymAdapter {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
        self.users
            .find_by_username(username)
            .await
            .map_err(db_to_port_error)?
            .map(|row| row.into_user().map_err(db_to_port_error))
            .transpose()
    }

    async fn usernames_starting_with(&self, prefix: &str) -> Result<Vec<String>, PortError> {
        self.users
            .usernames_starting_with(prefix)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<(), PortError> {
        self.users
            .update_password(user_id.value(), password_hash)
            .await
            .map_err(db_to_port_error)
    }
}

#[async_trait]
impl TokenPort for PostgresGymAdapter {
    async fn save_token(&self, token: NewToken) -> Result<StoredToken, PortError> {
        let row = self.tokens.insert(&token).await.map_err(db_to_port_error)?;
        row.into_token().map_err(db_to_port_error)
    }

    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>, PortError> {
        self.tokens
            .find(token)
            .await
            .map_err(db_to_port_error)?
            .map(|row| row.into_token().map_err(db_to_port_error))
            .transpose()
    }

    async fn active_tokens_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredToken>, PortError> {
        self.tokens
            .active_for_user(user_id.value(), now)
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(|row| row.into_token().map_err(db_to_port_error))
            .collect()
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, PortError> {
        self.tokens
            .revoke_all_for_user(user_id.value())
            .await
            .map_err(db_to_port_error)
    }

    async fn purge_inactive_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, PortError> {
        self.tokens
            .delete_inactive_for_user(user_id.value(), now)
            .await
            .map_err(db_to_port_error)
    }
}

#[async_trait]
impl TraineePort for PostgresGymAdapter {
    #[instrument(skip_all, fields(username = %record.user.username))]
    async fn create_trainee(&self, record: NewTraineeRecord) -> Result<Trainee, PortError> {
        let trainee_id = self.trainees.create(&record).await.map_err(db_to_port_error)?;
        debug!(trainee_id, "Trainee rows inserted");

        self.find_trainee(&record.user.username)
            .await?
            .ok_or_else(|| PortError::not_found("Trainee", trainee_id))
    }

    async fn find_trainee(&self, username: &str) -> Result<Option<Trainee>, PortError> {
        self.trainees
            .find_by_username(username)
            .await
            .map_err(db_to_port_error)?
            .map(|row| row.into_trainee().map_err(db_to_port_error))
            .transpose()
    }

    async fn update_trainee(&self, update: &TraineeUpdate) -> Result<Option<Trainee>, PortError> {
        self.trainees
            .update(update)
            .await
            .map_err(db_to_port_error)?
            .map(|row| row.into_trainee().map_err(db_to_port_error))
            .transpose()
    }

    async fn set_trainee_active(&self, username: &str, is_active: bool) -> Result<bool, PortError> {
        self.trainees
            .set_active(username, is_active)
            .await
            .map_err(db_to_port_error)
    }

    async fn delete_trainee(&self, username: &str) -> Result<bool, PortError> {
        self.trainees.delete(username).await.map_err(db_to_port_error)
    }

    async fn trainers_of(&self, trainee_id: TraineeId) -> Result<Vec<Trainer>, PortError> {
        let rows = self
            .trainees
            .trainers_of(trainee_id.value())
            .await
            .map_err(db_to_port_error)?;
        trainers(rows)
    }

    async fn replace_trainers(&self, trainee_id: TraineeId, trainer_ids: &[TrainerId]) -> Result<(), PortError> {
        let ids: Vec<i64> = trainer_ids.iter().map(TrainerId::value).collect();
        self.trainees
            .replace_trainers(trainee_id.value(), &ids)
            .await
            .map_err(db_to_port_error)
    }
}

#[async_trait]
impl TrainerPort for PostgresGymAdapter {
    #[instrument(skip_all, fields(username = %record.user.username))]
    async fn create_trainer(&self, record: NewTrainerRecord) -> Result<Trainer, PortError> {
        let trainer_id = self.trainers.create(&record).await.map_err(db_to_port_error)?;
        debug!(trainer_id, "Trainer rows inserted");

        self.trainers
            .find_by_id(trainer_id)
            .await
            .map_err(db_to_port_error)?
            .ok_or_else(|| PortError::not_found("Trainer", trainer_id))?
            .into_trainer()
            .map_err(db_to_port_error)
    }

    async fn find_trainer(&self, username: &str) -> Result<Option<Trainer>, PortError> {
        self.trainers
            .find_by_username(username)
            .await
            .map_err(db_to_port_error)?
            .map(|row| row.into_trainer().map_err(db_to_port_error))
            .transpose()
    }

    async fn find_trainers(&self, usernames: &[String]) -> Result<Vec<Trainer>, PortError> {
        let rows = self
            .trainers
            .find_by_usernames(usernames)
            .await
            .map_err(db_to_port_error)?;
        trainers(rows)
    }

    async fn update_trainer(&self, update: &TrainerUpdate) -> Result<Option<Trainer>, PortError> {
        self.trainers
            .update(update)
            .await
            .map_err(db_to_port_error)?
            .map(|row| row.into_trainer().map_err(db_to_port_error))
            .transpose()
    }

    async fn set_trainer_active(&self, username: &str, is_active: bool) -> Result<bool, PortError> {
        self.trainers
            .set_active(username, is_active)
            .await
            .map_err(db_to_port_error)
    }

    async fn trainees_of(&self, trainer_id: TrainerId) -> Result<Vec<Trainee>, PortError> {
        let rows = self
            .trainers
            .trainees_of(trainer_id.value())
            .await
            .map_err(db_to_port_error)?;
        trainees(rows)
    }

    async fn unassigned_active_trainers(&self, trainee_id: TraineeId) -> Result<Vec<Trainer>, PortError> {
        let rows = self
            .trainers
            .unassigned_active(trainee_id.value())
            .await
            .map_err(db_to_port_error)?;
        trainers(rows)
    }
}

#[async_trait]
impl TrainingPort for PostgresGymAdapter {
    async fn create_training(&self, record: NewTrainingRecord) -> Result<Training, PortError> {
        let id = self.trainings.create(&record).await.map_err(db_to_port_error)?;
        self.find_training(TrainingId::new(id))
            .await?
            .ok_or_else(|| PortError::not_found("Training", id))
    }

    async fn find_training(&self, id: TrainingId) -> Result<Option<Training>, PortError> {
        let row = self.trainings.find(id.value()).await.map_err(db_to_port_error)?;
        Ok(row.map(Training::from))
    }

    async fn delete_training(&self, id: TrainingId) -> Result<bool, PortError> {
        self.trainings.delete(id.value()).await.map_err(db_to_port_error)
    }

    async fn trainee_trainings(&self, query: &TraineeTrainingQuery) -> Result<Vec<Training>, PortError> {
        let rows = self.trainings.for_trainee(query).await.map_err(db_to_port_error)?;
        Ok(rows.into_iter().map(Training::from).collect())
    }

    async fn trainer_trainings(&self, query: &TrainerTrainingQuery) -> Result<Vec<Training>, PortError> {
        let rows = self.trainings.for_trainer(query).await.map_err(db_to_port_error)?;
        Ok(rows.into_iter().map(Training::from).collect())
    }
}

#[async_trait]
impl TrainingTypePort for PostgresGymAdapter {
    async fn list_training_types(&self) -> Result<Vec<TrainingType>, PortError> {
        let rows = self.training_types.list().await.map_err(db_to_port_error)?;
        Ok(rows.into_iter().map(TrainingType::from).collect())
    }

    async fn find_training_type(&self, id: TrainingTypeId) -> Result<Option<TrainingType>, PortError> {
        let row = self
            .training_types
            .find(id.value())
            .await
            .map_err(db_to_port_error)?;
        Ok(row.map(TrainingType::from))
    }
}
