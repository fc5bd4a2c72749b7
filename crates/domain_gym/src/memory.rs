//! In-memory gym storage
//!
//! Users live in an [`InMemoryAccounts`]; this store keeps the trainee,
//! trainer, assignment and training rows that reference them. Locks are always
//! taken in the order gym state, then accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError, TraineeId, TrainerId,
    TrainingId, TrainingTypeId, UserId,
};
use domain_account::{AccountPort, InMemoryAccounts, NewToken, StoredToken, TokenPort, User};

use crate::ports::{GymPorts, TraineePort, TrainerPort, TrainingPort, TrainingTypePort};
use crate::trainee::{NewTraineeRecord, Trainee, TraineeUpdate};
use crate::trainer::{NewTrainerRecord, Trainer, TrainerUpdate};
use crate::training::{
    NewTrainingRecord, Participant, TraineeTrainingQuery, Training, TrainerTrainingQuery,
};
use crate::training_type::{default_catalogue, TrainingType};
use crate::workload::{WorkloadEvent, WorkloadNotifier};

#[derive(Debug, Clone)]
struct TraineeRow {
    id: TraineeId,
    user_id: UserId,
    date_of_birth: Option<chrono::NaiveDate>,
    address: Option<String>,
}

#[derive(Debug, Clone)]
struct TrainerRow {
    id: TrainerId,
    user_id: UserId,
    specialization_id: TrainingTypeId,
}

#[derive(Debug, Clone)]
struct TrainingRow {
    id: TrainingId,
    trainee_id: TraineeId,
    trainer_id: TrainerId,
    name: String,
    training_type_id: TrainingTypeId,
    date: chrono::NaiveDate,
    duration: i32,
}

#[derive(Debug, Default)]
struct GymState {
    next_id: i64,
    trainees: BTreeMap<TraineeId, TraineeRow>,
    trainers: BTreeMap<TrainerId, TrainerRow>,
    assignments: BTreeSet<(TraineeId, TrainerId)>,
    trainings: BTreeMap<TrainingId, TrainingRow>,
    training_types: BTreeMap<TrainingTypeId, TrainingType>,
}

impl GymState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Process-local implementation of every gym and account port
#[derive(Debug)]
pub struct InMemoryGym {
    accounts: Arc<InMemoryAccounts>,
    state: RwLock<GymState>,
}

impl Default for InMemoryGym {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGym {
    /// Creates a store seeded with the default training type catalogue
    pub fn new() -> Self {
        let state = GymState {
            training_types: default_catalogue().into_iter().map(|t| (t.id, t)).collect(),
            ..Default::default()
        };
        Self {
            accounts: Arc::new(InMemoryAccounts::new()),
            state: RwLock::new(state),
        }
    }

    pub fn accounts(&self) -> Arc<InMemoryAccounts> {
        self.accounts.clone()
    }

    /// Wraps the store and the given notifier into a port bundle
    pub fn into_ports(self, workload: Arc<dyn WorkloadNotifier>) -> GymPorts {
        GymPorts::from_store(Arc::new(self), workload)
    }

    async fn user(&self, id: UserId) -> Result<User, PortError> {
        self.accounts
            .user(id)
            .await
            .ok_or_else(|| PortError::internal(format!("dangling user reference {}", id)))
    }

    async fn trainee_from(&self, row: &TraineeRow) -> Result<Trainee, PortError> {
        Ok(Trainee {
            id: row.id,
            user: self.user(row.user_id).await?,
            date_of_birth: row.date_of_birth,
            address: row.address.clone(),
        })
    }

    async fn trainer_from(&self, state: &GymState, row: &TrainerRow) -> Result<Trainer, PortError> {
        let specialization = state
            .training_types
            .get(&row.specialization_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("TrainingType", row.specialization_id))?;
        Ok(Trainer {
            id: row.id,
            user: self.user(row.user_id).await?,
            specialization,
        })
    }

    async fn participant(&self, user_id: UserId) -> Result<Participant, PortError> {
        let user = self.user(user_id).await?;
        Ok(Participant {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        })
    }

    async fn training_from(&self, state: &GymState, row: &TrainingRow) -> Result<Training, PortError> {
        let trainee_user = state
            .trainees
            .get(&row.trainee_id)
            .map(|t| t.user_id)
            .ok_or_else(|| PortError::not_found("Trainee", row.trainee_id))?;
        let trainer_user = state
            .trainers
            .get(&row.trainer_id)
            .map(|t| t.user_id)
            .ok_or_else(|| PortError::not_found("Trainer", row.trainer_id))?;
        let training_type = state
            .training_types
            .get(&row.training_type_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("TrainingType", row.training_type_id))?;

        Ok(Training {
            id: row.id,
            trainee: self.participant(trainee_user).await?,
            trainer: self.participant(trainer_user).await?,
            name: row.name.clone(),
            training_type,
            date: row.date,
            duration: row.duration,
        })
    }

    async fn user_id_of(&self, username: &str) -> Result<Option<UserId>, PortError> {
        Ok(self
            .accounts
            .find_user_by_username(username)
            .await?
            .map(|user| user.id))
    }

    async fn trainee_row(&self, state: &GymState, username: &str) -> Result<Option<TraineeRow>, PortError> {
        let Some(user_id) = self.user_id_of(username).await? else {
            return Ok(None);
        };
        Ok(state.trainees.values().find(|t| t.user_id == user_id).cloned())
    }

    async fn trainer_row(&self, state: &GymState, username: &str) -> Result<Option<TrainerRow>, PortError> {
        let Some(user_id) = self.user_id_of(username).await? else {
            return Ok(None);
        };
        Ok(state.trainers.values().find(|t| t.user_id == user_id).cloned())
    }

    async fn all_trainings(&self, state: &GymState) -> Result<Vec<Training>, PortError> {
        let mut trainings = Vec::with_capacity(state.trainings.len());
        for row in state.trainings.values() {
            trainings.push(self.training_from(state, row).await?);
        }
        trainings.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(trainings)
    }
}

impl DomainPort for InMemoryGym {}

#[async_trait]
impl HealthCheckable for InMemoryGym {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("in-memory-gym", AdapterHealth::Healthy, 0)
            .with_message("In-memory store is always available")
    }
}

#[async_trait]
impl AccountPort for InMemoryGym {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, PortError> {
        self.accounts.find_user_by_username(username).await
    }

    async fn usernames_starting_with(&self, prefix: &str) -> Result<Vec<String>, PortError> {
        self.accounts.usernames_starting_with(prefix).await
    }

    async fn update_password(&self, user_id: UserId, password_hash: &str) -> Result<(), PortError> {
        self.accounts.update_password(user_id, password_hash).await
    }
}

#[async_trait]
impl TokenPort for InMemoryGym {
    async fn save_token(&self, token: NewToken) -> Result<StoredToken, PortError> {
        self.accounts.save_token(token).await
    }

    async fn find_token(&self, token: &str) -> Result<Option<StoredToken>, PortError> {
        self.accounts.find_token(token).await
    }

    async fn active_tokens_for_user(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoredToken>, PortError> {
        self.accounts.active_tokens_for_user(user_id, now).await
    }

    async fn revoke_all_for_user(&self, user_id: UserId) -> Result<u64, PortError> {
        self.accounts.revoke_all_for_user(user_id).await
    }

    async fn purge_inactive_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> Result<u64, PortError> {
        self.accounts.purge_inactive_for_user(user_id, now).await
    }
}

#[async_trait]
impl TraineePort for InMemoryGym {
    async fn create_trainee(&self, record: NewTraineeRecord) -> Result<Trainee, PortError> {
        let mut state = self.state.write().await;
        let user = self.accounts.insert_user(record.user).await?;
        let row = TraineeRow {
            id: TraineeId::new(state.next_id()),
            user_id: user.id,
            date_of_birth: record.date_of_birth,
            address: record.address,
        };
        state.trainees.insert(row.id, row.clone());
        Ok(Trainee {
            id: row.id,
            user,
            date_of_birth: row.date_of_birth,
            address: row.address,
        })
    }

    async fn find_trainee(&self, username: &str) -> Result<Option<Trainee>, PortError> {
        let state = self.state.read().await;
        match self.trainee_row(&state, username).await? {
            Some(row) => Ok(Some(self.trainee_from(&row).await?)),
            None => Ok(None),
        }
    }

    async fn update_trainee(&self, update: &TraineeUpdate) -> Result<Option<Trainee>, PortError> {
        let mut state = self.state.write().await;
        let Some(row) = self.trainee_row(&state, &update.username).await? else {
            return Ok(None);
        };

        let (first_name, last_name, is_active) =
            (update.first_name.clone(), update.last_name.clone(), update.is_active);
        self.accounts
            .modify_user(row.user_id, move |user| {
                user.first_name = first_name;
                user.last_name = last_name;
                user.is_active = is_active;
            })
            .await?;

        let stored = state
            .trainees
            .get_mut(&row.id)
            .ok_or_else(|| PortError::not_found("Trainee", row.id))?;
        stored.date_of_birth = update.date_of_birth;
        stored.address = update.address.clone();
        let stored = stored.clone();

        Ok(Some(self.trainee_from(&stored).await?))
    }

    async fn set_trainee_active(&self, username: &str, is_active: bool) -> Result<bool, PortError> {
        let state = self.state.read().await;
        let Some(row) = self.trainee_row(&state, username).await? else {
            return Ok(false);
        };
        self.accounts
            .modify_user(row.user_id, move |user| user.is_active = is_active)
            .await?;
        Ok(true)
    }

    async fn delete_trainee(&self, username: &str) -> Result<bool, PortError> {
        let mut state = self.state.write().await;
        let Some(row) = self.trainee_row(&state, username).await? else {
            return Ok(false);
        };

        state.trainings.retain(|_, t| t.trainee_id != row.id);
        state.assignments.retain(|(trainee_id, _)| *trainee_id != row.id);
        state.trainees.remove(&row.id);
        self.accounts.remove_user(row.user_id).await;
        Ok(true)
    }

    async fn trainers_of(&self, trainee_id: TraineeId) -> Result<Vec<Trainer>, PortError> {
        let state = self.state.read().await;
        let mut trainers = Vec::new();
        for (_, trainer_id) in state.assignments.iter().filter(|(t, _)| *t == trainee_id) {
            if let Some(row) = state.trainers.get(trainer_id) {
                trainers.push(self.trainer_from(&state, row).await?);
            }
        }
        Ok(trainers)
    }

    async fn replace_trainers(&self, trainee_id: TraineeId, trainer_ids: &[TrainerId]) -> Result<(), PortError> {
        let mut state = self.state.write().await;
        if !state.trainees.contains_key(&trainee_id) {
            return Err(PortError::not_found("Trainee", trainee_id));
        }
        if let Some(missing) = trainer_ids.iter().find(|id| !state.trainers.contains_key(*id)) {
            return Err(PortError::not_found("Trainer", missing));
        }

        state.assignments.retain(|(t, _)| *t != trainee_id);
        for trainer_id in trainer_ids {
            state.assignments.insert((trainee_id, *trainer_id));
        }
        Ok(())
    }
}

#[async_trait]
impl TrainerPort for InMemoryGym {
    async fn create_trainer(&self, record: NewTrainerRecord) -> Result<Trainer, PortError> {
        let mut state = self.state.write().await;
        let specialization = state
            .training_types
            .get(&record.specialization_id)
            .cloned()
            .ok_or_else(|| PortError::not_found("TrainingType", record.specialization_id))?;
        let user = self.accounts.insert_user(record.user).await?;
        let row = TrainerRow {
            id: TrainerId::new(state.next_id()),
            user_id: user.id,
            specialization_id: specialization.id,
        };
        state.trainers.insert(row.id, row.clone());
        Ok(Trainer {
            id: row.id,
            user,
            specialization,
        })
    }

    async fn find_trainer(&self, username: &str) -> Result<Option<Trainer>, PortError> {
        let state = self.state.read().await;
        match self.trainer_row(&state, username).await? {
            Some(row) => Ok(Some(self.trainer_from(&state, &row).await?)),
            None => Ok(None),
        }
    }

    async fn find_trainers(&self, usernames: &[String]) -> Result<Vec<Trainer>, PortError> {
        let state = self.state.read().await;
        let mut trainers = Vec::new();
        for username in usernames {
            if let Some(row) = self.trainer_row(&state, username).await? {
                trainers.push(self.trainer_from(&state, &row).await?);
            }
        }
        Ok(trainers)
    }

    async fn update_trainer(&self, update: &TrainerUpdate) -> Result<Option<Trainer>, PortError> {
        let state = self.state.read().await;
        let Some(row) = self.trainer_row(&state, &update.username).await? else {
            return Ok(None);
        };

        let (first_name, last_name, is_active) =
            (update.first_name.clone(), update.last_name.clone(), update.is_active);
        self.accounts
            .modify_user(row.user_id, move |user| {
                user.first_name = first_name;
                user.last_name = last_name;
                user.is_active = is_active;
            })
            .await?;

        Ok(Some(self.trainer_from(&state, &row).await?))
    }

    async fn set_trainer_active(&self, username: &str, is_active: bool) -> Result<bool, PortError> {
        let state = self.state.read().await;
        let Some(row) = self.trainer_row(&state, username).await? else {
            return Ok(false);
        };
        self.accounts
            .modify_user(row.user_id, move |user| user.is_active = is_active)
            .await?;
        Ok(true)
    }

    async fn trainees_of(&self, trainer_id: TrainerId) -> Result<Vec<Trainee>, PortError> {
        let state = self.state.read().await;
        let mut trainees = Vec::new();
        for (trainee_id, _) in state.assignments.iter().filter(|(_, t)| *t == trainer_id) {
            if let Some(row) = state.trainees.get(trainee_id) {
                trainees.push(self.trainee_from(row).await?);
            }
        }
        Ok(trainees)
    }

    async fn unassigned_active_trainers(&self, trainee_id: TraineeId) -> Result<Vec<Trainer>, PortError> {
        let state = self.state.read().await;
        let mut trainers = Vec::new();
        for row in state.trainers.values() {
            if state.assignments.contains(&(trainee_id, row.id)) {
                continue;
            }
            let trainer = self.trainer_from(&state, row).await?;
            if trainer.is_active() {
                trainers.push(trainer);
            }
        }
        Ok(trainers)
    }
}

#[async_trait]
impl TrainingPort for InMemoryGym {
    async fn create_training(&self, record: NewTrainingRecord) -> Result<Training, PortError> {
        let mut state = self.state.write().await;
        if !state.trainees.contains_key(&record.trainee_id) {
            return Err(PortError::not_found("Trainee", record.trainee_id));
        }
        if !state.trainers.contains_key(&record.trainer_id) {
            return Err(PortError::not_found("Trainer", record.trainer_id));
        }

        let row = TrainingRow {
            id: TrainingId::new(state.next_id()),
            trainee_id: record.trainee_id,
            trainer_id: record.trainer_id,
            name: record.name,
            training_type_id: record.training_type_id,
            date: record.date,
            duration: record.duration,
        };
        state.trainings.insert(row.id, row.clone());
        self.training_from(&state, &row).await
    }

    async fn find_training(&self, id: TrainingId) -> Result<Option<Training>, PortError> {
        let state = self.state.read().await;
        match state.trainings.get(&id) {
            Some(row) => Ok(Some(self.training_from(&state, row).await?)),
            None => Ok(None),
        }
    }

    async fn delete_training(&self, id: TrainingId) -> Result<bool, PortError> {
        Ok(self.state.write().await.trainings.remove(&id).is_some())
    }

    async fn trainee_trainings(&self, query: &TraineeTrainingQuery) -> Result<Vec<Training>, PortError> {
        let state = self.state.read().await;
        let trainings = self.all_trainings(&state).await?;
        Ok(trainings.into_iter().filter(|t| query.matches(t)).collect())
    }

    async fn trainer_trainings(&self, query: &TrainerTrainingQuery) -> Result<Vec<Training>, PortError> {
        let state = self.state.read().await;
        let trainings = self.all_trainings(&state).await?;
        Ok(trainings.into_iter().filter(|t| query.matches(t)).collect())
    }
}

#[async_trait]
impl TrainingTypePort for InMemoryGym {
    async fn list_training_types(&self) -> Result<Vec<TrainingType>, PortError> {
        Ok(self.state.read().await.training_types.values().cloned().collect())
    }

    async fn find_training_type(&self, id: TrainingTypeId) -> Result<Option<TrainingType>, PortError> {
        Ok(self.state.read().await.training_types.get(&id).cloned())
    }
}

/// Notifier that keeps every event it receives
#[derive(Debug, Default)]
pub struct RecordingWorkloadNotifier {
    events: RwLock<Vec<WorkloadEvent>>,
    fail: bool,
}

impl RecordingWorkloadNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records events and then reports the service unavailable
    pub fn failing() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            fail: true,
        }
    }

    pub async fn events(&self) -> Vec<WorkloadEvent> {
        self.events.read().await.clone()
    }
}

impl DomainPort for RecordingWorkloadNotifier {}

#[async_trait]
impl HealthCheckable for RecordingWorkloadNotifier {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::new("workload-recorder", AdapterHealth::Healthy, 0)
    }
}

#[async_trait]
impl WorkloadNotifier for RecordingWorkloadNotifier {
    async fn notify(&self, event: &WorkloadEvent, _authorization: Option<&str>) -> Result<(), PortError> {
        self.events.write().await.push(event.clone());
        if self.fail {
            return Err(PortError::ServiceUnavailable {
                service: "trainer-workload".to_string(),
            });
        }
        Ok(())
    }
}
