//! Gym Domain
//!
//! Trainees, trainers and the trainings between them:
//!
//! - **Trainees** register with optional birth date and address and pick trainers
//! - **Trainers** register with a fixed specialization (a training type)
//! - **Trainings** link one trainee and one trainer on a date, typed by the
//!   trainer's specialization
//! - **Workload** events report every added or removed training to the
//!   trainer-workload service
//!
//! Services depend only on the port traits in [`ports`]; storage is provided by
//! `infra_db` or by the in-memory adapter in [`memory`].

pub mod training_type;
pub mod trainee;
pub mod trainer;
pub mod training;
pub mod validation;
pub mod workload;
pub mod error;
pub mod ports;
pub mod memory;
pub mod services;
pub mod adapters;

pub use training_type::{TrainingType, default_catalogue};
pub use trainee::{NewTrainee, NewTraineeRecord, Trainee, TraineeProfile, TraineeUpdate};
pub use trainer::{NewTrainer, NewTrainerRecord, Trainer, TrainerProfile, TrainerUpdate};
pub use training::{
    NewTraining, NewTrainingRecord, Participant, TraineeTrainingQuery, Training,
    TrainerTrainingQuery,
};
pub use validation::{GymValidator, ValidationResult};
pub use workload::{NoopWorkloadNotifier, WorkloadAction, WorkloadEvent, WorkloadNotifier};
pub use error::GymError;
pub use ports::{GymPorts, TraineePort, TrainerPort, TrainingPort, TrainingTypePort};
pub use memory::{InMemoryGym, RecordingWorkloadNotifier};
pub use services::{
    Credentials, CredentialsFactory, TraineeService, TrainerService, TrainingService,
    TrainingTypeService, REGISTRATION_ATTEMPTS,
};
pub use adapters::{HttpWorkloadNotifier, WorkloadClientConfig};
