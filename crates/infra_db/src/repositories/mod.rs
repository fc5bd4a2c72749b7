//! Repository implementations for the gym tables
//!
//! Repositories own the SQL and return flat `*Row` types derived with
//! `sqlx::FromRow`; each row type knows how to become its domain model.
//! Multi-table writes run inside a transaction.

pub mod user;
pub mod token;
pub mod trainee;
pub mod trainer;
pub mod training;
pub mod training_type;

pub use user::{UserRepository, UserRow};
pub use token::{TokenRepository, TokenRow};
pub use trainee::{TraineeRepository, TraineeRow};
pub use trainer::{TrainerRepository, TrainerRow};
pub use training::{TrainingRepository, TrainingRow};
pub use training_type::{TrainingTypeRepository, TrainingTypeRow};
