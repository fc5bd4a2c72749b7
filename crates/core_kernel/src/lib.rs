//! Core Kernel - Foundational types shared by the gym service crates
//!
//! This crate provides the building blocks used across all domain modules:
//! - Typed identifiers over database keys
//! - Date windows for training queries
//! - Port infrastructure and the outbound circuit breaker

pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;
pub mod resilience;

pub use temporal::{Period, TemporalError, DATE_FORMAT, parse_date};
pub use identifiers::{
    UserId, TokenId, TraineeId, TrainerId, TrainingId, TrainingTypeId,
};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, CircuitBreakerConfig,
    AdapterHealth, HealthCheckResult, HealthCheckable,
};
pub use resilience::{CircuitBreaker, CircuitState};
