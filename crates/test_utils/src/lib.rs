//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the gym
//! service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built and randomly named test data
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test container management
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use generators::*;
