//! Request handlers, one module per resource

pub mod health;
pub mod user;
pub mod trainee;
pub mod trainer;
pub mod training;
pub mod training_type;
