//! Request and response bodies
//!
//! All bodies use camelCase field names and `yyyy-MM-dd` dates.

pub mod user;
pub mod trainee;
pub mod trainer;
pub mod training;
