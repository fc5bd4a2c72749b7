//! Training types
//!
//! The catalogue is seeded by migration and read-only at runtime. A trainer's
//! specialization is one of these types, and every training inherits the
//! type of its trainer.

use core_kernel::TrainingTypeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingType {
    pub id: TrainingTypeId,
    pub name: String,
}

impl TrainingType {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: TrainingTypeId::new(id),
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison used by training filters
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// The catalogue shipped with the initial schema
pub fn default_catalogue() -> Vec<TrainingType> {
    ["Fitness", "Yoga", "Zumba", "Stretching", "Resistance"]
        .iter()
        .enumerate()
        .map(|(i, name)| TrainingType::new(i as i64 + 1, *name))
        .collect()
}
