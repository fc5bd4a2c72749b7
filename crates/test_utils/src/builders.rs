//! Test Data Builders
//!
//! Builders let tests specify only the relevant fields while using defaults
//! for everything else.

use chrono::NaiveDate;

use core_kernel::Period;
use domain_gym::{NewTraining, TraineeTrainingQuery, TraineeUpdate, TrainerTrainingQuery};

use crate::fixtures::DateFixtures;

/// Builder for a training between two registered usernames
pub struct NewTrainingBuilder {
    trainee_username: String,
    trainer_username: String,
    name: String,
    date: NaiveDate,
    duration: i32,
}

impl NewTrainingBuilder {
    pub fn new(trainee_username: impl Into<String>, trainer_username: impl Into<String>) -> Self {
        Self {
            trainee_username: trainee_username.into(),
            trainer_username: trainer_username.into(),
            name: "Morning session".to_string(),
            date: DateFixtures::training_date(),
            duration: 60,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn lasting(mut self, minutes: i32) -> Self {
        self.duration = minutes;
        self
    }

    pub fn build(self) -> NewTraining {
        NewTraining {
            trainee_username: self.trainee_username,
            trainer_username: self.trainer_username,
            name: self.name,
            date: self.date,
            duration: self.duration,
        }
    }
}

/// Builder for a trainee profile update
pub struct TraineeUpdateBuilder {
    update: TraineeUpdate,
}

impl TraineeUpdateBuilder {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            update: TraineeUpdate {
                username: username.into(),
                first_name: "Anna".to_string(),
                last_name: "Lee".to_string(),
                date_of_birth: Some(DateFixtures::birth_date()),
                address: None,
                is_active: true,
            },
        }
    }

    pub fn names(mut self, first_name: &str, last_name: &str) -> Self {
        self.update.first_name = first_name.to_string();
        self.update.last_name = last_name.to_string();
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.update.address = Some(address.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.update.is_active = false;
        self
    }

    pub fn build(self) -> TraineeUpdate {
        self.update
    }
}

/// Builder for both training list queries
#[derive(Default)]
pub struct TrainingQueryBuilder {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    other_party: Option<String>,
    training_type: Option<String>,
}

impl TrainingQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Trainer filter of a trainee query, or trainee filter of a trainer query
    pub fn with(mut self, username: impl Into<String>) -> Self {
        self.other_party = Some(username.into());
        self
    }

    pub fn of_type(mut self, training_type: impl Into<String>) -> Self {
        self.training_type = Some(training_type.into());
        self
    }

    fn period(&self) -> Period {
        Period::new(self.from, self.to).unwrap_or_default()
    }

    pub fn for_trainee(self, username: impl Into<String>) -> TraineeTrainingQuery {
        TraineeTrainingQuery {
            period: self.period(),
            trainee_username: username.into(),
            trainer_username: self.other_party,
            training_type: self.training_type,
        }
    }

    pub fn for_trainer(self, username: impl Into<String>) -> TrainerTrainingQuery {
        TrainerTrainingQuery {
            period: self.period(),
            trainer_username: username.into(),
            trainee_username: self.other_party,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_builder_defaults() {
        let training = NewTrainingBuilder::new("Anna.Lee", "Mia.Stone").lasting(45).build();
        assert_eq!(training.duration, 45);
        assert_eq!(training.date, DateFixtures::training_date());
    }

    #[test]
    fn test_query_builder_fills_filters() {
        let (from, to) = DateFixtures::march_2024();
        let query = TrainingQueryBuilder::new()
            .between(from, to)
            .with("Mia.Stone")
            .of_type("Yoga")
            .for_trainee("Anna.Lee");
        assert_eq!(query.period.from(), Some(from));
        assert_eq!(query.trainer_username.as_deref(), Some("Mia.Stone"));
        assert_eq!(query.training_type.as_deref(), Some("Yoga"));
    }
}
