//! Pre-built Test Fixtures
//!
//! Fixed fixtures keep assertions predictable; the `random_*` variants draw
//! names from `fake` for tests that only need distinct people.

use chrono::NaiveDate;
use fake::faker::address::en::StreetName;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use core_kernel::TrainingTypeId;
use domain_account::{NewUser, Role};
use domain_gym::{NewTrainee, NewTrainer};

/// Catalogue ids seeded by the initial migration
pub struct TrainingTypeFixtures;

impl TrainingTypeFixtures {
    pub fn fitness() -> TrainingTypeId {
        TrainingTypeId::new(1)
    }

    pub fn yoga() -> TrainingTypeId {
        TrainingTypeId::new(2)
    }

    pub fn zumba() -> TrainingTypeId {
        TrainingTypeId::new(3)
    }

    /// An id no catalogue entry uses
    pub fn unknown() -> TrainingTypeId {
        TrainingTypeId::new(999)
    }
}

/// Fixture for temporal test data
pub struct DateFixtures;

impl DateFixtures {
    pub fn birth_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1995, 4, 12).unwrap()
    }

    /// A training date inside [`Self::march_2024`]
    pub fn training_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    pub fn march_2024() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
    }
}

/// Fixture for people registering with the gym
pub struct PersonFixtures;

impl PersonFixtures {
    pub fn trainee(first_name: &str, last_name: &str) -> NewTrainee {
        NewTrainee {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            date_of_birth: Some(DateFixtures::birth_date()),
            address: Some("12 Elm Street".to_string()),
        }
    }

    pub fn trainer(first_name: &str, last_name: &str, specialization_id: TrainingTypeId) -> NewTrainer {
        NewTrainer {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            specialization_id,
        }
    }

    pub fn random_trainee() -> NewTrainee {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        NewTrainee {
            address: Some(StreetName().fake()),
            ..Self::trainee(&first, &last)
        }
    }

    pub fn random_trainer(specialization_id: TrainingTypeId) -> NewTrainer {
        let first: String = FirstName().fake();
        let last: String = LastName().fake();
        Self::trainer(&first, &last, specialization_id)
    }

    /// A user row with a placeholder hash, for repository tests
    pub fn user(username: &str, role: Role) -> NewUser {
        let (first_name, last_name) = username.split_once('.').unwrap_or((username, username));
        NewUser {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            password_hash: "$2b$04$placeholderplaceholderplaceholderplaceho".to_string(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_trainees_have_names() {
        let trainee = PersonFixtures::random_trainee();
        assert!(!trainee.first_name.is_empty());
        assert!(!trainee.last_name.is_empty());
    }

    #[test]
    fn test_user_fixture_splits_username() {
        let user = PersonFixtures::user("Anna.Lee", Role::Trainee);
        assert_eq!(user.first_name, "Anna");
        assert_eq!(user.last_name, "Lee");
    }

    #[test]
    fn test_training_date_in_march() {
        let (from, to) = DateFixtures::march_2024();
        let date = DateFixtures::training_date();
        assert!(from <= date && date <= to);
    }
}
