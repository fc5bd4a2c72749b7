//! Unit tests for the identifiers module
//!
//! Covers display prefixes, parsing with and without prefix, ordering and
//! serde transparency.

use core_kernel::{TokenId, TraineeId, TrainerId, TrainingId, TrainingTypeId, UserId};
use proptest::prelude::*;

mod display_tests {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(UserId::new(1).to_string(), "USR-1");
        assert_eq!(TokenId::new(2).to_string(), "TOK-2");
        assert_eq!(TraineeId::new(3).to_string(), "TRE-3");
        assert_eq!(TrainerId::new(4).to_string(), "TRR-4");
        assert_eq!(TrainingId::new(5).to_string(), "TRN-5");
        assert_eq!(TrainingTypeId::new(6).to_string(), "TTY-6");
    }

    #[test]
    fn test_prefix_accessor() {
        assert_eq!(TrainerId::prefix(), "TRR");
    }
}

mod parsing_tests {
    use super::*;

    #[test]
    fn test_parse_with_prefix() {
        let id: TrainerId = "TRR-17".parse().unwrap();
        assert_eq!(id.value(), 17);
    }

    #[test]
    fn test_parse_bare_number() {
        let id: TrainingTypeId = "3".parse().unwrap();
        assert_eq!(id, TrainingTypeId::new(3));
    }

    #[test]
    fn test_parse_rejects_foreign_prefix() {
        assert!("TRE-17".parse::<TrainerId>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<UserId>().is_err());
    }
}

mod serde_tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&TrainingId::new(12)).unwrap();
        assert_eq!(json, "12");

        let back: TrainingId = serde_json::from_str("12").unwrap();
        assert_eq!(back.value(), 12);
    }
}

#[test]
fn test_ordering_follows_value() {
    let mut ids = vec![TraineeId::new(9), TraineeId::new(2), TraineeId::new(5)];
    ids.sort();
    assert_eq!(ids, vec![TraineeId::new(2), TraineeId::new(5), TraineeId::new(9)]);
}

proptest! {
    #[test]
    fn prop_display_then_parse_is_identity(raw in any::<i64>()) {
        let id = UserId::new(raw);
        let parsed: UserId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }
}
