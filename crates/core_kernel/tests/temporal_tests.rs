//! Tests for training period handling

use chrono::NaiveDate;
use core_kernel::{parse_date, Period, TemporalError};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod period_tests {
    use super::*;

    #[test]
    fn test_unbounded_contains_everything() {
        let period = Period::unbounded();
        assert!(period.is_unbounded());
        assert!(period.contains(date(1900, 1, 1)));
        assert!(period.contains(date(2100, 12, 31)));
    }

    #[test]
    fn test_same_day_period_is_valid() {
        let day = date(2024, 3, 15);
        let period = Period::new(Some(day), Some(day)).unwrap();
        assert!(period.contains(day));
        assert!(!period.contains(date(2024, 3, 16)));
    }

    #[test]
    fn test_reversed_period_message() {
        let err = Period::new(Some(date(2024, 5, 1)), Some(date(2024, 4, 1))).unwrap_err();
        assert_eq!(err.to_string(), "'From date' must be before 'To date'.");
    }

    #[test]
    fn test_upper_bound_only() {
        let period = Period::new(None, Some(date(2024, 1, 31))).unwrap();
        assert!(period.contains(date(2020, 1, 1)));
        assert!(!period.contains(date(2024, 2, 1)));
        assert_eq!(period.from(), None);
        assert_eq!(period.to(), Some(date(2024, 1, 31)));
    }
}

mod parsing_tests {
    use super::*;

    #[test]
    fn test_parse_both_bounds() {
        let period = Period::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert_eq!(period.from(), Some(date(2024, 1, 1)));
        assert_eq!(period.to(), Some(date(2024, 1, 31)));
    }

    #[test]
    fn test_parse_none() {
        let period = Period::parse(None, None).unwrap();
        assert!(period.is_unbounded());
    }

    #[test]
    fn test_parse_bad_format_names_field() {
        let err = Period::parse(Some("01/02/2024"), None).unwrap_err();
        match err {
            TemporalError::InvalidDate { field, value } => {
                assert_eq!(field, "periodFrom");
                assert_eq!(value, "01/02/2024");
            }
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_date_trims() {
        assert_eq!(parse_date("trainingDate", " 2024-06-01 ").unwrap(), date(2024, 6, 1));
    }
}

proptest! {
    #[test]
    fn prop_period_contains_its_bounds(start in 0i64..20_000, len in 0i64..400) {
        let from = date(1990, 1, 1) + chrono::Duration::days(start);
        let to = from + chrono::Duration::days(len);
        let period = Period::new(Some(from), Some(to)).unwrap();
        prop_assert!(period.contains(from));
        prop_assert!(period.contains(to));
        prop_assert!(!period.contains(to + chrono::Duration::days(1)));
    }
}
