//! Strongly-typed identifiers for domain entities
//!
//! Rows are keyed by PostgreSQL `BIGSERIAL` columns, so every identifier wraps
//! an `i64`. The newtypes keep a trainee id from being passed where a trainer
//! id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database key
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database key
            pub const fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

// Account identifiers
define_id!(UserId, "USR");
define_id!(TokenId, "TOK");

// Gym identifiers
define_id!(TraineeId, "TRE");
define_id!(TrainerId, "TRR");
define_id!(TrainingId, "TRN");
define_id!(TrainingTypeId, "TTY");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainee_id_display() {
        let id = TraineeId::new(42);
        assert_eq!(id.to_string(), "TRE-42");
    }

    #[test]
    fn test_id_parsing() {
        let original = TrainingId::new(7);
        let parsed: TrainingId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);

        let bare: TrainingId = "7".parse().unwrap();
        assert_eq!(bare, original);
    }

    #[test]
    fn test_i64_conversion() {
        let id = UserId::from(99);
        let back: i64 = id.into();
        assert_eq!(back, 99);
    }
}
