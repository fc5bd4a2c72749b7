//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use core_kernel::Period;

/// Capitalised person names as users type them
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,15}"
}

/// Names with stray surrounding whitespace
pub fn padded_name_strategy() -> impl Strategy<Value = String> {
    (" {0,3}", name_strategy(), " {0,3}").prop_map(|(pre, name, post)| format!("{}{}{}", pre, name, post))
}

/// Dates between 2000 and roughly 2040
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..15_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default() + Duration::days(days)
    })
}

/// Periods whose start never falls after their end, with either bound open
pub fn period_strategy() -> impl Strategy<Value = Period> {
    (
        proptest::option::of(date_strategy()),
        proptest::option::of(0i64..365),
    )
        .prop_map(|(from, span)| {
            let to = match (from, span) {
                (Some(from), Some(days)) => Some(from + Duration::days(days)),
                (None, Some(days)) => NaiveDate::from_ymd_opt(2020, 1, 1).map(|d| d + Duration::days(days)),
                (_, None) => None,
            };
            Period::new(from, to).unwrap_or_default()
        })
}

/// Training durations in minutes
pub fn duration_strategy() -> impl Strategy<Value = i32> {
    1i32..=240
}

/// Taken usernames for a base: the base itself plus some serial variants
pub fn taken_usernames_strategy(base: &'static str) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(0u32..20, 0..10).prop_map(move |serials| {
        serials
            .into_iter()
            .map(|n| if n == 0 { base.to_string() } else { format!("{}{}", base, n) })
            .collect()
    })
}
