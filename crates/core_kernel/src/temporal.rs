//! Date handling for training schedules
//!
//! Training queries accept an optional reporting window. Both bounds are
//! inclusive calendar dates; either may be left open.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("'From date' must be before 'To date'.")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("{field} must be in the format yyyy-MM-dd, got '{value}'")]
    InvalidDate {
        field: String,
        value: String,
    },
}

/// An inclusive date window with optional bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl Period {
    /// Creates a period, rejecting windows whose start falls after their end
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, TemporalError> {
        if let (Some(start), Some(end)) = (from, to) {
            if start > end {
                return Err(TemporalError::InvalidPeriod {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(Self { from, to })
    }

    /// A period with no bounds at all
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parses optional `yyyy-MM-dd` query values into a period
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, TemporalError> {
        let from = from.map(|value| parse_date("periodFrom", value)).transpose()?;
        let to = to.map(|value| parse_date("periodTo", value)).transpose()?;
        Self::new(from, to)
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Returns true if the date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |start| date >= start) && self.to.map_or(true, |end| date <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Parses a `yyyy-MM-dd` date, naming the offending field on failure
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, TemporalError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| TemporalError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
