use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};

use crate::error::ServiceError;

/// Ranking window for the most-liked query. Anything outside the four
/// variants is a `BadRequest` before any storage work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// Cutoff timestamp: `now` minus the window. Month and year are
    /// calendar-based, day and week are fixed spans.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Day => now - Duration::days(1),
            Period::Week => now - Duration::weeks(1),
            Period::Month => now
                .checked_sub_months(Months::new(1))
                .unwrap_or_else(|| now - Duration::days(30)),
            Period::Year => now
                .checked_sub_months(Months::new(12))
                .unwrap_or_else(|| now - Duration::days(365)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl FromStr for Period {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            _ => Err(ServiceError::BadRequest("invalid period".to_string())),
        }
    }
}
