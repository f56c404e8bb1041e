//! Daily focus statistics.
//!
//! A [`DailyStatistic`] holds the total focus minutes a user logged on one
//! UTC calendar day. Reports are additive: each report adds its minutes to
//! the day's running total.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Validation errors for statistics inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatisticsValidationError {
    /// Focus minutes were negative.
    #[error("focus minutes must not be negative (got {value})")]
    NegativeMinutes { value: i64 },
    /// Focus minutes did not fit the storage range.
    #[error("focus minutes must be at most {max} (got {value})")]
    MinutesOutOfRange { value: i64, max: i32 },
    /// The date string was neither `YYYY-MM-DD` nor RFC 3339.
    #[error("date must be YYYY-MM-DD or an RFC 3339 timestamp")]
    MalformedDate,
}

/// Non-negative focus time in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct FocusMinutes(i32);

impl FocusMinutes {
    /// Zero minutes.
    pub const ZERO: Self = Self(0);

    /// Validate and construct from any integer input.
    ///
    /// # Examples
    /// ```
    /// use focus_backend::domain::FocusMinutes;
    ///
    /// assert_eq!(FocusMinutes::new(25).unwrap().get(), 25);
    /// assert!(FocusMinutes::new(-1).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, StatisticsValidationError> {
        if value < 0 {
            return Err(StatisticsValidationError::NegativeMinutes { value });
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| StatisticsValidationError::MinutesOutOfRange {
                value,
                max: i32::MAX,
            })
    }

    /// Raw minute count.
    pub fn get(self) -> i32 {
        self.0
    }

    /// Sum of two totals, or `None` when it would overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl TryFrom<i64> for FocusMinutes {
    type Error = StatisticsValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FocusMinutes> for i32 {
    fn from(value: FocusMinutes) -> Self {
        value.0
    }
}

/// Normalise an instant to its UTC calendar day.
pub fn utc_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Parse a client-supplied date and normalise it to a UTC calendar day.
///
/// Accepts a bare `YYYY-MM-DD` date or an RFC 3339 timestamp; timestamps
/// with an offset are converted to UTC before truncation.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use focus_backend::domain::parse_report_day;
///
/// let day = parse_report_day("2024-03-01T23:30:00-02:00").unwrap();
/// assert_eq!(day, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
/// ```
pub fn parse_report_day(raw: &str) -> Result<NaiveDate, StatisticsValidationError> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| utc_day(instant.with_timezone(&Utc)))
        .map_err(|_| StatisticsValidationError::MalformedDate)
}

/// Total focus minutes for one user on one UTC day.
///
/// ## Invariants
/// - At most one record exists per `(user_id, day)`.
/// - `total_focus_time` never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatistic {
    id: Uuid,
    user_id: UserId,
    day: NaiveDate,
    total_focus_time: FocusMinutes,
}

impl DailyStatistic {
    /// Rebuild a record from storage.
    pub fn new(id: Uuid, user_id: UserId, day: NaiveDate, total_focus_time: FocusMinutes) -> Self {
        Self {
            id,
            user_id,
            day,
            total_focus_time,
        }
    }

    /// First record for a day, with a fresh identifier.
    pub fn first_report(user_id: UserId, day: NaiveDate, minutes: FocusMinutes) -> Self {
        Self::new(Uuid::new_v4(), user_id, day, minutes)
    }

    /// Record identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owner of the record.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// UTC calendar day.
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Accumulated minutes for the day.
    pub fn total_focus_time(&self) -> FocusMinutes {
        self.total_focus_time
    }

    /// Copy of this record with `delta` added to the total.
    pub fn accumulated(&self, delta: FocusMinutes) -> Option<Self> {
        let total_focus_time = self.total_focus_time.checked_add(delta)?;
        Some(Self {
            total_focus_time,
            ..self.clone()
        })
    }
}
