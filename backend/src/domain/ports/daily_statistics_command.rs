//! Driving port for recording focus time.
//!
//! Reports are additive: applying the same report twice doubles its
//! contribution to the day's total.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DailyStatistic, Error, UserId};

/// A focus report for the caller's own statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReportRequest {
    /// Authenticated caller; reports are never applied on behalf of others.
    pub user_id: UserId,
    /// UTC calendar day the minutes belong to.
    pub day: NaiveDate,
    /// Minutes to add; `None` when the client omitted the field.
    pub focus_minutes: Option<i64>,
}

/// Statistics write use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyStatisticsCommand: Send + Sync {
    /// Create the day's record or add to its running total.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when minutes are missing or negative.
    /// - `Conflict` when every retry lost a race on the `(user, day)` row.
    /// - `ServiceUnavailable` or `InternalError` for storage failures.
    async fn apply_report(&self, request: ApplyReportRequest) -> Result<DailyStatistic, Error>;
}
