//! Driving port for reading focus statistics.
//!
//! Callers may read their own statistics or those of an accepted friend.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DailyStatistic, Error, UserId};

/// Statistics read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStatisticsRequest {
    /// Authenticated caller.
    pub requester: UserId,
    /// Friend whose statistics are requested; `None` reads the caller's own.
    pub friend_id: Option<UserId>,
    /// Restrict the result to one UTC day.
    pub day: Option<NaiveDate>,
}

/// Statistics read use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DailyStatisticsQuery: Send + Sync {
    /// Records for the resolved target user.
    ///
    /// # Errors
    ///
    /// `Forbidden` when `friend_id` names a user without an accepted
    /// friendship with the caller.
    async fn list(&self, request: ListStatisticsRequest) -> Result<Vec<DailyStatistic>, Error>;
}
