//! Driven port for daily focus statistics.
//!
//! The store guarantees one row per `(user_id, day)` through a unique
//! constraint; the aggregator relies on [`StatisticsStore::atomic_accumulate`]
//! and a guarded [`StatisticsStore::insert`] rather than read-modify-write.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DailyStatistic, FocusMinutes, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by statistics store adapters.
    pub enum StatisticsStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "statistics store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "statistics store query failed: {message}",
        /// A row for the same `(user_id, day)` already exists.
        Conflict { message: String } => "statistics store conflict: {message}",
        /// Adding the delta would push the day's total past the column range.
        OutOfRange { message: String } => "statistics total out of range: {message}",
    }
}

/// Persistence for [`DailyStatistic`] records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsStore: Send + Sync {
    /// Record for `user` on `day`, if any.
    async fn find_by_user_and_day(
        &self,
        user: &UserId,
        day: NaiveDate,
    ) -> Result<Option<DailyStatistic>, StatisticsStoreError>;

    /// All records for `user`, in storage order.
    async fn list_for_user(&self, user: &UserId)
    -> Result<Vec<DailyStatistic>, StatisticsStoreError>;

    /// Insert a new record.
    ///
    /// Fails with [`StatisticsStoreError::Conflict`] when the
    /// `(user_id, day)` row already exists.
    async fn insert(&self, record: &DailyStatistic) -> Result<(), StatisticsStoreError>;

    /// Add `delta` to an existing row in a single atomic step.
    ///
    /// Returns the updated record, or `None` when no row exists yet.
    async fn atomic_accumulate(
        &self,
        user: &UserId,
        day: NaiveDate,
        delta: FocusMinutes,
    ) -> Result<Option<DailyStatistic>, StatisticsStoreError>;
}
