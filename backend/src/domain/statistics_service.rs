//! Daily statistics services.
//!
//! [`StatisticsAggregator`] implements the write port with
//! create-or-accumulate semantics; [`StatisticsReader`] implements the read
//! port behind the friend access gate.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{
    ApplyReportRequest, DailyStatisticsCommand, DailyStatisticsQuery, FriendshipLedger,
    ListStatisticsRequest, StatisticsStore, StatisticsStoreError,
};
use crate::domain::{DailyStatistic, Error, FocusMinutes, FriendAccessGate};

/// Upper bound on accumulate-then-insert rounds before giving up.
pub const MAX_ACCUMULATE_ATTEMPTS: usize = 3;

fn map_store_error(error: StatisticsStoreError) -> Error {
    match error {
        StatisticsStoreError::Connection { message } => {
            Error::service_unavailable(format!("statistics store unavailable: {message}"))
        }
        StatisticsStoreError::Query { message } => {
            Error::internal(format!("statistics store error: {message}"))
        }
        StatisticsStoreError::Conflict { message } => {
            Error::conflict(format!("concurrent statistics update: {message}"))
        }
        StatisticsStoreError::OutOfRange { message } => {
            debug!(%message, "daily total would overflow");
            Error::invalid_request(format!(
                "daily focus total must stay at most {} minutes",
                i32::MAX
            ))
            .with_details(json!({
                "field": "totalFocusTime",
                "code": "total_out_of_range",
                "max": i32::MAX,
            }))
        }
    }
}

/// Applies focus reports to daily totals.
#[derive(Clone)]
pub struct StatisticsAggregator<S> {
    store: Arc<S>,
}

impl<S> StatisticsAggregator<S> {
    /// Create an aggregator writing to `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> StatisticsAggregator<S>
where
    S: StatisticsStore,
{
    fn validate_minutes(raw: Option<i64>) -> Result<FocusMinutes, Error> {
        let raw = raw.ok_or_else(|| {
            Error::invalid_request("totalFocusTime is required")
                .with_details(json!({ "field": "totalFocusTime", "code": "missing" }))
        })?;
        FocusMinutes::new(raw).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "totalFocusTime", "value": raw }))
        })
    }
}

#[async_trait]
impl<S> DailyStatisticsCommand for StatisticsAggregator<S>
where
    S: StatisticsStore,
{
    async fn apply_report(&self, request: ApplyReportRequest) -> Result<DailyStatistic, Error> {
        let minutes = Self::validate_minutes(request.focus_minutes)?;
        let ApplyReportRequest { user_id, day, .. } = request;

        for attempt in 1..=MAX_ACCUMULATE_ATTEMPTS {
            if let Some(updated) = self
                .store
                .atomic_accumulate(&user_id, day, minutes)
                .await
                .map_err(map_store_error)?
            {
                return Ok(updated);
            }

            let record = DailyStatistic::first_report(user_id.clone(), day, minutes);
            match self.store.insert(&record).await {
                Ok(()) => return Ok(record),
                Err(StatisticsStoreError::Conflict { message }) => {
                    debug!(
                        user_id = %user_id,
                        %day,
                        attempt,
                        %message,
                        "daily statistic created concurrently; retrying accumulate"
                    );
                }
                Err(err) => return Err(map_store_error(err)),
            }
        }

        warn!(user_id = %user_id, %day, "daily statistic update kept conflicting");
        Err(Error::conflict("daily statistic is being updated concurrently; retry later")
            .with_details(json!({ "attempts": MAX_ACCUMULATE_ATTEMPTS })))
    }
}

/// Lists daily statistics for the caller or an accepted friend.
#[derive(Clone)]
pub struct StatisticsReader<S, L> {
    store: Arc<S>,
    gate: FriendAccessGate<L>,
}

impl<S, L> StatisticsReader<S, L> {
    /// Create a reader over `store`, gated by `ledger`.
    pub fn new(store: Arc<S>, ledger: Arc<L>) -> Self {
        Self {
            store,
            gate: FriendAccessGate::new(ledger),
        }
    }
}

#[async_trait]
impl<S, L> DailyStatisticsQuery for StatisticsReader<S, L>
where
    S: StatisticsStore,
    L: FriendshipLedger,
{
    async fn list(&self, request: ListStatisticsRequest) -> Result<Vec<DailyStatistic>, Error> {
        let target = self
            .gate
            .resolve_target_user(&request.requester, request.friend_id.as_ref())
            .await?;

        match request.day {
            Some(day) => self
                .store
                .find_by_user_and_day(&target, day)
                .await
                .map(|record| record.into_iter().collect())
                .map_err(map_store_error),
            None => self
                .store
                .list_for_user(&target)
                .await
                .map_err(map_store_error),
        }
    }
}

#[cfg(test)]
#[path = "statistics_service_tests.rs"]
mod tests;
