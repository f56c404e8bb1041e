//! In-memory `StatisticsStore`.
//!
//! Each operation takes the map lock once, so `atomic_accumulate` and the
//! duplicate check in `insert` behave like their SQL counterparts.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{StatisticsStore, StatisticsStoreError};
use crate::domain::{DailyStatistic, FocusMinutes, UserId};

use super::lock;

/// Records keyed by `(user, day)`.
#[derive(Debug, Default)]
pub struct InMemoryStatisticsStore {
    records: Mutex<HashMap<(UserId, NaiveDate), DailyStatistic>>,
}

#[async_trait]
impl StatisticsStore for InMemoryStatisticsStore {
    async fn find_by_user_and_day(
        &self,
        user: &UserId,
        day: NaiveDate,
    ) -> Result<Option<DailyStatistic>, StatisticsStoreError> {
        Ok(lock(&self.records).get(&(user.clone(), day)).cloned())
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<DailyStatistic>, StatisticsStoreError> {
        let mut records: Vec<DailyStatistic> = lock(&self.records)
            .values()
            .filter(|record| record.user_id() == user)
            .cloned()
            .collect();
        records.sort_by_key(DailyStatistic::day);
        Ok(records)
    }

    async fn insert(&self, record: &DailyStatistic) -> Result<(), StatisticsStoreError> {
        match lock(&self.records).entry((record.user_id().clone(), record.day())) {
            Entry::Occupied(_) => Err(StatisticsStoreError::conflict(format!(
                "statistics for {} on {} already exist",
                record.user_id(),
                record.day()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn atomic_accumulate(
        &self,
        user: &UserId,
        day: NaiveDate,
        delta: FocusMinutes,
    ) -> Result<Option<DailyStatistic>, StatisticsStoreError> {
        let mut records = lock(&self.records);
        let Some(existing) = records.get_mut(&(user.clone(), day)) else {
            return Ok(None);
        };
        let updated = existing
            .accumulated(delta)
            .ok_or_else(|| {
                StatisticsStoreError::out_of_range(format!(
                    "{} + {} overflows",
                    existing.total_focus_time().get(),
                    delta.get()
                ))
            })?;
        *existing = updated.clone();
        Ok(Some(updated))
    }
}
