//! PostgreSQL-backed `StatisticsStore` adapter.
//!
//! `atomic_accumulate` is a single `UPDATE ... SET total = total + $delta`,
//! so concurrent reports for the same day never lose increments. A first
//! report races on the `(user_id, day)` unique constraint and the loser sees
//! [`StatisticsStoreError::Conflict`]. An increment that overflows the
//! `INTEGER` column surfaces as [`StatisticsStoreError::OutOfRange`].

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StatisticsStore, StatisticsStoreError};
use crate::domain::{DailyStatistic, FocusMinutes, UserId};

use super::diesel_basic_error_mapping::{
    is_integer_out_of_range, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{DailyStatisticRow, NewDailyStatisticRow};
use super::pool::{DbPool, PoolError};
use super::schema::daily_statistics;

/// Diesel implementation of [`StatisticsStore`].
#[derive(Clone)]
pub struct DieselStatisticsStore {
    pool: DbPool,
}

impl DieselStatisticsStore {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StatisticsStoreError {
    map_basic_pool_error(error, StatisticsStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StatisticsStoreError {
    map_basic_diesel_error(
        error,
        StatisticsStoreError::query,
        StatisticsStoreError::connection,
    )
}

fn row_to_statistic(row: DailyStatisticRow) -> Result<DailyStatistic, StatisticsStoreError> {
    let user_id = UserId::new(row.user_id)
        .map_err(|err| StatisticsStoreError::query(format!("invalid user id: {err}")))?;
    let minutes = FocusMinutes::new(i64::from(row.total_focus_time))
        .map_err(|err| StatisticsStoreError::query(err.to_string()))?;
    Ok(DailyStatistic::new(row.id, user_id, row.day, minutes))
}

#[async_trait]
impl StatisticsStore for DieselStatisticsStore {
    async fn find_by_user_and_day(
        &self,
        user: &UserId,
        day: NaiveDate,
    ) -> Result<Option<DailyStatistic>, StatisticsStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = daily_statistics::table
            .filter(daily_statistics::user_id.eq(user.as_ref()))
            .filter(daily_statistics::day.eq(day))
            .select(DailyStatisticRow::as_select())
            .first::<DailyStatisticRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_statistic).transpose()
    }

    async fn list_for_user(
        &self,
        user: &UserId,
    ) -> Result<Vec<DailyStatistic>, StatisticsStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = daily_statistics::table
            .filter(daily_statistics::user_id.eq(user.as_ref()))
            .order(daily_statistics::day.asc())
            .select(DailyStatisticRow::as_select())
            .load::<DailyStatisticRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_statistic).collect()
    }

    async fn insert(&self, record: &DailyStatistic) -> Result<(), StatisticsStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewDailyStatisticRow {
            id: record.id(),
            user_id: record.user_id().as_ref(),
            day: record.day(),
            total_focus_time: record.total_focus_time().get(),
            updated_at: Utc::now(),
        };

        diesel::insert_into(daily_statistics::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StatisticsStoreError::conflict(format!(
                        "statistics for {} on {} already exist",
                        record.user_id(),
                        record.day()
                    ))
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn atomic_accumulate(
        &self,
        user: &UserId,
        day: NaiveDate,
        delta: FocusMinutes,
    ) -> Result<Option<DailyStatistic>, StatisticsStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            daily_statistics::table
                .filter(daily_statistics::user_id.eq(user.as_ref()))
                .filter(daily_statistics::day.eq(day)),
        )
        .set((
            daily_statistics::total_focus_time
                .eq(daily_statistics::total_focus_time + delta.get()),
            daily_statistics::updated_at.eq(Utc::now()),
        ))
        .returning(DailyStatisticRow::as_returning())
        .get_result::<DailyStatisticRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| {
            if is_integer_out_of_range(&err) {
                StatisticsStoreError::out_of_range(format!(
                    "adding {} to {user} on {day} overflows",
                    delta.get()
                ))
            } else {
                map_diesel_error(err)
            }
        })?;

        row.map(row_to_statistic).transpose()
    }
}
