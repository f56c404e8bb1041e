//! PostgreSQL-backed `FriendshipLedger` adapter.
//!
//! The `friendships_pair_key` expression index rejects a second edge for the
//! same unordered pair, so `insert_pending` surfaces it as a conflict.
//! Resolution is a conditional `UPDATE ... WHERE status = 'pending'`; a
//! concurrent resolver sees zero affected rows.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FriendshipLedger, FriendshipLedgerError};
use crate::domain::{Friendship, FriendshipStatus, UserId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{FriendshipRow, NewFriendshipRow};
use super::pool::{DbPool, PoolError};
use super::schema::friendships;

/// Diesel implementation of [`FriendshipLedger`].
#[derive(Clone)]
pub struct DieselFriendshipLedger {
    pool: DbPool,
}

impl DieselFriendshipLedger {
    /// Create a ledger over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
        status: Option<FriendshipStatus>,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let forward = friendships::requester_id
            .eq(a.as_ref())
            .and(friendships::target_id.eq(b.as_ref()));
        let backward = friendships::requester_id
            .eq(b.as_ref())
            .and(friendships::target_id.eq(a.as_ref()));

        let mut query = friendships::table
            .filter(forward.or(backward))
            .select(FriendshipRow::as_select())
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(friendships::status.eq(status.as_str()));
        }

        let row = query
            .first::<FriendshipRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_friendship).transpose()
    }
}

fn map_pool_error(error: PoolError) -> FriendshipLedgerError {
    map_basic_pool_error(error, FriendshipLedgerError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FriendshipLedgerError {
    map_basic_diesel_error(
        error,
        FriendshipLedgerError::query,
        FriendshipLedgerError::connection,
    )
}

fn row_to_friendship(row: FriendshipRow) -> Result<Friendship, FriendshipLedgerError> {
    let requester = UserId::new(row.requester_id)
        .map_err(|err| FriendshipLedgerError::query(format!("invalid requester id: {err}")))?;
    let target = UserId::new(row.target_id)
        .map_err(|err| FriendshipLedgerError::query(format!("invalid target id: {err}")))?;
    let status = row
        .status
        .parse::<FriendshipStatus>()
        .map_err(|err| FriendshipLedgerError::query(err.to_string()))?;
    Ok(Friendship::new(requester, target, status))
}

#[async_trait]
impl FriendshipLedger for DieselFriendshipLedger {
    async fn find_accepted_edge(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        self.find_between(a, b, Some(FriendshipStatus::Accepted))
            .await
    }

    async fn find_edge(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        self.find_between(a, b, None).await
    }

    async fn insert_pending(&self, edge: &Friendship) -> Result<(), FriendshipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewFriendshipRow {
            id: Uuid::new_v4(),
            requester_id: edge.requester_id().as_ref(),
            target_id: edge.target_id().as_ref(),
            status: FriendshipStatus::Pending.as_str(),
        };

        diesel::insert_into(friendships::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    FriendshipLedgerError::conflict("friendship already exists for this pair")
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn resolve(
        &self,
        requester: &UserId,
        target: &UserId,
        status: FriendshipStatus,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(
            friendships::table
                .filter(friendships::requester_id.eq(requester.as_ref()))
                .filter(friendships::target_id.eq(target.as_ref()))
                .filter(friendships::status.eq(FriendshipStatus::Pending.as_str())),
        )
        .set((
            friendships::status.eq(status.as_str()),
            friendships::resolved_at.eq(Some(Utc::now())),
        ))
        .returning(FriendshipRow::as_returning())
        .get_result::<FriendshipRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_friendship).transpose()
    }

    async fn list_accepted_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<Friendship>, FriendshipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = friendships::table
            .filter(
                friendships::requester_id
                    .eq(user.as_ref())
                    .or(friendships::target_id.eq(user.as_ref())),
            )
            .filter(friendships::status.eq(FriendshipStatus::Accepted.as_str()))
            .order(friendships::created_at.asc())
            .select(FriendshipRow::as_select())
            .load::<FriendshipRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_friendship).collect()
    }
}
