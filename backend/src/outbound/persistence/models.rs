//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; adapters convert them to
//! domain types before returning.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{daily_statistics, friendships, user_roles, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
}

/// Login columns of `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub id: String,
    pub password_hash: Option<String>,
}

/// Insertable form of a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub email: Option<&'a str>,
}

/// Insertable role membership.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewUserRoleRow<'a> {
    pub user_id: &'a str,
    pub role_name: &'a str,
}

/// Row read from `friendships`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = friendships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FriendshipRow {
    pub requester_id: String,
    pub target_id: String,
    pub status: String,
}

/// Insertable friendship edge.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = friendships)]
pub(crate) struct NewFriendshipRow<'a> {
    pub id: Uuid,
    pub requester_id: &'a str,
    pub target_id: &'a str,
    pub status: &'a str,
}

/// Row read from `daily_statistics`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = daily_statistics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DailyStatisticRow {
    pub id: Uuid,
    pub user_id: String,
    pub day: NaiveDate,
    pub total_focus_time: i32,
}

/// Insertable daily statistic.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = daily_statistics)]
pub(crate) struct NewDailyStatisticRow<'a> {
    pub id: Uuid,
    pub user_id: &'a str,
    pub day: NaiveDate,
    pub total_focus_time: i32,
    pub updated_at: DateTime<Utc>,
}
