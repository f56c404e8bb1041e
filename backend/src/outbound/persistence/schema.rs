//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `migrations/` exactly. The expression index that keeps
//! one friendship per unordered pair cannot be expressed here; see the
//! baseline migration.

diesel::table! {
    /// User accounts. `id` is an opaque identifier issued by the identity
    /// provider.
    users (id) {
        id -> Varchar,
        username -> Varchar,
        email -> Nullable<Varchar>,
        created_at -> Timestamptz,
        password_hash -> Nullable<Text>,
    }
}

diesel::table! {
    /// Role memberships, one row per `(user, role)`.
    user_roles (user_id, role_name) {
        user_id -> Varchar,
        role_name -> Varchar,
    }
}

diesel::table! {
    /// Directed friendship edges.
    friendships (id) {
        id -> Uuid,
        requester_id -> Varchar,
        target_id -> Varchar,
        /// One of `pending`, `accepted`, `rejected`.
        status -> Varchar,
        created_at -> Timestamptz,
        resolved_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Per-day focus totals; unique on `(user_id, day)`.
    daily_statistics (id) {
        id -> Uuid,
        user_id -> Varchar,
        day -> Date,
        total_focus_time -> Int4,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(user_roles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, user_roles, friendships, daily_statistics);
