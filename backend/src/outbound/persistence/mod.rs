//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; adapters return domain types and port errors only.
//!
//! # Example
//!
//! ```ignore
//! use focus_backend::outbound::persistence::{DbPool, DieselStatisticsStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/focus")).await?;
//! let store = DieselStatisticsStore::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_friendship_ledger;
mod diesel_identity_store;
mod diesel_statistics_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_friendship_ledger::DieselFriendshipLedger;
pub use diesel_identity_store::DieselIdentityStore;
pub use diesel_statistics_store::DieselStatisticsStore;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
