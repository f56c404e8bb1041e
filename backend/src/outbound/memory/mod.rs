//! In-process adapters for the driven ports.
//!
//! Used when no `DATABASE_URL` is configured and by tests that want real
//! port semantics without PostgreSQL. Each store keeps its state behind a
//! `std::sync::Mutex`; no lock is held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

mod friendship_ledger;
mod identity_store;
mod statistics_store;

pub use friendship_ledger::InMemoryFriendshipLedger;
pub use identity_store::InMemoryIdentityStore;
pub use statistics_store::InMemoryStatisticsStore;

/// Lock `mutex`, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
