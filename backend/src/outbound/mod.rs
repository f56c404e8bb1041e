//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL via Diesel, `diesel-async`, and `bb8`.
//! - **memory**: process-local stores for development without a database.
//!
//! Adapters only translate between domain types and storage
//! representations; the rules live in `crate::domain`.

pub mod memory;
pub mod persistence;
