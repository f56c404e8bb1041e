//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod daily_statistics;
pub mod error;
pub mod friends;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;
pub mod validation;

pub use error::ApiResult;
