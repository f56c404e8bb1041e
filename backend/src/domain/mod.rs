//! Domain primitives, services, and ports.
//!
//! Purpose: keep the focus-tracking rules (token issuance, friend-scoped
//! access, additive daily statistics) free of transport and storage
//! concerns. Inbound adapters call the driving ports; outbound adapters
//! implement the driven ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `User`, `UserId`, `RoleName`: identity model.
//! - `Friendship`, `FriendshipStatus`: friendship edges.
//! - `DailyStatistic`, `FocusMinutes`: per-day focus totals.
//! - `SessionTokenIssuer`: signs and verifies bearer tokens.
//! - `IdentityLoginService`: password login against stored Argon2 hashes.
//! - Services implementing the driving ports in [`ports`].

pub mod auth;
pub mod authorization;
pub mod daily_statistics;
pub mod error;
pub mod friendship;
pub mod friendship_service;
pub mod identity_login;
pub mod password;
pub mod ports;
pub mod session_service;
pub mod session_token;
pub mod statistics_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::authorization::FriendAccessGate;
pub use self::daily_statistics::{
    DailyStatistic, FocusMinutes, StatisticsValidationError, parse_report_day, utc_day,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::friendship::{Friendship, FriendshipStatus, UnknownFriendshipStatus};
pub use self::friendship_service::FriendshipService;
pub use self::identity_login::{FIXTURE_ROLE, IdentityLoginService};
pub use self::session_service::{ProfileService, SessionService};
pub use self::session_token::{
    AuthenticatedUser, SESSION_TOKEN_LIFETIME_DAYS, SessionToken, SessionTokenIssuer,
    SigningSecret, SigningSecretError, TokenClaims,
};
pub use self::statistics_service::{
    MAX_ACCUMULATE_ATTEMPTS, StatisticsAggregator, StatisticsReader,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, RoleName, User, UserId, UserValidationError, Username};
