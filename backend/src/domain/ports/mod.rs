//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`IdentityStore`, `FriendshipLedger`, `StatisticsStore`) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! `LoginService`) are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod daily_statistics_command;
mod daily_statistics_query;
mod friendship_command;
mod friendship_ledger;
mod identity_store;
mod login_service;
mod session_command;
mod statistics_store;
mod user_profile_query;

#[cfg(test)]
pub use daily_statistics_command::MockDailyStatisticsCommand;
pub use daily_statistics_command::{ApplyReportRequest, DailyStatisticsCommand};
#[cfg(test)]
pub use daily_statistics_query::MockDailyStatisticsQuery;
pub use daily_statistics_query::{DailyStatisticsQuery, ListStatisticsRequest};
pub use friendship_command::{FriendRequestDecision, FriendshipCommand, FriendshipQuery};
#[cfg(test)]
pub use friendship_command::{MockFriendshipCommand, MockFriendshipQuery};
#[cfg(test)]
pub use friendship_ledger::MockFriendshipLedger;
pub use friendship_ledger::{FriendshipLedger, FriendshipLedgerError};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError, StoredCredentials};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_USER_ID, FIXTURE_USERNAME, FixtureLoginService, LoginService};
#[cfg(test)]
pub use session_command::MockSessionCommand;
pub use session_command::SessionCommand;
#[cfg(test)]
pub use statistics_store::MockStatisticsStore;
pub use statistics_store::{StatisticsStore, StatisticsStoreError};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
