//! Shared Diesel error mapping for the persistence adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors through a port's connection constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Whether `error` is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Whether `error` is PostgreSQL's `integer out of range` (SQLSTATE 22003).
///
/// Diesel has no dedicated kind for it, so the server message is inspected.
pub(crate) fn is_integer_out_of_range(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info)
            if info.message().contains("out of range")
    )
}

/// Map Diesel errors through a port's query/connection constructors.
///
/// Callers that care about unique violations must check
/// [`is_unique_violation`] first; here they are plain query failures.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(String),
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, |msg| Mapped::Connection(msg.to_owned()))
    }

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("boom".to_owned()))
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        assert_eq!(
            map(database_error(DatabaseErrorKind::ClosedConnection)),
            Mapped::Connection("database connection error".to_owned())
        );
    }

    #[rstest]
    fn not_found_maps_to_query() {
        assert_eq!(map(DieselError::NotFound), Mapped::Query("record not found"));
    }

    #[rstest]
    fn unique_violation_is_detected() {
        assert!(is_unique_violation(&database_error(
            DatabaseErrorKind::UniqueViolation
        )));
        assert!(!is_unique_violation(&DieselError::NotFound));
    }

    #[rstest]
    #[case(DatabaseErrorKind::Unknown, "integer out of range", true)]
    #[case(DatabaseErrorKind::Unknown, "syntax error", false)]
    #[case(DatabaseErrorKind::CheckViolation, "value out of range", false)]
    fn integer_overflow_is_detected(
        #[case] kind: DatabaseErrorKind,
        #[case] message: &str,
        #[case] expected: bool,
    ) {
        let error = DieselError::DatabaseError(kind, Box::new(message.to_owned()));
        assert_eq!(is_integer_out_of_range(&error), expected);
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }
}
