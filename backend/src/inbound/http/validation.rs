//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `InvalidRequest` errors whose `details` name the field
//! and a machine-readable code.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{Error, UserId, parse_report_day};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidDate,
    InvalidUserId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidUserId => "invalid_user_id",
        }
    }
}

/// HTTP field name as seen by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

/// Parse a `YYYY-MM-DD` date or RFC 3339 timestamp into its UTC day.
pub(crate) fn parse_day(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    parse_report_day(value).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            format!("{name} must be a YYYY-MM-DD date or an RFC 3339 timestamp"),
            ErrorCode::InvalidDate,
            Some(value),
        )
    })
}

pub(crate) fn parse_optional_day(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_day(raw, field)).transpose()
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|err| {
        field_error(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidUserId,
            Some(value),
        )
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;
    use serde_json::Value;

    const DATE: FieldName = FieldName::new("date");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case("2024-03-01", "2024-03-01")]
    #[case("2024-03-01T23:30:00-02:00", "2024-03-02")]
    fn dates_and_timestamps_resolve_to_utc_days(#[case] raw: &str, #[case] expected: &str) {
        let day = parse_day(raw, DATE).expect("valid date");
        assert_eq!(day.to_string(), expected);
    }

    #[rstest]
    fn malformed_dates_report_field_and_value() {
        let err = parse_day("yesterday", DATE).expect_err("malformed");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some(&Value::from("date")));
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_date")));
        assert_eq!(detail(&err, "value"), Some(&Value::from("yesterday")));
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = missing_field_error(FieldName::new("totalFocusTime"));
        assert_eq!(err.message(), "missing required field: totalFocusTime");
        assert_eq!(detail(&err, "code"), Some(&Value::from("missing_field")));
    }

    #[rstest]
    #[case("")]
    #[case(" padded ")]
    fn invalid_user_ids_are_rejected(#[case] raw: &str) {
        let err = parse_user_id(raw, FieldName::new("friendId")).expect_err("invalid id");
        assert_eq!(detail(&err, "code"), Some(&Value::from("invalid_user_id")));
    }

    #[rstest]
    fn absent_optional_day_is_none() {
        assert_eq!(parse_optional_day(None, DATE).expect("no date"), None);
    }
}
