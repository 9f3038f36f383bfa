//! Shared validation helpers for inbound HTTP adapters.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{
    ContactValidationError, CredentialsValidationError, EmailAddress, Error,
    MAX_BIRTHDAY_WINDOW_DAYS,
};

/// Wire format for dates such as `birthDate`.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidEmail,
    InvalidDate,
    InvalidValue,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_email_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid email address"))
        .with_value(ErrorCode::InvalidEmail, value)
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(value).map_err(|_| invalid_email_error(field, value))
}

pub(crate) fn invalid_date_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a YYYY-MM-DD date"))
        .with_value(ErrorCode::InvalidDate, value)
}

pub(crate) fn parse_birth_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| invalid_date_error(field, value))
}

pub(crate) fn parse_optional_birth_date(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_birth_date(raw, field)).transpose()
}

/// Reject look-ahead windows larger than a year.
pub(crate) fn check_birthday_days(days: u32) -> Result<u32, Error> {
    if days > MAX_BIRTHDAY_WINDOW_DAYS {
        return Err(ValidationError::new(
            "days",
            format!("days must be between 0 and {MAX_BIRTHDAY_WINDOW_DAYS}"),
        )
        .with_value(ErrorCode::OutOfRange, days.to_string()));
    }
    Ok(days)
}

pub(crate) fn contact_validation_error(error: ContactValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn credentials_validation_error(error: CredentialsValidationError) -> Error {
    ValidationError::new(error.field(), error.to_string()).with_code(ErrorCode::InvalidValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const BIRTH_DATE: FieldName = FieldName::new("birthDate");

    #[rstest]
    #[case("1990-05-17", NaiveDate::from_ymd_opt(1990, 5, 17))]
    #[case(" 2000-02-29 ", NaiveDate::from_ymd_opt(2000, 2, 29))]
    fn parses_iso_dates(#[case] raw: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_birth_date(raw, BIRTH_DATE).ok(), expected);
    }

    #[rstest]
    #[case("17/05/1990")]
    #[case("1990-02-30")]
    #[case("")]
    fn rejects_other_date_shapes(#[case] raw: &str) {
        let error = parse_birth_date(raw, BIRTH_DATE).expect_err("invalid date");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "birthDate");
        assert_eq!(details["code"], "invalid_date");
        assert_eq!(details["value"], raw);
    }

    #[rstest]
    fn invalid_email_reports_field_and_value() {
        let error = parse_email("nope", FieldName::new("email")).expect_err("invalid email");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "email");
        assert_eq!(details["code"], "invalid_email");
    }

    #[rstest]
    #[case(0, true)]
    #[case(MAX_BIRTHDAY_WINDOW_DAYS, true)]
    #[case(MAX_BIRTHDAY_WINDOW_DAYS + 1, false)]
    fn birthday_days_are_bounded(#[case] days: u32, #[case] accepted: bool) {
        assert_eq!(check_birthday_days(days).is_ok(), accepted);
    }

    #[rstest]
    fn contact_errors_use_the_wire_field_name() {
        let error = contact_validation_error(ContactValidationError::InvalidPhoneNumber);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "phoneNumber");
        assert_eq!(details["code"], "invalid_value");
    }

    #[rstest]
    fn missing_field_names_the_field() {
        let error = missing_field_error(FieldName::new("refreshToken"));
        assert_eq!(error.message(), "missing required field: refreshToken");
    }
}
