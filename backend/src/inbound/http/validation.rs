//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{BookingId, ClassId, Email, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidEmail,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// `400` carrying `{ field, code }` details.
pub(crate) fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// `400` for a value that failed domain validation.
pub(crate) fn invalid_value_error(field: FieldName, err: impl std::fmt::Display) -> Error {
    field_error(field, ErrorCode::InvalidValue, err.to_string())
}

fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_class_id(value: &str, field: FieldName) -> Result<ClassId, Error> {
    ClassId::parse(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_booking_id(value: &str, field: FieldName) -> Result<BookingId, Error> {
    BookingId::parse(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<Email, Error> {
    Email::new(value).map_err(|err| field_error(field, ErrorCode::InvalidEmail, err.to_string()))
}
