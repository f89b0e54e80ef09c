//! Field-level validation helpers shared by domain services.
//!
//! Every validation failure is an [`Error::invalid_request`] whose details
//! name the offending field and a stable reason code, so clients can attach
//! messages to form inputs.

use serde_json::json;

use crate::domain::Error;

/// Stable reason codes reported in validation error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidIdentifier,
    InvalidValue,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Name of a request field as clients spell it (camelCase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ValidationCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::MissingField,
        format!("{} is required", field.as_str()),
    )
}

pub(crate) fn invalid_identifier_error(field: FieldName) -> Error {
    field_error(
        field,
        ValidationCode::InvalidIdentifier,
        format!("{} is not a valid identifier", field.as_str()),
    )
}

pub(crate) fn invalid_value_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    field_error(
        field,
        ValidationCode::InvalidValue,
        format!("{} is invalid: {reason}", field.as_str()),
    )
}

/// Return the trimmed value, rejecting absent or blank input.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(raw.trim().to_owned()),
        _ => Err(missing_field_error(field)),
    }
}

/// Trim optional free text, mapping blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}
