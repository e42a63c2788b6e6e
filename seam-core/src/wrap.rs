//! Value wrappers: the closed set of validators turning untrusted input into [`ValidValue`].
//!
//! Each wrapper takes one input (`None` meaning absent) and either returns a value of its
//! declared kind or fails with a [`WrapError`] carrying the expectation and a JSON snapshot of
//! the rejected input. Nothing is coerced across kinds: `"12"` is not a number and `1` is not
//! a boolean. The `*_or_null` wrappers additionally accept absent, `Value::Null` and typed
//! `None`, all normalized to `Value::Null`.
use crate::Value;
use std::fmt::{self, Display};
use thiserror::Error;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Primitive kind a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Number,
    Boolean,
    String,
    Date,
    Uuid,
}

/// A value that went through a wrapper. Only this module can construct it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidValue(Value);

impl ValidValue {
    pub fn value(&self) -> &Value {
        &self.0
    }
    pub fn into_value(self) -> Value {
        self.0
    }
    pub fn is_null(&self) -> bool {
        matches!(self.0, Value::Null)
    }
}

impl AsRef<Value> for ValidValue {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}

impl From<ValidValue> for Value {
    fn from(value: ValidValue) -> Self {
        value.0
    }
}

/// Input rejected by a wrapper.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected {expected}, received: {received}")]
pub struct WrapError {
    /// Human readable expectation, for example `a UUID or null`.
    pub expected: &'static str,
    /// Snapshot of the rejected input.
    pub received: serde_json::Value,
}

impl Kind {
    pub fn expectation(self, nullable: bool) -> &'static str {
        match (self, nullable) {
            (Kind::Number, false) => "a number",
            (Kind::Number, true) => "a number or null",
            (Kind::Boolean, false) => "a boolean",
            (Kind::Boolean, true) => "a boolean or null",
            (Kind::String, false) => "a string",
            (Kind::String, true) => "a string or null",
            (Kind::Date, false) => "a date",
            (Kind::Date, true) => "a date or null",
            (Kind::Uuid, false) => "a UUID",
            (Kind::Uuid, true) => "a UUID or null",
        }
    }

    /// Validate a value that must be present and not null.
    pub fn wrap(self, value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
        self.check(value.into(), false)
    }

    /// Validate a value that may be absent or null.
    pub fn wrap_or_null(self, value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
        self.check(value.into(), true)
    }

    fn check(self, value: Option<Value>, nullable: bool) -> Result<ValidValue, WrapError> {
        let reject = |value: &Value| WrapError {
            expected: self.expectation(nullable),
            received: value.to_json(),
        };
        let value = value.unwrap_or_default();
        if value.is_null() {
            return if nullable {
                Ok(ValidValue(Value::Null))
            } else {
                Err(reject(&value))
            };
        }
        let accepted = match (self, &value) {
            (Kind::Number, v) if v.as_integer().is_some() => true,
            (
                Kind::Number,
                Value::Float32(Some(..)) | Value::Float64(Some(..)) | Value::Decimal(Some(..)),
            ) => true,
            (Kind::Boolean, Value::Boolean(Some(..))) => true,
            (Kind::String, Value::Varchar(Some(..))) => true,
            (Kind::Uuid, Value::Uuid(Some(..))) => true,
            (Kind::Uuid, Value::Varchar(Some(v))) => is_canonical_uuid(v),
            (
                Kind::Date,
                Value::Date(Some(..))
                | Value::Timestamp(Some(..))
                | Value::TimestampWithTimezone(Some(..)),
            ) => true,
            (Kind::Date, Value::Varchar(Some(v))) => is_date(v),
            _ => false,
        };
        if accepted {
            Ok(ValidValue(value))
        } else {
            Err(reject(&value))
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::String => "string",
            Kind::Date => "date",
            Kind::Uuid => "uuid",
        })
    }
}

/// Hyphenated 8-4-4-4-12 form, the only textual form accepted for UUID columns.
fn is_canonical_uuid(value: &str) -> bool {
    value.len() == 36
        && value
            .char_indices()
            .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) == (c == '-'))
        && Uuid::try_parse(value).is_ok()
}

/// RFC 3339 date-time, ISO date or `YYYY-MM-DD[ T]HH:MM:SS[.f]`. The text itself is kept.
fn is_date(value: &str) -> bool {
    let formats = [
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    ];
    OffsetDateTime::parse(value, &Rfc3339).is_ok()
        || Date::parse(value, format_description!("[year]-[month]-[day]")).is_ok()
        || formats
            .iter()
            .any(|format| PrimitiveDateTime::parse(value, *format).is_ok())
}

pub fn number(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Number.wrap(value)
}
pub fn number_or_null(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Number.wrap_or_null(value)
}
pub fn boolean(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Boolean.wrap(value)
}
pub fn boolean_or_null(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Boolean.wrap_or_null(value)
}
pub fn string(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::String.wrap(value)
}
pub fn string_or_null(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::String.wrap_or_null(value)
}
pub fn date(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Date.wrap(value)
}
pub fn date_or_null(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Date.wrap_or_null(value)
}
pub fn uuid(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Uuid.wrap(value)
}
pub fn uuid_or_null(value: impl Into<Option<Value>>) -> Result<ValidValue, WrapError> {
    Kind::Uuid.wrap_or_null(value)
}
