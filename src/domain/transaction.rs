use super::summary::MonthKey;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::{Map, Number, Value};
use std::str::FromStr;
use thiserror::Error;

/// Formats tried, in order, for timestamps carrying an explicit UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Formats tried, in order, for timestamps without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A single field of a transaction record that could not be interpreted.
#[derive(Error, Debug, PartialEq)]
pub enum FieldError {
    #[error("field `{field}` is not numeric: {value}")]
    NotNumeric { field: &'static str, value: String },
    #[error("field `{field}` is outside the supported decimal range: {value}")]
    OutOfRange { field: &'static str, value: String },
    #[error("could not parse timestamp `{value}`: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

/// A read-only view over one element of a transaction-list `data` array.
///
/// Fields are looked up lazily so that a malformed field only affects the
/// accessor that reads it.
#[derive(Debug, Clone, Copy)]
pub struct RawTransaction<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawTransaction<'a> {
    /// Returns `None` when the element is not a JSON object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    pub fn kind(&self) -> &'a str {
        self.text("type")
    }

    pub fn status(&self) -> &'a str {
        self.text("status")
    }

    /// True for a `payment` whose status is `succeeded`, in any letter casing.
    pub fn is_successful_payment(&self) -> bool {
        self.kind().to_lowercase() == "payment" && self.status().to_lowercase() == "succeeded"
    }

    pub fn amount(&self) -> Result<Decimal, FieldError> {
        coerce_decimal("amount", self.fields.get("amount"))
    }

    pub fn fee(&self) -> Result<Decimal, FieldError> {
        coerce_decimal("fee", self.fields.get("fee"))
    }

    /// Month the transaction was created in, in the timestamp's own offset.
    ///
    /// `None` when `created_at` is absent, `null` or empty.
    pub fn created_month(&self) -> Option<Result<MonthKey, FieldError>> {
        match self.fields.get("created_at")? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(parse_timestamp(text).map(MonthKey::from_date)),
            other => Some(Err(FieldError::InvalidTimestamp {
                value: other.to_string(),
                reason: "expected a string".to_string(),
            })),
        }
    }

    fn text(&self, key: &str) -> &'a str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Coerces an optional JSON value into an exact decimal.
///
/// Absent and `null` values count as zero. Numbers and numeric strings are
/// accepted; anything else is rejected. JSON numbers finer than 28 decimal
/// places are rounded; numbers whose magnitude exceeds [`Decimal::MAX`] are
/// rejected as out of range.
pub fn coerce_decimal(field: &'static str, value: Option<&Value>) -> Result<Decimal, FieldError> {
    let not_numeric = |value: &Value| FieldError::NotNumeric {
        field,
        value: value.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => number_to_decimal(field, n),
        Some(text @ Value::String(s)) => parse_decimal(s.trim()).ok_or_else(|| not_numeric(text)),
        Some(other) => Err(not_numeric(other)),
    }
}

fn number_to_decimal(field: &'static str, number: &Number) -> Result<Decimal, FieldError> {
    let text = number.to_string();
    if let Some(exact) = parse_decimal(&text) {
        return Ok(exact);
    }
    // Below half of the smallest step (1e-28) everything rounds to zero.
    number
        .as_f64()
        .and_then(|float| {
            if float.abs() < 5e-29 {
                Some(Decimal::ZERO)
            } else {
                Decimal::from_f64(float)
            }
        })
        .ok_or(FieldError::OutOfRange { field, value: text })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parses an ISO-8601 timestamp into the calendar date it names.
///
/// A trailing `Z` is read as `+00:00`. The date is taken in whatever offset
/// the timestamp carries; no timezone conversion happens.
pub fn parse_timestamp(text: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = text.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(parsed.date_naive());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalized, format) {
            return Ok(parsed.date_naive());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(parsed.date());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").map_err(|e| FieldError::InvalidTimestamp {
        value: text.to_string(),
        reason: e.to_string(),
    })
}
