//! Parsing of user-entered field values.
//!
//! Registration forms send rates and timestamps as text. Everything here
//! turns that text into typed values or an [`EngineError::InvalidField`]
//! naming the offending field, before the value reaches a registry, the
//! resolver or the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};

use crate::error::{EngineError, EngineResult};

/// Timestamp layouts accepted from callers, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Largest rate accepted, in currency units.
pub const MAX_RATE_UNITS: i64 = 1_000_000_000;

/// Names that collide with static route segments.
const RESERVED_NAMES: [&str; 1] = ["all"];

/// Weekdays by index, 0 = Monday.
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parses a required, non-negative decimal rate.
///
/// A comma is accepted as the decimal separator when no dot is present, so
/// `"12,50"` and `"12.50"` parse to the same value.
///
/// # Examples
///
/// ```
/// use diaria_ledger::parse::parse_rate;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_rate("default_charged_rate", "12,50").unwrap(), Decimal::new(1250, 2));
/// assert!(parse_rate("default_charged_rate", "-1").is_err());
/// assert!(parse_rate("default_charged_rate", "abc").is_err());
/// ```
pub fn parse_rate(field: &str, text: &str) -> EngineResult<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid_field(field, "is required"));
    }

    let normalized = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    let value = Decimal::from_str(&normalized).map_err(|_| {
        EngineError::invalid_field(field, format!("'{}' is not a decimal number", trimmed))
    })?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid_field(field, "must not be negative"));
    }
    if value > Decimal::from(MAX_RATE_UNITS) {
        return Err(EngineError::invalid_field(
            field,
            format!("must not exceed {}", MAX_RATE_UNITS),
        ));
    }

    Ok(value)
}

/// Parses a registry entry name: trimmed, non-empty and not reserved.
///
/// ```
/// use diaria_ledger::parse::parse_name;
///
/// assert_eq!(parse_name(" Rapido Express ").unwrap(), "Rapido Express");
/// assert!(parse_name("  ").is_err());
/// assert!(parse_name("All").is_err());
/// ```
pub fn parse_name(text: &str) -> EngineResult<String> {
    let name = text.trim();
    if name.is_empty() {
        return Err(EngineError::invalid_field("name", "must not be empty"));
    }
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(name)) {
        return Err(EngineError::invalid_field(
            "name",
            format!("'{}' is reserved", name),
        ));
    }
    Ok(name.to_string())
}

/// Parses an optional rate; `None` and blank text both mean "not set".
pub fn parse_optional_rate(field: &str, text: Option<&str>) -> EngineResult<Option<Decimal>> {
    match text {
        Some(t) if !t.trim().is_empty() => parse_rate(field, t).map(Some),
        _ => Ok(None),
    }
}

/// Parses a shift timestamp in any of the accepted layouts.
///
/// # Examples
///
/// ```
/// use diaria_ledger::parse::parse_timestamp;
///
/// let a = parse_timestamp("start_time", "2026-01-12T09:00").unwrap();
/// let b = parse_timestamp("start_time", "2026-01-12 09:00:00").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_timestamp(field: &str, text: &str) -> EngineResult<NaiveDateTime> {
    let trimmed = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            EngineError::invalid_field(field, format!("'{}' is not a valid timestamp", trimmed))
        })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(field: &str, text: &str) -> EngineResult<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        EngineError::invalid_field(field, format!("'{}' is not a YYYY-MM-DD date", trimmed))
    })
}

/// Maps a weekday index (0 = Monday .. 6 = Sunday) to a [`Weekday`].
pub fn weekday_from_index(field: &str, index: u8) -> EngineResult<Weekday> {
    WEEKDAYS
        .get(usize::from(index))
        .copied()
        .ok_or_else(|| {
            EngineError::invalid_field(field, format!("weekday index {} is outside 0-6", index))
        })
}

/// Deserializes a field that forms may send either as a JSON string or as a
/// JSON number, keeping it as text for [`parse_rate`].
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextOrNumber)
}

/// Optional variant of [`text_or_number`]; JSON `null` becomes `None`.
pub fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(OptionalTextOrNumber)
}

struct TextOrNumber;

impl Visitor<'_> for TextOrNumber {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal number or a string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
        Ok(value.to_string())
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
        Ok(value.to_string())
    }
}

struct OptionalTextOrNumber;

impl<'de> Visitor<'de> for OptionalTextOrNumber {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal number, a string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        text_or_number(deserializer).map(Some)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        TextOrNumber.visit_str(value).map(Some)
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        TextOrNumber.visit_u64(value).map(Some)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        TextOrNumber.visit_i64(value).map(Some)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        TextOrNumber.visit_f64(value).map(Some)
    }
}
