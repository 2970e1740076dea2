//! Lenient reading of quote documents.
//!
//! Stored quotes and form edits carry numbers in whatever shape the user
//! typed them: JSON numbers, strings with either `.` or `,` as the decimal
//! separator, empty strings, `null`, or nothing at all. Every helper here is
//! total: malformed input degrades to zero (or to the field's default) and
//! never to an error.
//!
//! The `decimal` and `tax` submodules plug into serde via
//! `#[serde(with = "...")]`; decimals are written back as exact JSON numbers
//! (serde_json's `arbitrary_precision`), so a saved quote reloads to the same
//! values digit for digit.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// VAT percentage applied to complementary rows when none is given.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(22, 0, 0, false, 0);

/// Parses user text into a [`Decimal`], coercing anything unusable to zero.
///
/// Whitespace is trimmed and the first comma is read as the decimal
/// separator, so `"12,50"` and `"12.50"` are equivalent.
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::lenient::parse_decimal;
///
/// assert_eq!(parse_decimal(" 12,50 "), dec!(12.50));
/// assert_eq!(parse_decimal(""), dec!(0));
/// assert_eq!(parse_decimal("abc"), dec!(0));
/// ```
pub fn parse_decimal(input: &str) -> Decimal {
    parse_text(input).unwrap_or(Decimal::ZERO)
}

/// Coerces an arbitrary JSON value into a [`Decimal`].
pub fn coerce(value: &Value) -> Decimal {
    coerce_optional(value).unwrap_or(Decimal::ZERO)
}

/// Like [`coerce`], but reports absent values (`null`, empty or blank
/// strings) as `None` so callers can substitute a field default.
///
/// Present but malformed values (`"abc"`, `true`, arrays, objects) are
/// `Some(0)`.
pub fn coerce_optional(value: &Value) -> Option<Decimal> {
    match value {
        Value::Null => None,
        Value::String(s) => parse_text(s),
        // Numbers keep their source text, so this is exact.
        Value::Number(n) => Some(parse_text(&n.to_string()).unwrap_or(Decimal::ZERO)),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Some(Decimal::ZERO),
    }
}

fn parse_text(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.replacen(',', ".", 1);
    Some(
        Decimal::from_str(&normalized)
            .or_else(|_| Decimal::from_scientific(&normalized))
            .unwrap_or(Decimal::ZERO),
    )
}

/// Serde adapter for numeric fields: lenient on read, exact JSON number on
/// write.
pub mod decimal {
    use super::*;

    pub fn serialize<S>(
        value: &Decimal,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::arbitrary_precision::serialize(&value.normalize(), serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value))
    }
}

/// Serde adapter for VAT percentages: absent means [`DEFAULT_TAX_RATE`].
///
/// An explicit `0` stays 0% so VAT-exempt rows survive a reload. Files from
/// the older tool, which read a stored 0 as 22%, come back as 0% here.
pub mod tax {
    use super::*;

    pub use super::decimal::serialize;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_optional(&value).unwrap_or(DEFAULT_TAX_RATE))
    }

    pub fn default_rate() -> Decimal {
        DEFAULT_TAX_RATE
    }
}

/// Reads a number while keeping "absent" distinguishable from zero.
pub fn optional<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_optional(&value))
}

/// Reads free-form text, rendering numbers and booleans as their JSON text
/// and anything structured as empty.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Reads a nested record, falling back to its default when the stored value
/// has the wrong shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
