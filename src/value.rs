//! Tagged cell values stored in the ledger grid.
//!
//! Integers and decimals are kept apart so that `coefficient * raw_reading`
//! stays an integer when both operands are integers. Decimals use
//! `rust_decimal` so products and sums never drift across a save/reload.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Marker placed in front of text that would otherwise reload as a number.
pub const TEXT_MARKER: char = '\'';

/// A single cell value.
///
/// # Examples
///
/// ```
/// use thermo_ledger::Value;
///
/// let coefficient = Value::parse_cell("1.5").unwrap();
/// let reading = Value::Int(7);
/// assert_eq!(coefficient.checked_mul(&reading).unwrap().to_string(), "10.5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Whole number (raw readings, ids, integer coefficients).
    Int(i64),

    /// Exact fractional number (fractional coefficients and their products).
    Decimal(Decimal),

    /// Free text (dates, names, valve settings, notes).
    Text(String),
}

impl Value {
    /// Returns `true` for `Int` and `Decimal`.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Value::Text(_))
    }

    /// Returns `true` for text that is empty once trimmed.
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }

    /// Multiplies two numeric values.
    ///
    /// `Int * Int` stays `Int` unless the product leaves the `i64` range, in
    /// which case it widens to `Decimal`. Any decimal operand widens the
    /// result. Returns `None` for text operands or when even a decimal
    /// cannot hold the product.
    pub fn checked_mul(&self, rhs: &Value) -> Option<Value> {
        if let (Value::Int(a), Value::Int(b)) = (self, rhs) {
            if let Some(product) = a.checked_mul(*b) {
                return Some(Value::Int(product));
            }
        }
        self.as_decimal()?
            .checked_mul(rhs.as_decimal()?)
            .map(Value::Decimal)
    }

    /// Adds two numeric values with the same widening rule as `checked_mul`.
    pub fn checked_add(&self, rhs: &Value) -> Option<Value> {
        if let (Value::Int(a), Value::Int(b)) = (self, rhs) {
            if let Some(sum) = a.checked_add(*b) {
                return Some(Value::Int(sum));
            }
        }
        self.as_decimal()?
            .checked_add(rhs.as_decimal()?)
            .map(Value::Decimal)
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            Value::Text(_) => None,
        }
    }

    /// Parses a stored cell string back into a value.
    ///
    /// Empty strings are absent cells. A leading `'` forces text.
    pub fn parse_cell(raw: &str) -> Option<Value> {
        if raw.is_empty() {
            return None;
        }
        if let Some(text) = raw.strip_prefix(TEXT_MARKER) {
            return Some(Value::Text(text.to_string()));
        }
        if let Ok(i) = i64::from_str(raw) {
            return Some(Value::Int(i));
        }
        if let Ok(d) = Decimal::from_str(raw) {
            return Some(Value::Decimal(d));
        }
        Some(Value::Text(raw.to_string()))
    }

    /// Renders the value for storage so that `parse_cell` restores the same tag.
    pub fn to_cell(&self) -> String {
        match self {
            Value::Text(s) if s.starts_with(TEXT_MARKER) || looks_numeric(s) => {
                format!("{}{}", TEXT_MARKER, s)
            }
            other => other.to_string(),
        }
    }
}

fn looks_numeric(s: &str) -> bool {
    i64::from_str(s).is_ok() || Decimal::from_str(s).is_ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_cell())
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Value::parse_cell(s.trim()).ok_or_else(|| serde::de::Error::custom("empty value"))
    }
}

/// How a value of a given tag is collected from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Whole-number prompt.
    Integer,
    /// Decimal-number prompt.
    Decimal,
    /// Free-text prompt.
    Text,
}

impl InputKind {
    /// Picks the prompt strategy matching a stored value's tag.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Int(_) => InputKind::Integer,
            Value::Decimal(_) => InputKind::Decimal,
            Value::Text(_) => InputKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Value {
        Value::Decimal(Decimal::from_str(s).unwrap())
    }

    #[test]
    fn test_int_times_int_stays_int() {
        let product = Value::Int(3).checked_mul(&Value::Int(15)).unwrap();
        assert_eq!(product, Value::Int(45));
    }

    #[test]
    fn test_decimal_operand_widens() {
        let product = dec("1.5").checked_mul(&Value::Int(7)).unwrap();
        assert_eq!(product, dec("10.5"));

        let sum = Value::Int(10).checked_add(&dec("10.5")).unwrap();
        assert_eq!(sum, dec("20.5"));
    }

    #[test]
    fn test_text_is_not_numeric() {
        let text = Value::from("antifreeze");
        assert!(!text.is_numeric());
        assert!(text.checked_mul(&Value::Int(2)).is_none());
        assert!(Value::Int(2).checked_add(&text).is_none());
    }

    #[test]
    fn test_int_overflow_widens_to_decimal() {
        let product = Value::Int(i64::MAX).checked_mul(&Value::Int(2)).unwrap();
        assert_eq!(product, dec("18446744073709551614"));

        let sum = Value::Int(i64::MAX).checked_add(&Value::Int(1)).unwrap();
        assert_eq!(sum, dec("9223372036854775808"));
    }

    #[test]
    fn test_decimal_overflow_is_none() {
        assert!(Value::Decimal(Decimal::MAX)
            .checked_mul(&Value::Int(2))
            .is_none());
    }

    #[test]
    fn test_parse_cell_tags() {
        assert_eq!(Value::parse_cell("10"), Some(Value::Int(10)));
        assert_eq!(Value::parse_cell("2.0"), Some(dec("2.0")));
        assert_eq!(Value::parse_cell("Kitchen"), Some(Value::from("Kitchen")));
        assert_eq!(Value::parse_cell("'3"), Some(Value::from("3")));
        assert_eq!(Value::parse_cell(""), None);
    }

    #[test]
    fn test_numeric_looking_text_is_marked() {
        assert_eq!(Value::from("3").to_cell(), "'3");
        assert_eq!(Value::from("2.5").to_cell(), "'2.5");
        assert_eq!(Value::from("'quoted").to_cell(), "''quoted");
        assert_eq!(Value::from("half").to_cell(), "half");
        assert_eq!(Value::Int(3).to_cell(), "3");
    }

    #[test]
    fn test_marked_text_restores_exactly() {
        for text in ["3", "'quoted", "2 and a half"] {
            let value = Value::from(text);
            assert_eq!(Value::parse_cell(&value.to_cell()), Some(value));
        }
    }

    #[test]
    fn test_input_kind_covers_every_tag() {
        assert_eq!(InputKind::of(&Value::Int(1)), InputKind::Integer);
        assert_eq!(InputKind::of(&dec("1.5")), InputKind::Decimal);
        assert_eq!(InputKind::of(&Value::from("x")), InputKind::Text);
    }
}
