//! Derived fields of a block: actual values, totals, and session dates.
//!
//! Everything here is pure; the engine decides where results are written.

use crate::value::Value;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Converts a raw reading into a usage value: `coefficient * raw_reading`.
///
/// Integer products too large for `i64` come back as decimals. Returns `None`
/// if the coefficient is not numeric or even a decimal cannot hold the product.
pub fn actual_value(coefficient: &Value, raw_reading: i64) -> Option<Value> {
    coefficient.checked_mul(&Value::Int(raw_reading))
}

/// Sums the actual values of one block. An empty block totals `0`.
pub fn total<'a, I>(actual_values: I) -> Option<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    actual_values
        .into_iter()
        .try_fold(Value::Int(0), |acc, value| acc.checked_add(value))
}

/// How session dates are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    /// `DD/MM/YYYY`
    European,
    /// `MM/DD/YYYY`
    American,
}

impl DateFormat {
    /// The `chrono` format string.
    pub fn pattern(&self) -> &'static str {
        match self {
            DateFormat::European => "%d/%m/%Y",
            DateFormat::American => "%m/%d/%Y",
        }
    }

    /// Human-readable layout, e.g. `DD/MM/YYYY`.
    pub fn label(&self) -> &'static str {
        match self {
            DateFormat::European => "DD/MM/YYYY",
            DateFormat::American => "MM/DD/YYYY",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::European => f.write_str("European"),
            DateFormat::American => f.write_str("American"),
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "European" => Ok(DateFormat::European),
            "American" => Ok(DateFormat::American),
            other => Err(format!("unknown date format '{}'", other)),
        }
    }
}

/// Where the session date comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateInputMode {
    /// Today's date.
    Auto,
    /// Entered by the user.
    Manual,
}

impl fmt::Display for DateInputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateInputMode::Auto => f.write_str("Auto"),
            DateInputMode::Manual => f.write_str("Manual"),
        }
    }
}

impl FromStr for DateInputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Auto" => Ok(DateInputMode::Auto),
            "Manual" => Ok(DateInputMode::Manual),
            other => Err(format!("unknown date input mode '{}'", other)),
        }
    }
}

/// Formats the session date.
pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_actual_values_from_sample() {
        let readings = [(1, 10), (2, 7), (3, 15)];
        let values: Vec<Value> = readings
            .iter()
            .map(|(coeff, raw)| actual_value(&Value::Int(*coeff), *raw).unwrap())
            .collect();

        assert_eq!(values, vec![Value::Int(10), Value::Int(14), Value::Int(45)]);
        assert_eq!(total(&values), Some(Value::Int(69)));
    }

    #[test]
    fn test_fractional_coefficient() {
        let coefficient = Value::Decimal(Decimal::from_str("0.5").unwrap());
        let value = actual_value(&coefficient, 9).unwrap();
        assert_eq!(value.to_string(), "4.5");

        let sum = total(&[value, Value::Int(10)]).unwrap();
        assert_eq!(sum.to_string(), "14.5");
    }

    #[test]
    fn test_text_coefficient_has_no_value() {
        assert!(actual_value(&Value::from("n/a"), 3).is_none());
        assert!(total(&[Value::Int(1), Value::from("x")]).is_none());
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(total(std::iter::empty()), Some(Value::Int(0)));
    }

    #[test]
    fn test_format_date_modes() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(format_date(date, DateFormat::European), "31/01/2025");
        assert_eq!(format_date(date, DateFormat::American), "01/31/2025");
    }

    #[test]
    fn test_labels_parse_back() {
        for format in [DateFormat::European, DateFormat::American] {
            assert_eq!(format.to_string().parse::<DateFormat>(), Ok(format));
        }
        for mode in [DateInputMode::Auto, DateInputMode::Manual] {
            assert_eq!(mode.to_string().parse::<DateInputMode>(), Ok(mode));
        }
        assert!("Metric".parse::<DateFormat>().is_err());
    }
}
