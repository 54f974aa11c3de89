//! Per-field type conversion.
//!
//! Conversions never fail a record: a value that does not parse as the
//! requested type is kept as the original string.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Target type for a converted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conversion {
    Integer,
    Float,
    Boolean,
    /// Calendar date, stored as a timestamp at midnight UTC.
    Date,
    /// Date and time; values without an offset are taken as UTC.
    DateTime,
}

impl Conversion {
    /// Returns the type name as written in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
        }
    }

    /// Converts `raw`, or hands it back unchanged when it does not parse.
    pub fn apply(self, raw: String) -> FieldValue {
        let converted = match self {
            Self::Integer => parse_integer(&raw).map(FieldValue::Integer),
            Self::Float => parse_float(&raw).map(FieldValue::Float),
            Self::Boolean => parse_boolean(&raw).map(FieldValue::Boolean),
            Self::Date => parse_date(&raw).map(FieldValue::Timestamp),
            Self::DateTime => parse_date_time(&raw).map(FieldValue::Timestamp),
        };
        converted.unwrap_or(FieldValue::String(raw))
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Conversion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "boolean" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "date_time" | "date-time" => Ok(Self::DateTime),
            _ => Err(format!("Unknown conversion type: {s}")),
        }
    }
}

/// Parses a base-10 integer, allowing surrounding whitespace.
pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Parses a finite decimal number, allowing surrounding whitespace.
pub fn parse_float(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}

/// Parses `true` or `false` in any letter case.
pub fn parse_boolean(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses a date in one of the accepted formats, as midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d-%b-%Y",  // 15-Jan-2024
        "%d-%B-%Y",  // 15-January-2024
        "%d/%m/%Y",  // European: 15/01/2024
        "%m/%d/%Y",  // US: 01/15/2024
        "%d.%m.%Y",  // German: 15.01.2024
        "%Y%m%d",    // Compact: 20240115
        "%b %d, %Y", // Jan 15, 2024
        "%B %d, %Y", // January 15, 2024
        "%d %b %Y",  // 15 Jan 2024
        "%d %B %Y",  // 15 January 2024
        "%a, %d %b %Y", // Mon, 15 Jan 2024
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Parses a date and time in one of the accepted formats.
///
/// Values carrying an offset are normalized to UTC; values without one
/// are taken as UTC.
pub fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = [
        "%Y-%m-%d %H:%M:%S%.f %z",
        "%Y-%m-%d %H:%M:%S %z",
        "%a, %d %b %Y %H:%M:%S %z", // RFC 2822
        "%d/%b/%Y:%H:%M:%S %z",     // Common log format
    ];
    for fmt in &offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(value, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d-%b-%Y %H:%M:%S", // 15-Jan-2024 10:30:00
        "%d-%b-%Y %H:%M",
        "%b %d %Y %H:%M:%S", // Jan 15 2024 10:30:00
        "%d/%m/%Y %H:%M:%S", // European
        "%d/%m/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S", // US
        "%m/%d/%Y %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_conversion_from_str() {
        assert_eq!("integer".parse::<Conversion>(), Ok(Conversion::Integer));
        assert_eq!("date_time".parse::<Conversion>(), Ok(Conversion::DateTime));
        assert_eq!("date-time".parse::<Conversion>(), Ok(Conversion::DateTime));
        assert!("wrong_type".parse::<Conversion>().is_err());
        assert!("Integer".parse::<Conversion>().is_err());
    }

    #[test]
    fn test_integer() {
        assert_eq!(
            Conversion::Integer.apply("1234".into()),
            FieldValue::Integer(1234)
        );
        assert_eq!(
            Conversion::Integer.apply(" -7 ".into()),
            FieldValue::Integer(-7)
        );
        assert_eq!(
            Conversion::Integer.apply("1.5".into()),
            FieldValue::from("1.5")
        );
    }

    #[test]
    fn test_float() {
        assert_eq!(
            Conversion::Float.apply("1234.5678".into()),
            FieldValue::Float(1234.5678)
        );
        assert_eq!(Conversion::Float.apply("inf".into()), FieldValue::from("inf"));
        assert_eq!(Conversion::Float.apply("abc".into()), FieldValue::from("abc"));
    }

    #[test]
    fn test_boolean() {
        assert_eq!(
            Conversion::Boolean.apply("TRUE".into()),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            Conversion::Boolean.apply(" false ".into()),
            FieldValue::Boolean(false)
        );
        assert_eq!(
            Conversion::Boolean.apply("yes".into()),
            FieldValue::from("yes")
        );
    }

    #[test]
    fn test_date() {
        assert_eq!(parse_date("2017-06-01"), Some(ts(2017, 6, 1, 0, 0, 0)));
        assert_eq!(parse_date("15-Jan-2024"), Some(ts(2024, 1, 15, 0, 0, 0)));
        assert_eq!(parse_date("Jan 15, 2024"), Some(ts(2024, 1, 15, 0, 0, 0)));
        assert_eq!(parse_date("invalid_date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn test_date_fallback_keeps_original() {
        assert_eq!(
            Conversion::Date.apply("invalid_date".into()),
            FieldValue::from("invalid_date")
        );
    }

    #[test]
    fn test_date_time() {
        assert_eq!(
            parse_date_time("2017-06-01 01:02:03"),
            Some(ts(2017, 6, 1, 1, 2, 3))
        );
        assert_eq!(
            parse_date_time("2017-06-01T01:02:03+02:00"),
            Some(ts(2017, 5, 31, 23, 2, 3))
        );
        assert_eq!(
            parse_date_time("10/Oct/2000:13:55:36 -0700"),
            Some(ts(2000, 10, 10, 20, 55, 36))
        );
        assert_eq!(parse_date_time("2017-06-01"), None);
        assert_eq!(parse_date_time("invalid_date_time"), None);
    }
}
