//! Sort keys for post dates

use std::cmp::Ordering;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde_yaml::Value;

/// Date-time formats recognised in `date` strings; `%.f` also matches no fraction
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only formats, sorted as midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Comparable value of a post's `date`.
///
/// Keys of different kinds do not compare; a collection validates that all
/// of its keys share one kind before sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum DateKey {
    DateTime(NaiveDateTime),
    Number(f64),
    Text(String),
}

impl DateKey {
    /// Build the key for a metadata value
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(parse_date_string(s)
                .map(DateKey::DateTime)
                .unwrap_or_else(|| DateKey::Text(s.clone()))),
            Value::Number(n) => n
                .as_f64()
                .map(DateKey::Number)
                .ok_or_else(|| format!("number {} is out of range", n)),
            Value::Tagged(tagged) => DateKey::from_value(&tagged.value),
            Value::Null => Err("date is empty".to_string()),
            Value::Bool(b) => Err(format!("boolean {}", b)),
            Value::Sequence(_) => Err("a list".to_string()),
            Value::Mapping(_) => Err("a mapping".to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DateKey::DateTime(_) => "date",
            DateKey::Number(_) => "number",
            DateKey::Text(_) => "string",
        }
    }

    /// Compare two keys of the same kind
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (DateKey::DateTime(a), DateKey::DateTime(b)) => Some(a.cmp(b)),
            (DateKey::Number(a), DateKey::Number(b)) => Some(a.total_cmp(b)),
            (DateKey::Text(a), DateKey::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Parse a date string in various formats, normalising offsets to UTC.
///
/// Accepts the YAML timestamp forms: `T`, `t` or spaces between date and
/// time, an optional fraction, and an optional `Z` or `±hh[:mm]` zone that
/// may be preceded by spaces.
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Some((local, offset)) = split_zone(s) {
        let naive = parse_local(local)?;
        return FixedOffset::east_opt(offset)?
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.naive_utc());
    }

    if let Some(dt) = parse_local(s) {
        return Some(dt);
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Parse a date and time without zone
fn parse_local(s: &str) -> Option<NaiveDateTime> {
    let s = s
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replacen('t', "T", 1);

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
}

/// Split a trailing zone off a timestamp, returning the offset in seconds.
///
/// Only a zone following a time (a part containing `:`) counts, so the
/// dashes of a bare date are never taken for an offset.
fn split_zone(s: &str) -> Option<(&str, i32)> {
    if let Some(local) = s.strip_suffix(['Z', 'z']) {
        return local.contains(':').then_some((local.trim_end(), 0));
    }

    let sign_at = s.rfind(['+', '-'])?;
    let (local, zone) = s.split_at(sign_at);
    if !local.contains(':') {
        return None;
    }

    let (sign, digits) = zone.split_at(1);
    let (hours, minutes) = match digits.split_once(':') {
        Some(parts) => parts,
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    let valid = |part: &str| {
        (1..=2).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    if !valid(hours) || !valid(minutes) {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    let seconds = hours * 3600 + minutes * 60;
    let offset = if sign == "-" { -seconds } else { seconds };
    Some((local.trim_end(), offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(yaml: &str) -> DateKey {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        DateKey::from_value(&value).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date_string("2024-01-15 10:30:00").unwrap().to_string(),
            "2024-01-15 10:30:00"
        );
        assert_eq!(
            parse_date_string("2024/01/15").unwrap().to_string(),
            "2024-01-15 00:00:00"
        );
        assert_eq!(
            parse_date_string("2024-01-15T10:30:00+02:00")
                .unwrap()
                .to_string(),
            "2024-01-15 08:30:00"
        );
        assert!(parse_date_string("last tuesday").is_none());
    }

    #[test]
    fn test_parse_yaml_timestamps() {
        let parsed = |s: &str| parse_date_string(s).map(|dt| dt.to_string());

        assert_eq!(
            parsed("2024-01-15 10:30:00.5").as_deref(),
            Some("2024-01-15 10:30:00.500")
        );
        assert_eq!(
            parsed("2001-12-14 21:59:43.10 -5").as_deref(),
            Some("2001-12-15 02:59:43.100")
        );
        assert_eq!(
            parsed("2024-01-15 10:30:00 +02:00").as_deref(),
            Some("2024-01-15 08:30:00")
        );
        assert_eq!(
            parsed("2001-12-14t21:59:43.10-05:00").as_deref(),
            Some("2001-12-15 02:59:43.100")
        );
        assert_eq!(
            parsed("2001-12-15T02:59:43.1Z").as_deref(),
            Some("2001-12-15 02:59:43.100")
        );
        assert_eq!(
            parsed("2024-01-15   10:30:00+0530").as_deref(),
            Some("2024-01-15 05:00:00")
        );
    }

    #[test]
    fn test_zone_needs_a_time() {
        assert!(parse_date_string("2024-01-15 +02:00").is_none());
        assert!(parse_date_string("at 10:30-ish").is_none());
        assert!(parse_date_string("2024-01-15 10:30:00 +25").is_none());
    }

    #[test]
    fn test_offsets_compare_in_utc() {
        // 10:00 at +02:00 is earlier than 09:00 at +00:00
        let east = key("\"2024-01-15 10:00:00 +02:00\"");
        let utc = key("\"2024-01-15 09:00:00 Z\"");
        assert_eq!(east.kind(), "date");
        assert_eq!(east.compare(&utc), Some(Ordering::Less));
    }

    #[test]
    fn test_key_kinds() {
        assert_eq!(key("2024-01-02").kind(), "date");
        assert_eq!(key("1700000000").kind(), "number");
        assert_eq!(key("\"someday\"").kind(), "string");
    }

    #[test]
    fn test_invalid_values() {
        for yaml in ["~", "true", "[1, 2]", "{a: 1}"] {
            let value: Value = serde_yaml::from_str(yaml).unwrap();
            assert!(DateKey::from_value(&value).is_err(), "{}", yaml);
        }
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            key("2024-01-02").compare(&key("2024-01-01 23:59")),
            Some(Ordering::Greater)
        );
        assert_eq!(key("2").compare(&key("10")), Some(Ordering::Less));
        assert_eq!(key("2024-01-02").compare(&key("5")), None);
    }
}
