//! Time bound expressions (`--since` / `--until`)
//!
//! An all-digit expression is taken as epoch seconds. Anything else must be a
//! timestamp; naive timestamps and bare dates are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::error::{Error, Result};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an optional bound; `option` names the flag for error messages.
pub fn parse_time_bound(option: &str, raw: Option<&str>) -> Result<Option<i64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::invalid_time(option, raw));
    }

    parse_timestamp(value)
        .map(Some)
        .ok_or_else(|| Error::invalid_time(option, raw))
}

fn parse_timestamp(value: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc().timestamp());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp())
}

/// ISO-8601 rendering of a send time; zero means unknown.
pub fn to_iso(unix: i64) -> Option<String> {
    if unix == 0 {
        return None;
    }
    Utc.timestamp_opt(unix, 0)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_bound() {
        assert_eq!(parse_time_bound("--since", None).unwrap(), None);
    }

    #[test]
    fn test_blank_bound_is_absent() {
        assert_eq!(parse_time_bound("--since", Some("")).unwrap(), None);
        assert_eq!(parse_time_bound("--until", Some("   ")).unwrap(), None);
    }

    #[test]
    fn test_epoch_seconds() {
        assert_eq!(
            parse_time_bound("--since", Some("1700000000")).unwrap(),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_bare_date_is_utc_midnight() {
        assert_eq!(
            parse_time_bound("--since", Some("2024-01-01")).unwrap(),
            Some(1_704_067_200)
        );
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(
            parse_time_bound("--until", Some("2024-01-01T09:00:00+09:00")).unwrap(),
            Some(1_704_067_200)
        );
        assert_eq!(
            parse_time_bound("--until", Some("2024-01-01T00:00:00Z")).unwrap(),
            Some(1_704_067_200)
        );
    }

    #[test]
    fn test_naive_timestamps_truncate_fraction() {
        assert_eq!(
            parse_time_bound("--since", Some("2024-01-01T00:00:01.999")).unwrap(),
            Some(1_704_067_201)
        );
        assert_eq!(
            parse_time_bound("--since", Some("2024-01-01 00:01")).unwrap(),
            Some(1_704_067_260)
        );
    }

    #[test]
    fn test_unparsable_expression() {
        let err = parse_time_bound("--since", Some("last tuesday")).unwrap_err();
        match err {
            Error::InvalidTime { option, value } => {
                assert_eq!(option, "--since");
                assert_eq!(value, "last tuesday");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_number_is_not_epoch() {
        assert!(parse_time_bound("--until", Some("-5")).is_err());
    }

    #[test]
    fn test_to_iso() {
        assert_eq!(to_iso(0), None);
        assert_eq!(to_iso(1_704_067_200).as_deref(), Some("2024-01-01T00:00:00.000Z"));
    }
}
