//! Utility functions for parsing capture times and clock corrections into chrono types.

use super::error::TimeError;
use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// The identity correction, used when the caller does not supply one.
pub const DEFAULT_CORRECTION: &str = "0:00";

static RE_CORRECTION: OnceLock<Regex> = OnceLock::new();

/// Parses a naive datetime string commonly found in EXIF (YYYY:MM:DD HH:MM:SS[.fff]).
pub fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
    ];

    let s = s.trim().trim_end_matches('\0');
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Parses a camera clock correction of the form `[±]H:MM` into a signed duration.
///
/// The sign is optional and applies to both the hours and the minutes, so `-1:30` is
/// ninety minutes back. Minutes may be written with one or two digits.
pub fn parse_correction(text: &str) -> Result<Duration, TimeError> {
    let invalid = || TimeError::InvalidCorrectionFormat(text.to_string());

    let re = RE_CORRECTION
        .get_or_init(|| Regex::new(r"^([+-])?(\d+):(\d+)$").expect("correction regex is valid"));
    let caps = re.captures(text.trim()).ok_or_else(invalid)?;

    let sign = if caps.get(1).is_some_and(|m| m.as_str() == "-") {
        -1
    } else {
        1
    };
    let hours = caps[2].parse::<i64>().map_err(|_| invalid())?;
    let minutes = caps[3].parse::<i64>().map_err(|_| invalid())?;

    let hours = Duration::try_hours(sign * hours).ok_or_else(invalid)?;
    let minutes = Duration::try_minutes(sign * minutes).ok_or_else(invalid)?;
    Ok(hours + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_negative_correction_applies_sign_to_both_parts() {
        assert_eq!(parse_correction("-1:30"), Ok(Duration::minutes(-90)));
    }

    #[test]
    fn test_single_digit_minutes() {
        assert_eq!(parse_correction("2:5"), Ok(Duration::minutes(125)));
    }

    #[test]
    fn test_explicit_plus_and_whitespace() {
        assert_eq!(parse_correction(" +0:45 "), Ok(Duration::minutes(45)));
    }

    #[test]
    fn test_default_correction_is_identity() {
        assert_eq!(parse_correction(DEFAULT_CORRECTION), Ok(Duration::zero()));
    }

    #[test]
    fn test_rejects_malformed_corrections() {
        for bad in ["bogus", "", "-", "+:30", "1:", ":30", "1:2:3", "1.5:00", "a:10", "1 : 30"] {
            assert_eq!(
                parse_correction(bad),
                Err(TimeError::InvalidCorrectionFormat(bad.to_string())),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_naive_exif_format() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 5, 0)
            .unwrap();
        assert_eq!(parse_naive("2024:05:01 10:05:00"), Some(expected));
        assert_eq!(parse_naive("2024:05:01 10:05:00\0"), Some(expected));
        assert_eq!(parse_naive("2024-05-01 10:05:00"), Some(expected));
    }

    #[test]
    fn test_parse_naive_rejects_garbage() {
        assert_eq!(parse_naive("0000:00:00 00:00:00"), None);
        assert_eq!(parse_naive(""), None);
    }
}
