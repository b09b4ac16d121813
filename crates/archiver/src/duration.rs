//! Relative duration parsing for age bounds.
//!
//! Age bounds are written the way people say them: `"2 years"`, `"7d"`,
//! `"1.5 hours"`. The accepted grammar is
//!
//! ```text
//! [-][digits][.]digits [spaces] [unit]
//! ```
//!
//! where a missing unit means milliseconds and a year is 365.25 days.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = SECOND_MS * 60.0;
const HOUR_MS: f64 = MINUTE_MS * 60.0;
const DAY_MS: f64 = HOUR_MS * 24.0;
const WEEK_MS: f64 = DAY_MS * 7.0;
const YEAR_MS: f64 = DAY_MS * 365.25;

/// Longest input accepted, anything longer is rejected outright.
pub const MAX_DURATION_INPUT_LEN: usize = 100;

/// Errors produced while parsing a relative duration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("duration is empty")]
    Empty,

    #[error("duration is longer than {MAX_DURATION_INPUT_LEN} characters")]
    TooLong,

    #[error("invalid number in duration \"{input}\"")]
    InvalidNumber { input: String },

    #[error("unknown duration unit \"{unit}\"")]
    UnknownUnit { unit: String },

    #[error("duration \"{input}\" is out of range")]
    OutOfRange { input: String },
}

/// Milliseconds per unit, matched case-insensitively.
fn unit_ms(unit: &str) -> Option<f64> {
    let ms = match unit.to_ascii_lowercase().as_str() {
        "" | "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1.0,
        "s" | "sec" | "secs" | "second" | "seconds" => SECOND_MS,
        "m" | "min" | "mins" | "minute" | "minutes" => MINUTE_MS,
        "h" | "hr" | "hrs" | "hour" | "hours" => HOUR_MS,
        "d" | "day" | "days" => DAY_MS,
        "w" | "week" | "weeks" => WEEK_MS,
        "y" | "yr" | "yrs" | "year" | "years" => YEAR_MS,
        _ => return None,
    };
    Some(ms)
}

/// Split `input` into its numeric prefix and the rest.
///
/// The numeric prefix is an optional `-`, optional integer digits, an
/// optional `.` and at least one trailing digit.
fn split_number(input: &str) -> Option<(&str, &str)> {
    let bytes = input.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    let number = &input[digits_start..end];
    let valid = !number.is_empty()
        && number.matches('.').count() <= 1
        && number.as_bytes().last().is_some_and(u8::is_ascii_digit);
    valid.then(|| input.split_at(end))
}

/// Parse a relative duration such as `"2 years"` or `"36h"`.
pub fn parse_relative_duration(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if trimmed.len() > MAX_DURATION_INPUT_LEN {
        return Err(DurationParseError::TooLong);
    }

    let (number, rest) =
        split_number(trimmed).ok_or_else(|| DurationParseError::InvalidNumber {
            input: input.to_string(),
        })?;
    let value: f64 = number
        .parse()
        .map_err(|_| DurationParseError::InvalidNumber {
            input: input.to_string(),
        })?;

    let unit = rest.trim_start_matches(' ');
    let per_unit = unit_ms(unit).ok_or_else(|| DurationParseError::UnknownUnit {
        unit: unit.to_string(),
    })?;

    let millis = (value * per_unit).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return Err(DurationParseError::OutOfRange {
            input: input.to_string(),
        });
    }

    Duration::try_milliseconds(millis as i64).ok_or_else(|| DurationParseError::OutOfRange {
        input: input.to_string(),
    })
}

/// Resolve a relative duration to the instant that far before `now`.
pub fn instant_before(now: DateTime<Utc>, input: &str) -> Result<DateTime<Utc>, DurationParseError> {
    let ago = parse_relative_duration(input)?;
    now.checked_sub_signed(ago)
        .ok_or_else(|| DurationParseError::OutOfRange {
            input: input.to_string(),
        })
}
