// logscan - core/timestamp.rs
//
// Timestamp extraction from the fixed-width prefix of a log line.
//
// Detection runs once per scan, on the first line long enough to carry a
// prefix; every later line is parsed with the detected format and never
// re-detected, even if its prefix would imply a different layout. That
// imprecision is accepted: mixed-format files are not a supported input.

use crate::core::model::TimestampFormat;
use crate::util::constants::TIMESTAMP_PREFIX_LEN;
use chrono::{DateTime, NaiveDateTime, Utc};

/// chrono layout strings for each recognised format.
///
/// Only the dash-separated layouts are parsed. A prefix that detected via
/// `.` or `/` separators will fail to parse and the line is simply treated
/// as having no timestamp.
fn chrono_layout(format: TimestampFormat) -> &'static str {
    match format {
        TimestampFormat::YmdHms => "%Y-%m-%d %H:%M:%S",
        TimestampFormat::DmyHms => "%d-%m-%Y %H:%M:%S",
        TimestampFormat::MdyHms => "%m-%d-%Y %H:%M:%S",
    }
}

/// True for the separator bytes accepted between date fields.
fn is_date_separator(b: u8) -> bool {
    matches!(b, b'-' | b'.' | b'/')
}

/// True when `bytes` is entirely ASCII digits.
fn all_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

/// Detect the timestamp format of a line prefix.
///
/// Checks the four-digit-year layout first (most common in logs), then the
/// two-digit-first layout. A two-digit-first prefix is ambiguous between
/// day-first and month-first; day-first wins by policy, and the month-first
/// layout is reachable only via the `--date-format mdy` override.
///
/// Returns `None` when the prefix matches neither shape.
pub fn detect_format(prefix: &[u8]) -> Option<TimestampFormat> {
    if prefix.len() < 10 {
        return None;
    }

    // YYYY?MM?DD with any accepted separator
    if all_digits(&prefix[0..4])
        && is_date_separator(prefix[4])
        && all_digits(&prefix[5..7])
        && is_date_separator(prefix[7])
        && all_digits(&prefix[8..10])
    {
        return Some(TimestampFormat::YmdHms);
    }

    // DD?MM?YYYY with any accepted separator
    if all_digits(&prefix[0..2])
        && is_date_separator(prefix[2])
        && all_digits(&prefix[3..5])
        && is_date_separator(prefix[5])
        && all_digits(&prefix[6..10])
    {
        return Some(TimestampFormat::DmyHms);
    }

    None
}

/// Parse a 19-byte prefix with a known format into a UTC instant.
///
/// Parsing is strict: any out-of-range field or non-numeric byte yields
/// `None`. Calendar fields are interpreted as UTC directly; no timezone
/// inference or local-time conversion is performed.
pub fn parse_timestamp(prefix: &[u8], format: TimestampFormat) -> Option<DateTime<Utc>> {
    if prefix.len() != TIMESTAMP_PREFIX_LEN {
        return None;
    }
    let text = std::str::from_utf8(prefix).ok()?;
    NaiveDateTime::parse_from_str(text, chrono_layout(format))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Extract and parse the timestamp from a full log line.
///
/// Returns `None` when the line is too short to carry a prefix or the
/// prefix fails to parse. Operates on the first `TIMESTAMP_PREFIX_LEN`
/// bytes only; no allocation.
pub fn extract_timestamp(line: &[u8], format: TimestampFormat) -> Option<DateTime<Utc>> {
    if line.len() < TIMESTAMP_PREFIX_LEN {
        return None;
    }
    parse_timestamp(&line[..TIMESTAMP_PREFIX_LEN], format)
}
