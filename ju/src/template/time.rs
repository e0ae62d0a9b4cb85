//! Timestamp helpers for `age` and `dateFormat`
//!
//! The tracker API emits timestamps like `2024-03-01T09:30:00.000+0100`.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::debug;

use crate::error::{Result, UtilError};

/// strftime equivalent of `YYYY-MM-DDTHH:MM:SS.mmm±HHMM`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Byte length of `YYYY-MM-DDTHH:MM:SS.mmm±HHMM`
const TIMESTAMP_LEN: usize = 28;

/// Parse a tracker timestamp
///
/// chrono treats the fraction as optional and accepts `±HH:MM` offsets, so
/// the milliseconds and the colon-free offset are checked up front.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    if !has_timestamp_shape(input) {
        return Err(UtilError::TimestampLayout {
            input: input.to_string(),
        });
    }
    DateTime::parse_from_str(input, TIMESTAMP_FORMAT).map_err(|source| UtilError::Timestamp {
        input: input.to_string(),
        source,
    })
}

fn has_timestamp_shape(input: &str) -> bool {
    let b = input.as_bytes();
    b.len() == TIMESTAMP_LEN
        && b[19] == b'.'
        && b[20..23].iter().all(u8::is_ascii_digit)
        && matches!(b[23], b'+' | b'-')
        && b[24..].iter().all(u8::is_ascii_digit)
}

/// Fuzzy age of `start` relative to now
pub fn fuzzy_age(start: &str) -> Result<String> {
    fuzzy_age_at(start, Utc::now())
}

/// Fuzzy age of `start` relative to `now`
pub fn fuzzy_age_at(start: &str, now: DateTime<Utc>) -> Result<String> {
    let then = parse_timestamp(start)?;
    Ok(describe_elapsed(now.signed_duration_since(then)))
}

fn describe_elapsed(delta: TimeDelta) -> String {
    let minutes = delta.num_milliseconds() as f64 / 60_000.0;
    let hours = minutes / 60.0;

    if minutes < 2.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes as i64)
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 24.0 {
        format!("{} hours", hours as i64)
    } else if hours < 48.0 {
        "a day".to_string()
    } else {
        format!("{} days", (hours / 24.0) as i64)
    }
}

/// Re-render a tracker timestamp with `layout`
///
/// Layouts containing `%` are strftime patterns. Anything else is read as a
/// Go reference layout (`Mon Jan 2 15:04:05 MST 2006`).
pub fn date_format(layout: &str, input: &str) -> Result<String> {
    debug!(%layout, %input, "date_format: called");
    let when = parse_timestamp(input)?;

    let pattern = if layout.contains('%') {
        layout.to_string()
    } else {
        reference_to_strftime(layout, when.timestamp_subsec_nanos())
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(&pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(UtilError::InvalidLayout {
            layout: layout.to_string(),
        });
    }

    let mut out = String::new();
    write!(out, "{}", when.format_with_items(items.into_iter())).map_err(|_| UtilError::InvalidLayout {
        layout: layout.to_string(),
    })?;
    Ok(out)
}

// Trimmed fractions are rendered from the timestamp itself, strftime has no
// equivalent. Digit count of each token.
const TRIMMED_FRACTIONS: &[(&str, usize)] = &[(".999999999", 9), (".999999", 6), (".999", 3)];

// Longest tokens first so `January` wins over `Jan` and `2006` over `2`
const REFERENCE_TOKENS: &[(&str, &str)] = &[
    ("January", "%B"),
    ("Monday", "%A"),
    ("Jan", "%b"),
    ("Mon", "%a"),
    ("MST", "%Z"),
    ("2006", "%Y"),
    ("-07:00", "%:z"),
    ("Z07:00", "%:z"),
    ("-0700", "%z"),
    ("Z0700", "%z"),
    ("-07", "%:::z"),
    ("Z07", "%:::z"),
    (".000000000", "%.9f"),
    (".000000", "%.6f"),
    (".000", "%.3f"),
    ("__2", "%_j"),
    ("002", "%j"),
    ("06", "%y"),
    ("01", "%m"),
    ("02", "%d"),
    ("_2", "%e"),
    ("15", "%H"),
    ("03", "%I"),
    ("04", "%M"),
    ("05", "%S"),
    ("PM", "%p"),
    ("pm", "%P"),
    ("1", "%-m"),
    ("2", "%-d"),
    ("3", "%-I"),
    ("4", "%-M"),
    ("5", "%-S"),
];

fn reference_to_strftime(layout: &str, nanos: u32) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;

    'outer: while let Some(c) = rest.chars().next() {
        for &(token, digits) in TRIMMED_FRACTIONS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(&trimmed_fraction(nanos, digits));
                rest = tail;
                continue 'outer;
            }
        }
        for (token, strftime) in REFERENCE_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(strftime);
                rest = tail;
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// `.` and the first `digits` fractional digits with trailing zeros dropped,
/// or nothing when they are all zero
fn trimmed_fraction(nanos: u32, digits: usize) -> String {
    let full = format!("{:09}", nanos);
    let kept = full[..digits].trim_end_matches('0');
    if kept.is_empty() {
        String::new()
    } else {
        format!(".{}", kept)
    }
}
