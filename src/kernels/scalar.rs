//! This module contains the pure, stateless kernels for scalar coercion.
//!
//! Every kernel here is total: on input it cannot interpret it returns `None`
//! rather than an error, which callers surface as JSON `null`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};

/// The one datetime representation that leaves the pipeline.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

//==================================================================================
// 1. Character Cleaning
//==================================================================================

/// C0 controls, DEL and C1 controls.
fn is_control_range(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

/// Undoes the classic "UTF-8 bytes read as Latin-1" mojibake.
///
/// Only applies when every char fits in one Latin-1 byte and the resulting bytes
/// are valid UTF-8; otherwise the input is already sane and is returned as-is.
fn repair_latin1_mojibake(s: &str) -> Option<String> {
    if !s.chars().any(|c| c as u32 >= 0x80) {
        return None;
    }
    let bytes: Option<Vec<u8>> = s
        .chars()
        .map(|c| u8::try_from(c as u32).ok())
        .collect();
    String::from_utf8(bytes?).ok()
}

/// Memo fields keep their spacing; only control characters are removed.
pub fn memo_string(s: &str) -> String {
    s.chars().filter(|&c| !is_control_range(c)).collect()
}

/// Removes control characters, repairs Latin-1 mojibake, drops anything still
/// non-printable and trims surrounding whitespace.
pub fn clean_string(s: &str) -> String {
    let cleaned = memo_string(s);
    let repaired = repair_latin1_mojibake(&cleaned).unwrap_or(cleaned);
    repaired
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

//==================================================================================
// 2. Numeric and Boolean Parsing
//==================================================================================

/// Converts a float to an integer by truncation, if it is finite and in range.
pub fn float_to_int(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let truncated = f.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Parses an integer. Integral float text such as `"3.0"` is accepted;
/// fractional text is not.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    let f = s.parse::<f64>().ok()?;
    if f.fract() != 0.0 {
        return None;
    }
    float_to_int(f)
}

/// Parses a finite float; `NaN` and infinities become `None`.
pub fn parse_float(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

//==================================================================================
// 3. Datetime Parsing and Formatting
//==================================================================================

/// Drops sub-second precision.
pub fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Parses the datetime spellings the source store and its `CAST(... AS VARCHAR)`
/// produce. Offsets are discarded and the wall-clock time is kept.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATETIME_INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(truncate_to_seconds(dt));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(truncate_to_seconds(dt.naive_local()));
    }
    for format in DATE_INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
