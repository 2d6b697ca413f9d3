//! Time-of-day parsing and formatting.
//!
//! Converts free-form clock strings (12-hour and 24-hour) to minutes since
//! midnight and back to canonical forms. This is the leaf module of the
//! engine — every other component resolves times through it.
//!
//! # Accepted Input
//!
//! - 12-hour: `"6:05 AM"`, `"6 AM"`, `"6PM"` — hour 1–12, minute 0–59
//! - 24-hour: `"06:00"`, `"18:30"` — hour 0–23, minute 0–59, colon required
//!
//! Anything else (including out-of-range components such as `"24:00"` or
//! `"13 PM"`) yields `None`. Parsing never panics.

use serde::{Deserialize, Serialize};

/// Minutes in a full day.
pub const MINUTES_PER_DAY: i32 = 1440;

/// Parses a free-form time string to minutes since midnight.
///
/// Returns `None` for anything that is not a well-formed 12-hour or
/// 24-hour clock time.
pub fn parse_time_to_minutes(text: &str) -> Option<i32> {
    let lower = text.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some(body) = lower.strip_suffix("am") {
        return parse_12h(body.trim_end(), false);
    }
    if let Some(body) = lower.strip_suffix("pm") {
        return parse_12h(body.trim_end(), true);
    }
    parse_24h(&lower)
}

/// Formats minutes since midnight as a canonical zero-padded 24-hour string.
///
/// Input is wrapped modulo 1440, so negative and past-midnight values
/// produce a valid clock time rather than an error.
pub fn minutes_to_hhmm(minutes: i32) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Formats minutes since midnight as a human-readable 12-hour string.
///
/// Returns an empty string for `None`.
pub fn format_minutes_to_12h(minutes: Option<i32>) -> String {
    let Some(minutes) = minutes else {
        return String::new();
    };
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    let (hour, minute) = (wrapped / 60, wrapped % 60);
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minute:02} {meridiem}")
}

/// Re-formats an `HH:MM` (or any parseable) time string in 12-hour form.
///
/// Returns an empty string when the input does not parse.
pub fn format_hhmm_to_12h(text: &str) -> String {
    format_minutes_to_12h(parse_time_to_minutes(text))
}

/// Classification of a raw time-field input.
///
/// Lets callers distinguish "no time" from "intentional text override"
/// from "malformed input" without any error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum TimeInput {
    /// Blank input.
    Empty,
    /// A valid clock time, carried in canonical `HH:MM` form.
    Time(String),
    /// A non-time text override (e.g. `"OFF"`). Only produced when the
    /// caller opts in and the input carries no time-like characters.
    Text(String),
    /// Looks time-like but fails validation (e.g. `"24:00"`, `"13 PM"`).
    InvalidTime,
}

/// Classifies a raw time-field input.
///
/// `allow_text` enables the [`TimeInput::Text`] variant for strings that
/// contain no digit, no colon, and no meridiem marker.
pub fn classify_time_input(text: &str, allow_text: bool) -> TimeInput {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return TimeInput::Empty;
    }
    if let Some(minutes) = parse_time_to_minutes(trimmed) {
        return TimeInput::Time(minutes_to_hhmm(minutes));
    }
    if allow_text && !looks_time_like(trimmed) {
        return TimeInput::Text(trimmed.to_string());
    }
    TimeInput::InvalidTime
}

fn looks_time_like(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.chars().any(|c| c.is_ascii_digit() || c == ':')
        || lower.contains("am")
        || lower.contains("pm")
}

fn parse_12h(body: &str, pm: bool) -> Option<i32> {
    let (hour, minute) = match body.split_once(':') {
        Some((h, m)) => (parse_hour(h)?, parse_minute(m)?),
        None => (parse_hour(body)?, 0),
    };
    if !(1..=12).contains(&hour) || !(0..=59).contains(&minute) {
        return None;
    }
    let hour24 = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some(hour24 * 60 + minute)
}

fn parse_24h(body: &str) -> Option<i32> {
    let (h, m) = body.split_once(':')?;
    let hour = parse_hour(h)?;
    let minute = parse_minute(m)?;
    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return None;
    }
    Some(hour * 60 + minute)
}

/// One or two ASCII digits, nothing else.
fn parse_hour(text: &str) -> Option<i32> {
    if text.is_empty() || text.len() > 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Exactly two ASCII digits.
fn parse_minute(text: &str) -> Option<i32> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
