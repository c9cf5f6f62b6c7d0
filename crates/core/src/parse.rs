//! Time expression grammar: a small fixed set of phrasings, matched in
//! priority order. Keyword checks are substring matches, not word-boundary
//! matches, mirroring how senders actually type ("sat", "worked8:00till...").

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::domain::shift::ShiftRecord;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ShiftParseError {
    #[error("message does not contain a recognizable time range")]
    NoTimeRange,
    #[error("`{0}` is not a valid 24-hour time")]
    InvalidTime(String),
}

const STANDARD_DAY_TOKENS: [&str; 2] = ["normal", "standard"];
const WEEKEND_TOKENS: [&str; 3] = ["saturday", "sunday", "weekend"];

fn time_range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{1,2}:\d{2})\s*(?:till?|to|until|-)\s*(\d{1,2}:\d{2})")
            .expect("time range pattern compiles")
    })
}

/// Parses a normalized (lowercased, trimmed) utterance into a computed shift.
/// First match wins: standard day, then weekend, then an explicit time range.
pub fn parse_shift_message(
    message: &str,
    today: NaiveDate,
) -> Result<ShiftRecord, ShiftParseError> {
    if STANDARD_DAY_TOKENS.iter().any(|token| message.contains(token)) {
        return Ok(ShiftRecord::standard_day(today));
    }

    if WEEKEND_TOKENS.iter().any(|token| message.contains(token)) {
        return Ok(ShiftRecord::weekend(today));
    }

    let captures = time_range_pattern().captures(message).ok_or(ShiftParseError::NoTimeRange)?;
    let start_time = parse_24h_time(&captures[1])?;
    let end_time = parse_24h_time(&captures[2])?;

    Ok(ShiftRecord::weekday(start_time, end_time, today))
}

fn parse_24h_time(text: &str) -> Result<NaiveTime, ShiftParseError> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .map_err(|_| ShiftParseError::InvalidTime(text.to_owned()))
}
