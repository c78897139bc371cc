//! Local calendar-date normalization.
//!
//! Event dates arrive as free text from whatever a Notion database or sheet
//! holds: ISO dates, US-style `M/D/YYYY`, full RFC 3339 timestamps, or
//! month-name forms. Everything is reduced to a [`NaiveDate`] so that day
//! arithmetic never sees a time of day or a UTC offset.
//!
//! Like the rest of the crate, nothing here reads the system clock. Callers
//! that need "today" convert their own instant with [`today_in_timezone`].

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::EngineError;

/// Datetime layouts accepted by the generic fallback (the time is dropped).
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Date layouts accepted by the generic fallback.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%a, %B %d, %Y",
    "%a %B %d %Y",
];

/// Parse an event date into a local calendar date.
///
/// Forms are tried in order:
///
/// 1. ISO `YYYY-MM-DD` (month and day may be one or two digits)
/// 2. US `M/D/YYYY`
/// 3. A generic fallback: RFC 3339 (keeping the date as written in its own
///    offset), ISO datetimes without an offset, `YYYY/MM/DD`, and month-name
///    forms such as `June 15, 2024` or `Sat, Jun 15, 2024`
///
/// # Errors
///
/// Returns [`EngineError::Unparseable`] when no form matches, or when the
/// input has the ISO/US shape but names a day that does not exist
/// (`2024-02-30`). Dates never roll over into the next month.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use countdown_engine::date::normalize_date;
///
/// let d = normalize_date("6/15/2024").unwrap();
/// assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
/// ```
pub fn normalize_date(raw: &str) -> Result<NaiveDate, EngineError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(EngineError::Unparseable("empty date".to_string()));
    }

    if let Some([year, month, day]) = numeric_triple(s, '-', [4..=4, 1..=2, 1..=2]) {
        return ymd(raw, year, month, day);
    }

    if let Some([month, day, year]) = numeric_triple(s, '/', [1..=2, 1..=2, 4..=4]) {
        return ymd(raw, year, month, day);
    }

    parse_fallback(s).ok_or_else(|| EngineError::Unparseable(format!("'{}'", raw.trim())))
}

/// The calendar date of `anchor` as seen on a wall clock in `timezone`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTimezone`] if `timezone` is not an IANA name.
pub fn today_in_timezone(anchor: DateTime<Utc>, timezone: &str) -> Result<NaiveDate, EngineError> {
    let tz = timezone
        .parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(format!("'{}'", timezone)))?;
    Ok(anchor.with_timezone(&tz).date_naive())
}

/// Format a date the way list rows show it, e.g. `Sat, Jun 15, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Split `s` on `sep` into exactly three all-digit parts with the given widths.
fn numeric_triple(s: &str, sep: char, widths: [RangeInclusive<usize>; 3]) -> Option<[u32; 3]> {
    let mut parts = s.split(sep);
    let mut out = [0u32; 3];
    for (slot, width) in out.iter_mut().zip(widths.iter()) {
        let part = parts.next()?;
        if !width.contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn ymd(raw: &str, year: u32, month: u32, day: u32) -> Result<NaiveDate, EngineError> {
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| EngineError::Unparseable(format!("'{}': no such day", raw.trim())))
}

fn parse_fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────
