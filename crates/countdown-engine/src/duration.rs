//! Day counts for countdown and since displays.
//!
//! Countdown events recur yearly (birthdays, anniversaries), so
//! [`days_until`] projects the event onto the current year and wraps to the
//! next one once the date has passed. Since events count forward from a fixed
//! past date with no projection.
//!
//! All arithmetic is on [`NaiveDate`]s, so a DST change between the event and
//! today cannot shift the count by a day.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date::normalize_date;

/// Returned by [`days_until_raw`] for an unparseable date so it never wins a
/// "soonest" comparison.
pub const UNPARSEABLE_UNTIL: i64 = 99_999;

/// Returned by [`days_since_raw`] for an unparseable date so it never wins a
/// "longest since" comparison.
pub const UNPARSEABLE_SINCE: i64 = -99_999;

/// The same month and day as `date`, in `year`.
///
/// February 29 becomes March 1 in common years.
pub fn project_into_year(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(date)
}

/// The next yearly occurrence of `date` on or after `today`.
pub fn next_occurrence(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    let this_year = project_into_year(date, today.year());
    if this_year < today {
        project_into_year(date, today.year() + 1)
    } else {
        this_year
    }
}

/// Days from `today` until the next yearly occurrence of `date`.
///
/// Always in `0..366`; `0` means the occurrence is today.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use countdown_engine::duration::days_until;
///
/// let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
/// assert_eq!(days_until(birthday, today), 45);
/// ```
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (next_occurrence(date, today) - today).num_days()
}

/// Days elapsed from `date` to `today`; negative when `date` is in the future.
pub fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days()
}

/// [`days_until`] on a raw date string, or [`UNPARSEABLE_UNTIL`].
pub fn days_until_raw(raw: &str, today: NaiveDate) -> i64 {
    match normalize_date(raw) {
        Ok(date) => days_until(date, today),
        Err(e) => {
            log::debug!("days_until: {e}");
            UNPARSEABLE_UNTIL
        }
    }
}

/// [`days_since`] on a raw date string, or [`UNPARSEABLE_SINCE`].
pub fn days_since_raw(raw: &str, today: NaiveDate) -> i64 {
    match normalize_date(raw) {
        Ok(date) => days_since(date, today),
        Err(e) => {
            log::debug!("days_since: {e}");
            UNPARSEABLE_SINCE
        }
    }
}

// ── Age ─────────────────────────────────────────────────────────────────────

/// Age of a yearly-recurring date (a birthday or an anniversary) on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgeInfo {
    /// Whole years completed as of today.
    pub completed_years: i32,
    /// The age reached at the next anniversary, counting today.
    ///
    /// Equal to `completed_years` on the anniversary itself, otherwise one more.
    pub turning: i32,
    /// Completed years plus the elapsed fraction of the current year of age.
    pub decimal_age: f64,
    /// Whether today is the anniversary.
    pub is_anniversary: bool,
}

/// Compute the [`AgeInfo`] of `birth` as of `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> AgeInfo {
    let this_year = project_into_year(birth, today.year());
    let last_year = if this_year <= today {
        today.year()
    } else {
        today.year() - 1
    };
    let completed_years = last_year - birth.year();

    let last = project_into_year(birth, last_year);
    let next = project_into_year(birth, last_year + 1);
    let span = (next - last).num_days() as f64;
    let elapsed = (today - last).num_days() as f64;

    let is_anniversary = this_year == today;
    let turning = if is_anniversary {
        completed_years
    } else {
        completed_years + 1
    };

    AgeInfo {
        completed_years,
        turning,
        decimal_age: completed_years as f64 + elapsed / span,
        is_anniversary,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
