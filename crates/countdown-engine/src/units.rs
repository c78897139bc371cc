//! Turning day counts into a value and a unit noun.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// Average month length used for month and year conversions.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Average year length used for explicit year overrides.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Day counts at or above this switch from days to months/years when no
/// unit is forced.
pub const LONG_SPAN_DAYS: u64 = 1000;

/// Shown instead of a number when a countdown lands on today.
pub const TODAY_COUNTDOWN: &str = "Today!";

/// Shown instead of a number when a since date is today.
pub const TODAY_SINCE: &str = "Today";

/// A display unit for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    /// Parse a unit keyword from a widget parameter.
    ///
    /// Short and pre-pluralized aliases (`wk`, `wks`, `mo`, `yr`, `yrs`, `hr`,
    /// `hrs`, `min`) map to the canonical unit.
    pub fn from_keyword(s: &str) -> Option<TimeUnit> {
        match s {
            "minutes" | "min" => Some(TimeUnit::Minutes),
            "hours" | "hrs" | "hr" => Some(TimeUnit::Hours),
            "days" => Some(TimeUnit::Days),
            "weeks" | "wk" | "wks" => Some(TimeUnit::Weeks),
            "months" | "mo" => Some(TimeUnit::Months),
            "years" | "yr" | "yrs" => Some(TimeUnit::Years),
            _ => None,
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            TimeUnit::Minutes => "minute",
            TimeUnit::Hours => "hour",
            TimeUnit::Days => "day",
            TimeUnit::Weeks => "week",
            TimeUnit::Months => "month",
            TimeUnit::Years => "year",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }

    /// Whether values in this unit keep two decimals.
    pub fn is_fractional(self) -> bool {
        matches!(self, TimeUnit::Weeks | TimeUnit::Months | TimeUnit::Years)
    }

    /// Convert a day count into this unit.
    pub fn convert_days(self, days: f64) -> f64 {
        match self {
            TimeUnit::Minutes => days * 24.0 * 60.0,
            TimeUnit::Hours => days * 24.0,
            TimeUnit::Days => days,
            TimeUnit::Weeks => days / 7.0,
            TimeUnit::Months => days / DAYS_PER_MONTH,
            TimeUnit::Years => days / DAYS_PER_YEAR,
        }
    }
}

/// A formatted duration ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedDuration {
    /// The number, e.g. `"12"` or `"2.74"`.
    pub value: String,
    /// The unit noun, singular when `value` is exactly `1`.
    pub unit: String,
    /// `"left"` for countdowns.
    pub suffix: Option<String>,
}

impl std::fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)?;
        if let Some(suffix) = &self.suffix {
            write!(f, " {suffix}")?;
        }
        Ok(())
    }
}

/// Format a signed day count.
///
/// The sign is dropped. Without an override, counts below 1000 days stay in
/// days; longer spans become months (`days / 30.44`) and then years once
/// that reaches 12 months. An override converts with fixed ratios
/// (1 day = 24 h = 1440 min, 7 days a week, 30.44 a month, 365.25 a year).
///
/// Minutes, hours and days round to whole numbers. Weeks, months and years
/// keep two decimals with a trailing `.00` trimmed.
///
/// # Examples
///
/// ```
/// use countdown_engine::mode::Mode;
/// use countdown_engine::units::{format_duration, TimeUnit};
///
/// assert_eq!(format_duration(1, Mode::Countdown, None).to_string(), "1 day left");
/// assert_eq!(format_duration(10, Mode::Since, Some(TimeUnit::Weeks)).to_string(), "1.43 weeks");
/// ```
pub fn format_duration(
    days: i64,
    mode: Mode,
    unit_override: Option<TimeUnit>,
) -> FormattedDuration {
    let abs_days = days.unsigned_abs();
    let (value, unit) = match unit_override {
        Some(unit) => (unit.convert_days(abs_days as f64), unit),
        None => automatic_unit(abs_days),
    };

    let value = if unit.is_fractional() {
        two_decimals(value)
    } else {
        format!("{}", value.round() as i64)
    };
    let unit = if value == "1" {
        unit.singular()
    } else {
        unit.plural()
    };

    FormattedDuration {
        value,
        unit: unit.to_string(),
        suffix: match mode {
            Mode::Countdown => Some("left".to_string()),
            Mode::Since => None,
        },
    }
}

/// The word shown when the day count is zero.
pub fn today_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Countdown => TODAY_COUNTDOWN,
        Mode::Since => TODAY_SINCE,
    }
}

/// One-line text for a day count: `Today!`, `12 days left`, `3.5 weeks`.
pub fn describe_days(days: i64, mode: Mode, unit_override: Option<TimeUnit>) -> String {
    if days == 0 {
        today_label(mode).to_string()
    } else {
        format_duration(days, mode, unit_override).to_string()
    }
}

fn automatic_unit(abs_days: u64) -> (f64, TimeUnit) {
    if abs_days < LONG_SPAN_DAYS {
        return (abs_days as f64, TimeUnit::Days);
    }
    let months = abs_days as f64 / DAYS_PER_MONTH;
    if months >= 12.0 {
        (months / 12.0, TimeUnit::Years)
    } else {
        (months, TimeUnit::Months)
    }
}

fn two_decimals(value: f64) -> String {
    let s = format!("{value:.2}");
    match s.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(days: i64, mode: Mode, unit: Option<TimeUnit>) -> String {
        format_duration(days, mode, unit).to_string()
    }

    #[test]
    fn test_singular_day() {
        let f = format_duration(1, Mode::Countdown, None);
        assert_eq!(f.value, "1");
        assert_eq!(f.unit, "day");
        assert_eq!(f.suffix.as_deref(), Some("left"));
    }

    #[test]
    fn test_plural_days() {
        assert_eq!(fmt(2, Mode::Countdown, None), "2 days left");
        assert_eq!(fmt(999, Mode::Countdown, None), "999 days left");
    }

    #[test]
    fn test_since_has_no_suffix() {
        let f = format_duration(12, Mode::Since, None);
        assert_eq!(f.suffix, None);
        assert_eq!(f.to_string(), "12 days");
    }

    #[test]
    fn test_sign_is_dropped() {
        assert_eq!(fmt(-10, Mode::Since, None), "10 days");
    }

    #[test]
    fn test_long_span_escalates_to_years() {
        // 1000 / 30.44 / 12 = 2.7377...
        assert_eq!(fmt(1000, Mode::Since, None), "2.74 years");
    }

    #[test]
    fn test_whole_years_trim_decimals() {
        // 1461 / 30.44 / 12 = 3.9997... rounds to 4.00
        assert_eq!(fmt(1461, Mode::Since, None), "4 years");
    }

    #[test]
    fn test_week_override() {
        assert_eq!(fmt(14, Mode::Since, Some(TimeUnit::Weeks)), "2 weeks");
        assert_eq!(fmt(7, Mode::Since, Some(TimeUnit::Weeks)), "1 week");
        assert_eq!(fmt(10, Mode::Since, Some(TimeUnit::Weeks)), "1.43 weeks");
    }

    #[test]
    fn test_hour_and_minute_override() {
        assert_eq!(fmt(2, Mode::Since, Some(TimeUnit::Hours)), "48 hours");
        assert_eq!(fmt(1, Mode::Since, Some(TimeUnit::Minutes)), "1440 minutes");
    }

    #[test]
    fn test_month_override() {
        // 61 / 30.44 = 2.0039
        assert_eq!(fmt(61, Mode::Since, Some(TimeUnit::Months)), "2 months");
        assert_eq!(fmt(45, Mode::Since, Some(TimeUnit::Months)), "1.48 months");
    }

    #[test]
    fn test_year_override_rounds_to_singular() {
        // 365 / 365.25 = 0.9993 -> "1.00" -> "1"
        let f = format_duration(365, Mode::Since, Some(TimeUnit::Years));
        assert_eq!(f.value, "1");
        assert_eq!(f.unit, "year");
    }

    #[test]
    fn test_day_override_rounds() {
        assert_eq!(fmt(3, Mode::Countdown, Some(TimeUnit::Days)), "3 days left");
    }

    #[test]
    fn test_unit_keywords() {
        assert_eq!(TimeUnit::from_keyword("yrs"), Some(TimeUnit::Years));
        assert_eq!(TimeUnit::from_keyword("yr"), Some(TimeUnit::Years));
        assert_eq!(TimeUnit::from_keyword("wk"), Some(TimeUnit::Weeks));
        assert_eq!(TimeUnit::from_keyword("mo"), Some(TimeUnit::Months));
        assert_eq!(TimeUnit::from_keyword("hr"), Some(TimeUnit::Hours));
        assert_eq!(TimeUnit::from_keyword("min"), Some(TimeUnit::Minutes));
        assert_eq!(TimeUnit::from_keyword("fortnights"), None);
    }

    #[test]
    fn test_describe_today() {
        assert_eq!(describe_days(0, Mode::Countdown, None), "Today!");
        assert_eq!(describe_days(0, Mode::Since, None), "Today");
        assert_eq!(describe_days(5, Mode::Countdown, None), "5 days left");
    }
}
