use chrono::{Datelike, NaiveDate};
use countdown_engine::duration::project_into_year;
use countdown_engine::select::since_candidates;
use countdown_engine::{
    days_since, days_until, format_duration, normalize_date, parse_config, select_event,
    EventRecord, Mode,
};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=365).prop_map(|(y, ordinal)| NaiveDate::from_yo_opt(y, ordinal).unwrap())
}

fn any_event() -> impl Strategy<Value = EventRecord> {
    ("[A-Za-z ]{1,12}", any_date(), any::<bool>()).prop_filter_map(
        "blank name",
        |(name, date, since)| {
            let mode = if since { Mode::Since } else { Mode::Countdown };
            EventRecord::new(name, date.format("%Y-%m-%d").to_string())
                .ok()
                .map(|e| e.with_mode(mode))
        },
    )
}

proptest! {
    #[test]
    fn iso_dates_round_trip(date in any_date()) {
        let padded = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(normalize_date(&padded).unwrap(), date);

        let unpadded = format!("{}-{}-{}", date.year(), date.month(), date.day());
        prop_assert_eq!(normalize_date(&unpadded).unwrap(), date);
    }

    #[test]
    fn us_dates_round_trip(date in any_date()) {
        let us = format!("{}/{}/{}", date.month(), date.day(), date.year());
        prop_assert_eq!(normalize_date(&us).unwrap(), date);
    }

    #[test]
    fn days_until_is_within_a_year(date in any_date(), today in any_date()) {
        let days = days_until(date, today);
        prop_assert!((0..366).contains(&days), "days_until = {}", days);
    }

    #[test]
    fn one_year_back_is_a_year_ago(today in any_date()) {
        let year_ago = project_into_year(today, today.year() - 1);
        let days = days_since(year_ago, today);
        prop_assert!((364..=366).contains(&days), "days_since = {}", days);
    }

    #[test]
    fn parse_config_is_total_and_idempotent(raw in "[a-z0-9.,= ]{0,40}") {
        let config = parse_config(&raw);
        prop_assert!(config.page >= 1);
        prop_assert_eq!(parse_config(&raw), config);
    }

    #[test]
    fn singular_only_for_one(days in 1i64..1000, since in any::<bool>()) {
        let mode = if since { Mode::Since } else { Mode::Countdown };
        let formatted = format_duration(days, mode, None);
        prop_assert_eq!(formatted.unit == "day", days == 1);
        prop_assert_eq!(formatted.value, days.to_string());
    }

    #[test]
    fn selection_never_fails_on_events(
        events in prop::collection::vec(any_event(), 1..8),
        today in any_date(),
        raw in "(since|countdown|[1-9]|[a-z]{1,4})(,(since|[1-9]|[a-z]{1,4})){0,2}",
    ) {
        let config = parse_config(&raw);
        let selection = select_event(&events, &config, today).unwrap();
        prop_assert!(events.iter().any(|e| std::ptr::eq(e, selection.event)));
    }

    #[test]
    fn since_candidates_longest_first(
        events in prop::collection::vec(any_event(), 0..8),
        today in any_date(),
    ) {
        let candidates = since_candidates(&events, today);
        for pair in candidates.windows(2) {
            prop_assert!(pair[0].days_since(today) >= pair[1].days_since(today));
        }
        for e in candidates {
            prop_assert!(e.is_since_eligible());
            prop_assert!(e.days_since(today) >= 0);
        }
    }
}
