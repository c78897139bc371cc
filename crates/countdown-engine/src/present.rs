//! Display bundles: everything a drawing surface needs for one event.
//!
//! The widgets themselves only lay out text and colors. [`RenderContext`]
//! carries the per-render styling inputs (palette and fallback colors) that
//! would otherwise be shared mutable state, and turns a [`Selection`] into a
//! [`DisplayBundle`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::format_long_date;
use crate::duration::{age_on, next_occurrence};
use crate::mode::Mode;
use crate::params::ParsedConfig;
use crate::record::{EventRecord, DEFAULT_ICON};
use crate::select::{page_of, Selection};
use crate::units::{format_duration, today_label};

/// Title used when there is nothing to show.
pub const PLACEHOLDER_TITLE: &str = "No events";

/// Styling inputs for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    /// Background colors rotated across events without their own color.
    pub palette: Vec<String>,
    /// Background when the palette is empty, and for the placeholder.
    pub default_color: String,
    /// Foreground for events without their own text color.
    pub default_text_color: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext {
            palette: ["#CB2443", "#8e44ad", "#2980b9", "#F79F39", "#CEA834", "#7b9a50"]
                .map(String::from)
                .to_vec(),
            default_color: "#2980b9".to_string(),
            default_text_color: "#FFFFFF".to_string(),
        }
    }
}

/// Ready-to-draw text and colors for one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBundle {
    /// Display name plus any icon suffix, e.g. `Mom's Birthday`.
    pub title: String,
    /// Display name without the icon suffix.
    pub name: String,
    /// The number, or `Today!` / `Today` on the day itself. Empty when the
    /// date did not parse.
    pub value_text: String,
    /// Unit noun; empty on the day itself.
    pub unit_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    pub icon_glyph: String,
    pub color_hex: String,
    pub text_color_hex: String,
    pub mode: Mode,
    pub days: i64,
    /// `Sat, Jun 15, 2024`: the next occurrence, or the start date in since
    /// layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_text: Option<String>,
    /// Age line in age mode, e.g. `turning 31!`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_text: Option<String>,
}

impl DisplayBundle {
    /// The number, unit and suffix on one line: `12 days left`, `Today!`.
    pub fn value_line(&self) -> String {
        [
            self.value_text.as_str(),
            self.unit_label.as_str(),
            self.suffix.as_deref().unwrap_or_default(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// The inline lock-screen text: `12d left - Mom`, `Today! - Mom`,
    /// `3 weeks - Gym`.
    pub fn topbar_line(&self) -> String {
        let value = match self.mode {
            Mode::Countdown if self.days != 0 && !self.value_text.is_empty() => {
                format!("{}d left", self.days)
            }
            _ => self.value_line(),
        };
        [value.as_str(), self.name.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" - ")
    }
}

impl RenderContext {
    /// Palette color for a list slot, wrapping around.
    pub fn palette_color(&self, slot: usize) -> &str {
        if self.palette.is_empty() {
            &self.default_color
        } else {
            &self.palette[slot % self.palette.len()]
        }
    }

    /// Bundle for a single-event widget.
    pub fn bundle(
        &self,
        selection: &Selection<'_>,
        config: &ParsedConfig,
        today: NaiveDate,
    ) -> DisplayBundle {
        self.bundle_at(selection, config, today, 0)
    }

    /// Bundle for the event in list or grid position `slot`, which picks the
    /// palette color when the event has none.
    pub fn bundle_at(
        &self,
        selection: &Selection<'_>,
        config: &ParsedConfig,
        today: NaiveDate,
        slot: usize,
    ) -> DisplayBundle {
        let event = selection.event;
        let name = event.display_name(config.is_since()).to_string();
        let title = if name == event.name {
            format!("{name}{}", title_suffix(&event.icon))
        } else {
            name.clone()
        };

        let (value_text, unit_label, suffix) = if event.parsed_date().is_none() {
            (String::new(), String::new(), None)
        } else if selection.days == 0 {
            (today_label(selection.display_mode).to_string(), String::new(), None)
        } else {
            let f = format_duration(selection.days, selection.display_mode, config.unit_override);
            (f.value, f.unit, f.suffix)
        };

        let date_text = event.parsed_date().map(|d| match selection.display_mode {
            Mode::Since => format_long_date(d),
            Mode::Countdown => format_long_date(next_occurrence(d, today)),
        });

        DisplayBundle {
            title,
            name,
            value_text,
            unit_label,
            suffix,
            icon_glyph: event.icon.clone(),
            color_hex: event
                .color
                .clone()
                .unwrap_or_else(|| self.palette_color(slot).to_string()),
            text_color_hex: event
                .text_color
                .clone()
                .unwrap_or_else(|| self.default_text_color.clone()),
            mode: selection.display_mode,
            days: selection.days,
            date_text,
            age_text: config.age_mode.then(|| age_text(event, today)).flatten(),
        }
    }

    /// Bundles for the page of events a list or grid widget shows.
    pub fn page_bundles(
        &self,
        events: &[EventRecord],
        config: &ParsedConfig,
        today: NaiveDate,
        per_page: usize,
    ) -> Vec<DisplayBundle> {
        let first_slot = (config.page.max(1) as usize - 1).saturating_mul(per_page);
        page_of(events, config, today, per_page)
            .into_iter()
            .enumerate()
            .map(|(i, event)| {
                let selection = Selection::of(event, config, today);
                self.bundle_at(&selection, config, today, first_slot + i)
            })
            .collect()
    }

    /// What to draw when there are no events.
    pub fn placeholder(&self) -> DisplayBundle {
        DisplayBundle {
            title: PLACEHOLDER_TITLE.to_string(),
            name: PLACEHOLDER_TITLE.to_string(),
            value_text: String::new(),
            unit_label: String::new(),
            suffix: None,
            icon_glyph: DEFAULT_ICON.to_string(),
            color_hex: self.default_color.clone(),
            text_color_hex: self.default_text_color.clone(),
            mode: Mode::Countdown,
            days: 0,
            date_text: None,
            age_text: None,
        }
    }
}

fn title_suffix(icon: &str) -> &'static str {
    match icon {
        "🎂" => "'s Birthday",
        "🥂" => "'s Anniversary",
        _ => "",
    }
}

/// `You are 30!! 🥳` on the day, `turning 31!` or `31! yrs together` otherwise.
fn age_text(event: &EventRecord, today: NaiveDate) -> Option<String> {
    let birth = event.parsed_date().filter(|d| *d <= today)?;
    let age = age_on(birth, today);

    let text = if age.is_anniversary {
        let (before, after) = match event.icon.as_str() {
            "🎂" => ("You are ", " 🥳"),
            "🥂" | "🗓" => ("", " together 🥳"),
            "🔱" => ("", " observed"),
            _ => ("", ""),
        };
        format!("{before}{}!!{after}", age.completed_years)
    } else {
        let (before, after) = match event.icon.as_str() {
            "🎂" => ("turning ", ""),
            "🥂" | "🗓" => ("", " yrs together"),
            "🔱" => ("", " yrs observed"),
            _ => ("", ""),
        };
        format!("{before}{}!{after}", age.turning)
    };
    Some(text)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::parse_config;
    use crate::select::select_event;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn render(events: &[EventRecord], raw: &str) -> DisplayBundle {
        let config = parse_config(raw);
        let selection = select_event(events, &config, today()).unwrap();
        RenderContext::default().bundle(&selection, &config, today())
    }

    #[test]
    fn test_birthday_title_and_countdown() {
        let events = vec![EventRecord::new("Mom", "1960-06-15").unwrap().with_icon("🎂")];
        let bundle = render(&events, "");
        assert_eq!(bundle.title, "Mom's Birthday");
        assert_eq!(bundle.name, "Mom");
        assert_eq!(bundle.value_text, "45");
        assert_eq!(bundle.unit_label, "days");
        assert_eq!(bundle.suffix.as_deref(), Some("left"));
        assert_eq!(bundle.value_line(), "45 days left");
        assert_eq!(bundle.topbar_line(), "45d left - Mom");
        assert_eq!(bundle.date_text.as_deref(), Some("Sat, Jun 15, 2024"));
        assert_eq!(bundle.age_text, None);
    }

    #[test]
    fn test_today_countdown() {
        let events = vec![EventRecord::new("Wedding", "2015-05-01").unwrap().with_icon("🥂")];
        let bundle = render(&events, "");
        assert_eq!(bundle.title, "Wedding's Anniversary");
        assert_eq!(bundle.value_text, "Today!");
        assert_eq!(bundle.unit_label, "");
        assert_eq!(bundle.suffix, None);
        assert_eq!(bundle.topbar_line(), "Today! - Wedding");
    }

    #[test]
    fn test_since_bundle_with_unit_override() {
        let events = vec![EventRecord::new("Gym", "2024-03-01")
            .unwrap()
            .with_mode(Mode::Since)];
        let bundle = render(&events, "since.weeks");
        assert_eq!(bundle.mode, Mode::Since);
        assert_eq!(bundle.value_text, "8.71");
        assert_eq!(bundle.unit_label, "weeks");
        assert_eq!(bundle.suffix, None);
        assert_eq!(bundle.topbar_line(), "8.71 weeks - Gym");
        assert_eq!(bundle.date_text.as_deref(), Some("Fri, Mar 1, 2024"));
    }

    #[test]
    fn test_since_today() {
        let events = vec![EventRecord::new("Fresh start", "2024-05-01")
            .unwrap()
            .with_mode(Mode::Since)];
        let bundle = render(&events, "since");
        assert_eq!(bundle.value_text, "Today");
        assert_eq!(bundle.topbar_line(), "Today - Fresh start");
    }

    #[test]
    fn test_alias_replaces_title_outside_since_mode() {
        let events = vec![EventRecord::new("Sober", "2022-06-01")
            .unwrap()
            .with_mode(Mode::Since)
            .with_icon("🎂")
            .with_aliases("Sober birthday")];
        let bundle = render(&events, "");
        assert_eq!(bundle.title, "Sober birthday");

        let bundle = render(&events, "since");
        assert_eq!(bundle.title, "Sober's Birthday");
    }

    #[test]
    fn test_colors_from_record_or_context() {
        let events = vec![EventRecord::new("A", "2024-06-01")
            .unwrap()
            .with_color("#123456")
            .with_text_color("#000")];
        let bundle = render(&events, "");
        assert_eq!(bundle.color_hex, "#123456");
        assert_eq!(bundle.text_color_hex, "#000");

        let events = vec![EventRecord::new("B", "2024-06-01").unwrap()];
        let bundle = render(&events, "");
        assert_eq!(bundle.color_hex, "#CB2443");
        assert_eq!(bundle.text_color_hex, "#FFFFFF");
    }

    #[test]
    fn test_palette_rotation() {
        let ctx = RenderContext::default();
        assert_eq!(ctx.palette_color(1), "#8e44ad");
        assert_eq!(ctx.palette_color(6), "#CB2443");

        let empty = RenderContext {
            palette: Vec::new(),
            ..RenderContext::default()
        };
        assert_eq!(empty.palette_color(3), "#2980b9");
    }

    #[test]
    fn test_age_text_turning() {
        let events = vec![EventRecord::new("Mom", "1990-06-15").unwrap().with_icon("🎂")];
        assert_eq!(render(&events, "age").age_text.as_deref(), Some("turning 34!"));

        let events = vec![EventRecord::new("Us", "2015-06-15").unwrap().with_icon("🥂")];
        assert_eq!(render(&events, "age").age_text.as_deref(), Some("9! yrs together"));
    }

    #[test]
    fn test_age_text_on_anniversary() {
        let events = vec![EventRecord::new("Me", "1994-05-01").unwrap().with_icon("🎂")];
        assert_eq!(render(&events, "age").age_text.as_deref(), Some("You are 30!! 🥳"));

        let events = vec![EventRecord::new("Us", "2014-05-01").unwrap().with_icon("🥂")];
        assert_eq!(render(&events, "age").age_text.as_deref(), Some("10!! together 🥳"));
    }

    #[test]
    fn test_age_text_skips_future_dates() {
        let events = vec![EventRecord::new("Baby", "2024-09-01").unwrap()];
        assert_eq!(render(&events, "age").age_text, None);
    }

    #[test]
    fn test_page_bundles_rotate_from_page_start() {
        let events: Vec<EventRecord> = (1..=5)
            .map(|m| EventRecord::new(format!("E{m}"), format!("2024-{:02}-10", m + 5)).unwrap())
            .collect();
        let ctx = RenderContext::default();
        let bundles = ctx.page_bundles(&events, &parse_config("pg2"), today(), 3);
        assert_eq!(bundles.len(), 2);
        assert_eq!(bundles[0].name, "E4");
        assert_eq!(bundles[0].color_hex, ctx.palette_color(3));
        assert_eq!(bundles[1].color_hex, ctx.palette_color(4));
    }

    #[test]
    fn test_unparseable_row_shows_no_value() {
        let events = vec![
            EventRecord::new("Launch", "2024-05-03").unwrap(),
            EventRecord::new("Someday", "whenever").unwrap(),
        ];
        let bundles = RenderContext::default().page_bundles(&events, &parse_config(""), today(), 3);
        let someday = &bundles[1];
        assert_eq!(someday.name, "Someday");
        assert_eq!(someday.value_text, "");
        assert_eq!(someday.value_line(), "");
        assert_eq!(someday.topbar_line(), "Someday");
        assert_eq!(someday.date_text, None);
    }

    #[test]
    fn test_placeholder() {
        let bundle = RenderContext::default().placeholder();
        assert_eq!(bundle.title, PLACEHOLDER_TITLE);
        assert_eq!(bundle.icon_glyph, DEFAULT_ICON);
        assert_eq!(bundle.color_hex, "#2980b9");
        assert_eq!(bundle.topbar_line(), PLACEHOLDER_TITLE);
    }
}
