//! Choosing which events a widget shows.
//!
//! A single-event widget shows one [`Selection`], resolved from the parsed
//! widget parameter: the default is the soonest countdown, or the longest
//! running since-event in since mode, and selector tokens override it in
//! order. Index selectors count rows in input order, so `3` is the third row
//! of the source table. List and grid widgets show a page of the sorted
//! candidates through [`page_of`].
//!
//! Records whose date did not parse are never selected.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::mode::Mode;
use crate::params::{DisplayVariant, ParsedConfig, Selector};
use crate::record::EventRecord;

/// The event chosen for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub event: &'a EventRecord,
    /// The layout the event renders in; see [`display_mode`].
    pub display_mode: Mode,
    /// `days_since` in since layout, `days_until` otherwise.
    pub days: i64,
    /// Whether a selector token picked the event.
    pub explicit: bool,
}

impl<'a> Selection<'a> {
    /// Pair an event with its display mode and day count.
    pub fn of(event: &'a EventRecord, config: &ParsedConfig, today: NaiveDate) -> Self {
        let display_mode = display_mode(event, config);
        let days = match display_mode {
            Mode::Since => event.days_since(today),
            Mode::Countdown => event.days_until(today),
        };
        Selection {
            event,
            display_mode,
            days,
            explicit: false,
        }
    }
}

/// Events ordered by next occurrence, soonest first.
///
/// The sort is stable so ties keep input order. Unparseable dates carry the
/// [`UNPARSEABLE_UNTIL`](crate::duration::UNPARSEABLE_UNTIL) sentinel and
/// land at the end.
pub fn sort_by_next_occurrence(events: &[EventRecord], today: NaiveDate) -> Vec<&EventRecord> {
    let mut sorted: Vec<&EventRecord> = events.iter().collect();
    sorted.sort_by_key(|e| e.days_until(today));
    sorted
}

/// Since-eligible events that have started, longest running first.
pub fn since_candidates(events: &[EventRecord], today: NaiveDate) -> Vec<&EventRecord> {
    let mut candidates: Vec<&EventRecord> = events
        .iter()
        .filter(|e| e.is_since_eligible() && e.days_since(today) >= 0)
        .collect();
    candidates.sort_by_key(|e| std::cmp::Reverse(e.days_since(today)));
    candidates
}

/// The candidate list pages index into.
pub fn active_candidates<'a>(
    events: &'a [EventRecord],
    config: &ParsedConfig,
    today: NaiveDate,
) -> Vec<&'a EventRecord> {
    if config.is_since() {
        since_candidates(events, today)
    } else {
        sort_by_next_occurrence(events, today)
    }
}

/// The records selectors resolve against, in input order.
///
/// Unparseable records are left out. In since mode only since-eligible
/// records that have started remain.
pub fn selector_candidates<'a>(
    events: &'a [EventRecord],
    config: &ParsedConfig,
    today: NaiveDate,
) -> Vec<&'a EventRecord> {
    events
        .iter()
        .filter(|e| e.parsed_date().is_some())
        .filter(|e| !config.is_since() || (e.is_since_eligible() && e.days_since(today) >= 0))
        .collect()
}

/// Layout for an event: since when the config is in since mode and the
/// event is since-eligible, or whenever the event has ended.
pub fn display_mode(event: &EventRecord, config: &ParsedConfig) -> Mode {
    if (config.is_since() && event.is_since_eligible()) || event.is_ended() {
        Mode::Since
    } else {
        Mode::Countdown
    }
}

/// Resolve the event a single-event widget should show.
///
/// Selectors that match nothing are logged and skipped; the previous
/// selection stands.
///
/// # Errors
///
/// Returns [`EngineError::EmptySet`] when no record has a parseable date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use countdown_engine::params::parse_config;
/// use countdown_engine::record::EventRecord;
/// use countdown_engine::select::select_event;
///
/// let events = vec![
///     EventRecord::new("A", "2024-01-01").unwrap(),
///     EventRecord::new("B", "2024-06-15").unwrap(),
/// ];
/// let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let selection = select_event(&events, &parse_config(""), today).unwrap();
/// assert_eq!(selection.event.name, "B");
/// assert_eq!(selection.days, 45);
///
/// // Indexes count rows as given.
/// let selection = select_event(&events, &parse_config("1"), today).unwrap();
/// assert_eq!(selection.event.name, "A");
/// ```
pub fn select_event<'a>(
    events: &'a [EventRecord],
    config: &ParsedConfig,
    today: NaiveDate,
) -> Result<Selection<'a>> {
    let soonest = sort_by_next_occurrence(events, today)
        .into_iter()
        .find(|e| e.parsed_date().is_some())
        .ok_or(EngineError::EmptySet)?;

    let since_default = if config.is_since() {
        since_candidates(events, today).first().copied()
    } else {
        None
    };
    let mut chosen = since_default.unwrap_or(soonest);

    let candidates = selector_candidates(events, config, today);
    let mut explicit = false;
    for selector in &config.selectors {
        match resolve(selector, &candidates) {
            Ok(event) => {
                chosen = event;
                explicit = true;
            }
            Err(e) => log::debug!("{e}; keeping '{}'", chosen.name),
        }
    }

    if config.is_since() && config.selection_specified() && !chosen.is_since_eligible() {
        if let Some(first) = since_default {
            chosen = first;
        }
    }

    Ok(Selection {
        explicit,
        ..Selection::of(chosen, config, today)
    })
}

/// The `config.page`-th slice of the active candidates, `per_page` at a time.
pub fn page_of<'a>(
    events: &'a [EventRecord],
    config: &ParsedConfig,
    today: NaiveDate,
    per_page: usize,
) -> Vec<&'a EventRecord> {
    let skip = (config.page.max(1) as usize - 1).saturating_mul(per_page);
    active_candidates(events, config, today)
        .into_iter()
        .skip(skip)
        .take(per_page)
        .collect()
}

fn resolve<'a>(selector: &Selector, candidates: &[&'a EventRecord]) -> Result<&'a EventRecord> {
    let found = match selector {
        Selector::Index(i) => i.checked_sub(1).and_then(|i| candidates.get(i)).copied(),
        Selector::Name(name) => candidates.iter().find(|e| e.matches(name)).copied(),
    };
    found.ok_or_else(|| {
        EngineError::NoMatch(match selector {
            Selector::Index(i) => format!("index {i} of {}", candidates.len()),
            Selector::Name(name) => format!("name '{name}'"),
        })
    })
}

// ── Widget families ─────────────────────────────────────────────────────────

/// Home-screen and lock-screen widget sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetFamily {
    #[default]
    Small,
    Medium,
    Large,
    AccessoryInline,
    AccessoryCircular,
    AccessoryRectangular,
}

impl WidgetFamily {
    /// Cells in grid view.
    pub fn grid_capacity(self) -> usize {
        match self {
            WidgetFamily::Large => 10,
            WidgetFamily::Medium => 4,
            _ => 1,
        }
    }

    /// Rows in list view.
    pub fn list_capacity(self) -> usize {
        match self {
            WidgetFamily::Large => 7,
            WidgetFamily::Medium => 3,
            _ => 1,
        }
    }

    pub fn page_size(self, grid_view: bool) -> usize {
        if grid_view {
            self.grid_capacity()
        } else {
            self.list_capacity()
        }
    }

    pub fn is_accessory(self) -> bool {
        self.default_display().is_some()
    }

    /// The lock-screen layout an accessory family implies.
    pub fn default_display(self) -> Option<DisplayVariant> {
        match self {
            WidgetFamily::AccessoryInline => Some(DisplayVariant::Topbar),
            WidgetFamily::AccessoryCircular => Some(DisplayVariant::Circular),
            WidgetFamily::AccessoryRectangular => Some(DisplayVariant::Rectangular),
            _ => None,
        }
    }

    /// The parameter's display variant, else the family default.
    pub fn display_for(self, config: &ParsedConfig) -> Option<DisplayVariant> {
        config.display.or_else(|| self.default_display())
    }
}

impl FromStr for WidgetFamily {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "small" => Ok(WidgetFamily::Small),
            "medium" => Ok(WidgetFamily::Medium),
            "large" => Ok(WidgetFamily::Large),
            "accessoryinline" | "inline" => Ok(WidgetFamily::AccessoryInline),
            "accessorycircular" | "circular" => Ok(WidgetFamily::AccessoryCircular),
            "accessoryrectangular" | "rectangular" => Ok(WidgetFamily::AccessoryRectangular),
            _ => Err(EngineError::InvalidConfig(format!(
                "unknown widget family '{s}'"
            ))),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
