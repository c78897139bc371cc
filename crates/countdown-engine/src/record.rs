//! Event records and row ingestion.
//!
//! Rows come from more than one source (a Notion export, a sheet web app, a
//! hand-written JSON file) and each spells its columns differently. Every
//! semantic field therefore has an ordered list of accepted column names,
//! matched case-insensitively; the first one present with a non-empty value
//! wins. Rows without a name or a date are rejected at construction.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::date::normalize_date;
use crate::duration::{days_since, days_until, UNPARSEABLE_SINCE, UNPARSEABLE_UNTIL};
use crate::error::EngineError;
use crate::mode::Mode;

/// A loosely-typed input row.
pub type RawRow = serde_json::Map<String, Value>;

/// Icon used when a row has none.
pub const DEFAULT_ICON: &str = "📅";

/// Accepted column names per field, in priority order.
pub mod fields {
    pub const NAME: &[&str] = &["name", "event name", "title"];
    pub const DATE: &[&str] = &["date", "event date"];
    pub const ICON: &[&str] = &["icon", "widget emoji", "emoji"];
    pub const COLOR: &[&str] = &["color", "widget clr", "widget color"];
    pub const CATEGORY: &[&str] = &["event type", "type", "category"];
    pub const MODE: &[&str] = &["mode", "countdown mode", "event mode", "since mode"];
    pub const ALIASES: &[&str] = &["aliases", "alias"];
    pub const TEXT_COLOR: &[&str] = &[
        "widget txtclr",
        "widget text color",
        "text color",
        "txtclr",
    ];
}

/// One calendar entity: a birthday, an anniversary, a streak, a deadline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub name: String,
    /// The date as written in the source row.
    pub date: String,
    #[serde(skip)]
    parsed_date: Option<NaiveDate>,
    pub icon: String,
    /// Validated `#hex` background color.
    pub color: Option<String>,
    /// Validated `#hex` foreground color.
    pub text_color: Option<String>,
    pub mode: Mode,
    /// Free-text event type, e.g. `Birthday` or `Ended`.
    pub category: Option<String>,
    /// Alternate display name, also searched by name selectors.
    pub aliases: Option<String>,
}

impl EventRecord {
    /// Create a countdown record with the default icon.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRow`] if `name` or `date` is blank.
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Result<Self, EngineError> {
        let name = name.into().trim().to_string();
        let date = date.into().trim().to_string();
        if name.is_empty() {
            return Err(EngineError::InvalidRow("missing name".to_string()));
        }
        if date.is_empty() {
            return Err(EngineError::InvalidRow(format!("'{name}': missing date")));
        }

        let parsed_date = match normalize_date(&date) {
            Ok(d) => Some(d),
            Err(e) => {
                log::debug!("'{name}': {e}; sorting last");
                None
            }
        };

        Ok(EventRecord {
            name,
            date,
            parsed_date,
            icon: DEFAULT_ICON.to_string(),
            color: None,
            text_color: None,
            mode: Mode::Countdown,
            category: None,
            aliases: None,
        })
    }

    /// Build a record from a raw row.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRow`] if the row has no name or no date.
    pub fn from_row(row: &RawRow) -> Result<Self, EngineError> {
        let name = pick(row, fields::NAME)
            .ok_or_else(|| EngineError::InvalidRow("missing name".to_string()))?;
        let date = pick(row, fields::DATE)
            .ok_or_else(|| EngineError::InvalidRow(format!("'{name}': missing date")))?;

        let category = pick(row, fields::CATEGORY);
        let mode = pick(row, fields::MODE)
            .and_then(|m| Mode::from_label(&m))
            .or_else(|| category.as_deref().and_then(Mode::from_label))
            .unwrap_or_default();

        let mut record = EventRecord::new(name, date)?.with_mode(mode);
        if let Some(icon) = pick(row, fields::ICON) {
            record = record.with_icon(icon);
        }
        if let Some(color) = pick(row, fields::COLOR) {
            record = record.with_color(&color);
        }
        if let Some(color) = pick(row, fields::TEXT_COLOR) {
            record = record.with_text_color(&color);
        }
        record.category = category;
        record.aliases = pick(row, fields::ALIASES);
        Ok(record)
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        let icon = icon.into().trim().to_string();
        if !icon.is_empty() {
            self.icon = icon;
        }
        self
    }

    /// Set the background color; invalid hex is dropped.
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = normalize_hex_color(color);
        if self.color.is_none() {
            log::debug!("'{}': ignoring color '{}'", self.name, color);
        }
        self
    }

    /// Set the text color; invalid hex is dropped.
    pub fn with_text_color(mut self, color: &str) -> Self {
        self.text_color = normalize_hex_color(color);
        if self.text_color.is_none() {
            log::debug!("'{}': ignoring text color '{}'", self.name, color);
        }
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_aliases(mut self, aliases: impl Into<String>) -> Self {
        self.aliases = Some(aliases.into());
        self
    }

    /// The normalized date, `None` if the source text was unparseable.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        self.parsed_date
    }

    /// Days until the next yearly occurrence, or [`UNPARSEABLE_UNTIL`].
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        self.parsed_date
            .map_or(UNPARSEABLE_UNTIL, |d| days_until(d, today))
    }

    /// Days since the date, or [`UNPARSEABLE_SINCE`].
    pub fn days_since(&self, today: NaiveDate) -> i64 {
        self.parsed_date
            .map_or(UNPARSEABLE_SINCE, |d| days_since(d, today))
    }

    /// Whether the category is `ended`.
    pub fn is_ended(&self) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case("ended"))
    }

    /// Whether the record can be shown in since mode.
    pub fn is_since_eligible(&self) -> bool {
        self.mode == Mode::Since || self.is_ended()
    }

    /// Case-insensitive substring match on the name or the aliases.
    pub fn matches(&self, token: &str) -> bool {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&token)
            || self
                .aliases
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&token))
    }

    /// The name to show.
    ///
    /// Since-records with aliases show the alias when rendered outside since
    /// mode, so a streak can read as an upcoming milestone.
    pub fn display_name(&self, in_since_mode: bool) -> &str {
        match (&self.aliases, self.mode, in_since_mode) {
            (Some(alias), Mode::Since, false) if !alias.trim().is_empty() => alias,
            _ => &self.name,
        }
    }
}

/// Turn JSON rows into records, dropping rows that fail validation.
pub fn ingest_rows(rows: &[Value]) -> Vec<EventRecord> {
    rows.iter()
        .filter_map(|row| match row.as_object() {
            Some(map) => match EventRecord::from_row(map) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::debug!("dropping row: {e}");
                    None
                }
            },
            None => {
                log::debug!("dropping non-object row");
                None
            }
        })
        .collect()
}

/// Normalize a hex color to `#...`.
///
/// Accepts `#RGB`, `#RRGGBB` and `#RRGGBBAA`; a bare six-digit hex string
/// gets a `#` prefix. Anything else is `None`.
pub fn normalize_hex_color(raw: &str) -> Option<String> {
    let s = raw.trim();
    let is_hex = |h: &str| h.bytes().all(|b| b.is_ascii_hexdigit());
    match s.strip_prefix('#') {
        Some(hex) if matches!(hex.len(), 3 | 6 | 8) && is_hex(hex) => Some(s.to_string()),
        None if s.len() == 6 && is_hex(s) => Some(format!("#{s}")),
        _ => None,
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// First non-empty value among `names`, matched case-insensitively.
fn pick(row: &RawRow, names: &[&str]) -> Option<String> {
    names.iter().find_map(|wanted| {
        row.iter()
            .filter(|(key, _)| key.trim().eq_ignore_ascii_case(wanted))
            .find_map(|(_, value)| value_text(value))
    })
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

// ── Tests ───────────────────────────────────────────────────────────────────
