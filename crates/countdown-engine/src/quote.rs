//! Quote card selection.
//!
//! The quote widget shows one quote per refresh interval. Selection is
//! repeatable: the same day (or hour) and widget size always pick the same
//! quote, so reloading a widget does not reshuffle it. Quotes that would not
//! fit the widget size are skipped when any quote fits.

use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::record::{normalize_hex_color, RawRow};
use crate::select::WidgetFamily;

/// One quote row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub quote: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl QuoteRecord {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRow`] if the quote or the author is blank.
    pub fn new(quote: impl Into<String>, author: impl Into<String>) -> Result<Self> {
        let quote = quote.into().trim().to_string();
        let author = author.into().trim().to_string();
        if quote.is_empty() {
            return Err(EngineError::InvalidRow("missing quote".to_string()));
        }
        if author.is_empty() {
            return Err(EngineError::InvalidRow(format!("'{quote}': missing author")));
        }
        Ok(QuoteRecord {
            quote,
            author,
            category: None,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into().trim().to_string();
        self.category = (!category.is_empty()).then_some(category);
        self
    }

    /// Build a quote from a row with `quote`, `author` and `category` keys
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRow`] if the quote or the author is
    /// missing.
    pub fn from_row(row: &RawRow) -> Result<Self> {
        Ok(
            QuoteRecord::new(row_text(row, "quote"), row_text(row, "author"))?
                .with_category(row_text(row, "category")),
        )
    }

    /// Character count of the rendered `“quote”— author` text.
    pub fn display_len(&self) -> usize {
        self.quote.chars().count() + self.author.chars().count() + 4
    }
}

/// Turn JSON rows into quotes, dropping rows without a quote or an author.
pub fn ingest_quotes(rows: &[Value]) -> Vec<QuoteRecord> {
    rows.iter()
        .filter_map(|row| {
            let parsed = row
                .as_object()
                .ok_or_else(|| EngineError::InvalidRow("not an object".to_string()))
                .and_then(QuoteRecord::from_row);
            match parsed {
                Ok(quote) => Some(quote),
                Err(e) => {
                    log::debug!("dropping quote row: {e}");
                    None
                }
            }
        })
        .collect()
}

fn row_text<'a>(row: &'a RawRow, key: &str) -> &'a str {
    row.iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_str())
        .unwrap_or_default()
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Quote widget size, which bounds the quote length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl QuoteSize {
    pub fn from_keyword(s: &str) -> Option<QuoteSize> {
        match s {
            "s" | "small" => Some(QuoteSize::Small),
            "m" | "medium" => Some(QuoteSize::Medium),
            "l" | "large" => Some(QuoteSize::Large),
            _ => None,
        }
    }

    /// The size a widget family implies.
    pub fn for_family(family: WidgetFamily) -> QuoteSize {
        match family {
            WidgetFamily::Medium => QuoteSize::Medium,
            WidgetFamily::Large => QuoteSize::Large,
            _ => QuoteSize::Small,
        }
    }

    /// Added to the rotation seed so sizes show different quotes.
    pub fn seed_offset(self) -> u64 {
        match self {
            QuoteSize::Small => 1,
            QuoteSize::Medium => 2,
            QuoteSize::Large => 3,
        }
    }

    /// Whether a rendered text of `len` characters suits this size.
    ///
    /// Small takes up to 140, medium 141 to 260, large anything longer.
    pub fn fits(self, len: usize) -> bool {
        match self {
            QuoteSize::Small => (1..=140).contains(&len),
            QuoteSize::Medium => (141..=260).contains(&len),
            QuoteSize::Large => len > 260,
        }
    }
}

/// How often the quote changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshInterval {
    Hourly,
    #[default]
    Daily,
}

impl RefreshInterval {
    /// `YYYYMMDDHH` for hourly rotation, `YYYYMMDD` for daily.
    pub fn seed(self, now: NaiveDateTime) -> u64 {
        let day = now.year().unsigned_abs() as u64 * 10_000
            + now.month() as u64 * 100
            + now.day() as u64;
        match self {
            RefreshInterval::Hourly => day * 100 + now.hour() as u64,
            RefreshInterval::Daily => day,
        }
    }
}

impl FromStr for RefreshInterval {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(RefreshInterval::Hourly),
            "daily" => Ok(RefreshInterval::Daily),
            other => Err(EngineError::InvalidConfig(format!(
                "unknown refresh interval '{other}'"
            ))),
        }
    }
}

/// The structured form of a quote widget parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct QuoteConfig {
    pub category: Option<String>,
    pub size: Option<QuoteSize>,
    /// 0-based position in the filtered quotes.
    pub forced_index: Option<usize>,
    pub author: Option<String>,
}

impl QuoteConfig {
    /// The explicit size, else the one the family implies.
    pub fn size_for(&self, family: WidgetFamily) -> QuoteSize {
        self.size.unwrap_or_else(|| QuoteSize::for_family(family))
    }
}

/// Parse a quote widget parameter such as `stoic,m` or `author:seneca,4`.
///
/// Tokens are comma-separated and case-insensitive. A token naming one of
/// `categories` sets the category, `s`/`m`/`l` the size, `author:<name>` an
/// author filter and an integer a forced 0-based index. Other tokens are
/// ignored.
pub fn parse_quote_config(raw: &str, categories: &[String]) -> QuoteConfig {
    let mut config = QuoteConfig::default();
    for part in raw.split(',') {
        let part = part.trim().to_lowercase();
        if part.is_empty() {
            continue;
        }
        if let Some(author) = part.strip_prefix("author:") {
            let author = author.trim();
            config.author = (!author.is_empty()).then(|| author.to_string());
        } else if let Some(category) = categories.iter().find(|c| c.eq_ignore_ascii_case(&part)) {
            config.category = Some(category.clone());
        } else if let Some(size) = QuoteSize::from_keyword(&part) {
            config.size = Some(size);
        } else if let Ok(index) = part.parse::<usize>() {
            config.forced_index = Some(index);
        } else {
            log::debug!("ignoring quote token '{part}'");
        }
    }
    config
}

// ── Selection ───────────────────────────────────────────────────────────────

/// The quote chosen for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotePick<'a> {
    pub quote: &'a QuoteRecord,
    /// False when the category/author filter matched nothing and every quote
    /// was considered instead.
    pub filtered: bool,
}

/// Pick the quote to show at `now`.
///
/// Filters by category and author (case-insensitive); an empty result falls
/// back to all quotes. A forced index inside the filtered list wins.
/// Otherwise the pick is `(seed + size offset) % n` over the quotes that fit
/// the size, or over all filtered quotes when none fit.
///
/// # Errors
///
/// Returns [`EngineError::EmptySet`] when `quotes` is empty.
pub fn select_quote<'a>(
    quotes: &'a [QuoteRecord],
    config: &QuoteConfig,
    now: NaiveDateTime,
    interval: RefreshInterval,
) -> Result<QuotePick<'a>> {
    if quotes.is_empty() {
        return Err(EngineError::EmptySet);
    }

    let matching: Vec<&QuoteRecord> = quotes
        .iter()
        .filter(|q| {
            let category_ok = config.category.as_deref().is_none_or(|wanted| {
                q.category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
            });
            let author_ok = config
                .author
                .as_deref()
                .is_none_or(|wanted| q.author.eq_ignore_ascii_case(wanted));
            category_ok && author_ok
        })
        .collect();

    let filtered = !matching.is_empty();
    let pool = if filtered {
        matching
    } else {
        log::warn!(
            "no quotes match category {:?} author {:?}; using all quotes",
            config.category,
            config.author
        );
        quotes.iter().collect()
    };

    if let Some(quote) = config.forced_index.and_then(|i| pool.get(i).copied()) {
        return Ok(QuotePick { quote, filtered });
    }

    let size = config.size.unwrap_or_default();
    let fitting: Vec<&QuoteRecord> = pool
        .iter()
        .copied()
        .filter(|q| size.fits(q.display_len()))
        .collect();
    let usable = if fitting.is_empty() { &pool } else { &fitting };

    let index = (interval.seed(now) + size.seed_offset()) % usable.len() as u64;
    Ok(QuotePick {
        quote: usable[index as usize],
        filtered,
    })
}

// ── Card ────────────────────────────────────────────────────────────────────

/// Category whose cards carry the cookie jar header.
pub const COOKIE_JAR: &str = "cookiejar";

const COOKIE_JAR_HEADER: &str = "~ From Your Cookie Jar ~";
const FILTER_MISS_NOTE: &str = "No quotes found for filter. Showing all quotes.";

/// A background and font color for a quote card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub font: String,
}

impl Default for ColorPair {
    fn default() -> Self {
        ColorPair {
            background: "#000000".to_string(),
            font: "#FFFFFF".to_string(),
        }
    }
}

/// The color pair for a render, rotated with the same seed as the quote so
/// a quote keeps its colors for the whole interval.
///
/// An empty list, or a color that is not a hex code, falls back to white on
/// black.
pub fn pick_color_pair(
    pairs: &[ColorPair],
    size: QuoteSize,
    now: NaiveDateTime,
    interval: RefreshInterval,
) -> ColorPair {
    let fallback = ColorPair::default();
    if pairs.is_empty() {
        return fallback;
    }
    let index = (interval.seed(now) + size.seed_offset()) % pairs.len() as u64;
    let pair = &pairs[index as usize];
    ColorPair {
        background: normalize_hex_color(&pair.background).unwrap_or(fallback.background),
        font: normalize_hex_color(&pair.font).unwrap_or(fallback.font),
    }
}

/// Display text and colors for a quote card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteCard {
    /// Small line above the quote, set for the cookie jar category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// The quote in curly quotes.
    pub quote_text: String,
    /// `— Author`, absent on the placeholder.
    pub author_text: Option<String>,
    /// Set when the category/author filter matched nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub background_hex: String,
    pub font_hex: String,
}

impl QuoteCard {
    pub fn placeholder(colors: ColorPair) -> Self {
        QuoteCard {
            header: None,
            quote_text: "No quotes found.".to_string(),
            author_text: None,
            note: None,
            background_hex: colors.background,
            font_hex: colors.font,
        }
    }

    /// Card for a picked quote.
    pub fn for_pick(pick: QuotePick<'_>, config: &QuoteConfig, colors: ColorPair) -> Self {
        let header = config
            .category
            .as_deref()
            .filter(|c| c.eq_ignore_ascii_case(COOKIE_JAR))
            .map(|_| COOKIE_JAR_HEADER.to_string());
        QuoteCard {
            header,
            note: (!pick.filtered).then(|| FILTER_MISS_NOTE.to_string()),
            background_hex: colors.background,
            font_hex: colors.font,
            ..QuoteCard::from(pick.quote)
        }
    }
}

impl From<&QuoteRecord> for QuoteCard {
    fn from(quote: &QuoteRecord) -> Self {
        let colors = ColorPair::default();
        QuoteCard {
            header: None,
            quote_text: format!("“{}”", quote.quote),
            author_text: Some(format!("— {}", quote.author)),
            note: None,
            background_hex: colors.background,
            font_hex: colors.font,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
