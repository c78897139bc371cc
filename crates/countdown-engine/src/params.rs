//! The widget parameter mini-language.
//!
//! A widget carries one free-text parameter, e.g. `since.weeks.gym` or
//! `countdown,3` or `col,pg2`. It is the only control surface, so parsing is
//! total: unknown text becomes a name selector and malformed numbers fall
//! back to defaults. Nothing here fails.
//!
//! Parsing happens in two steps. [`tokenize`] turns the comma-separated text
//! into a flat list of [`Token`]s, expanding dotted suffixes such as
//! `.circular` or `.wks` into their own tokens. [`parse_config`] then folds
//! the tokens into a [`ParsedConfig`], later tokens overriding earlier ones.
//!
//! # Grammar
//!
//! Tokens are split on `,`, trimmed and lower-cased.
//!
//! | token | effect |
//! |---|---|
//! | `age` | age display |
//! | `col` | grid view |
//! | `pg<N>` | page `N` (1 when `N` is missing, invalid or zero) |
//! | `since`, `mode=since`, `mode since`, anything with `ended`/`past` | since mode |
//! | `countdown`, `mode=countdown`, `mode countdown`, anything with `upcoming` | countdown mode |
//! | `topbar`, `circular`, `rect`, `rectangular` | lock-screen display variant |
//! | digits | select the N-th event (1-based) |
//! | anything else | select by name or alias substring |
//!
//! Mode and display tokens may carry dotted suffixes, read left to right: a
//! display keyword sets the display, a unit keyword
//! (`days|weeks|wk|wks|months|mo|years|yr|yrs|hours|hrs|hr|minutes|min`) sets
//! the unit, and the remaining segments, joined with spaces, select by name.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mode::Mode;
use crate::units::TimeUnit;

/// Compact lock-screen layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayVariant {
    /// Single line in the inline (top bar) slot.
    Topbar,
    /// Round badge.
    Circular,
    /// Two-line rectangular card.
    Rectangular,
}

impl DisplayVariant {
    pub fn from_keyword(s: &str) -> Option<DisplayVariant> {
        match s {
            "topbar" => Some(DisplayVariant::Topbar),
            "circular" => Some(DisplayVariant::Circular),
            "rect" | "rectangular" => Some(DisplayVariant::Rectangular),
            _ => None,
        }
    }
}

/// Which event a render should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Selector {
    /// 1-based position in the active candidate list.
    Index(usize),
    /// Case-insensitive substring of the event name or alias.
    Name(String),
}

/// One lexical unit of a widget parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Mode(Mode),
    Display(DisplayVariant),
    Unit(TimeUnit),
    Page(u32),
    Age,
    Grid,
    Select(Selector),
}

/// The structured form of a widget parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedConfig {
    /// Explicit mode; `None` renders as countdown.
    pub mode: Option<Mode>,
    /// Lock-screen layout override.
    pub display: Option<DisplayVariant>,
    /// Forced display unit.
    pub unit_override: Option<TimeUnit>,
    /// Event selectors in the order they appeared.
    pub selectors: Vec<Selector>,
    /// 1-based page for list and grid views.
    pub page: u32,
    /// Show age ("turning 31!") instead of a plain countdown.
    pub age_mode: bool,
    /// Grid instead of list for medium/large widgets.
    pub grid_view: bool,
}

impl Default for ParsedConfig {
    fn default() -> Self {
        ParsedConfig {
            mode: None,
            display: None,
            unit_override: None,
            selectors: Vec::new(),
            page: 1,
            age_mode: false,
            grid_view: false,
        }
    }
}

impl ParsedConfig {
    /// The mode to render in: the explicit mode, else countdown.
    pub fn effective_mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    pub fn is_since(&self) -> bool {
        self.effective_mode() == Mode::Since
    }

    /// Whether any selector token was given.
    pub fn selection_specified(&self) -> bool {
        !self.selectors.is_empty()
    }

    /// The last index selector, if any.
    pub fn target_index(&self) -> Option<usize> {
        self.selectors.iter().rev().find_map(|s| match s {
            Selector::Index(i) => Some(*i),
            Selector::Name(_) => None,
        })
    }

    /// The last name selector, if any.
    pub fn target_name(&self) -> Option<&str> {
        self.selectors.iter().rev().find_map(|s| match s {
            Selector::Name(name) => Some(name.as_str()),
            Selector::Index(_) => None,
        })
    }

    fn apply(mut self, token: Token) -> Self {
        match token {
            Token::Mode(mode) => self.mode = Some(mode),
            Token::Display(display) => self.display = Some(display),
            Token::Unit(unit) => self.unit_override = Some(unit),
            Token::Page(page) => self.page = page,
            Token::Age => self.age_mode = true,
            Token::Grid => self.grid_view = true,
            Token::Select(selector) => self.selectors.push(selector),
        }
        self
    }
}

impl FromStr for ParsedConfig {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_config(s))
    }
}

/// Parse a widget parameter into a [`ParsedConfig`].
///
/// # Examples
///
/// ```
/// use countdown_engine::mode::Mode;
/// use countdown_engine::params::{parse_config, DisplayVariant};
///
/// let config = parse_config("mode=since.circular.gym");
/// assert_eq!(config.mode, Some(Mode::Since));
/// assert_eq!(config.display, Some(DisplayVariant::Circular));
/// assert_eq!(config.target_name(), Some("gym"));
/// ```
pub fn parse_config(raw: &str) -> ParsedConfig {
    tokenize(raw)
        .into_iter()
        .fold(ParsedConfig::default(), ParsedConfig::apply)
}

/// Split a widget parameter into tokens.
pub fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for part in raw.split(',') {
        let part = part.trim().to_lowercase();
        if !part.is_empty() {
            tokenize_part(&part, &mut tokens);
        }
    }
    tokens
}

fn tokenize_part(part: &str, out: &mut Vec<Token>) {
    match part {
        "age" => return out.push(Token::Age),
        "col" => return out.push(Token::Grid),
        _ => {}
    }

    if let Some(number) = part.strip_prefix("pg") {
        let page = number.parse::<u32>().ok().filter(|n| *n >= 1).unwrap_or(1);
        return out.push(Token::Page(page));
    }

    if part.bytes().all(|b| b.is_ascii_digit()) {
        match part.parse::<usize>() {
            Ok(index) => out.push(Token::Select(Selector::Index(index))),
            Err(_) => log::debug!("ignoring oversized index token '{part}'"),
        }
        return;
    }

    let mut segments = part.split('.');
    let head = segments.next().unwrap_or_default();
    let has_suffix = part.contains('.');

    if let Some(mode) = head_mode(head) {
        out.push(Token::Mode(mode));
    } else if let Some(display) = DisplayVariant::from_keyword(head) {
        out.push(Token::Display(display));
    } else if !(head.is_empty() && has_suffix) {
        return out.push(Token::Select(Selector::Name(part.to_string())));
    }

    let mut name_parts = Vec::new();
    for segment in segments.filter(|s| !s.is_empty()) {
        if let Some(display) = DisplayVariant::from_keyword(segment) {
            out.push(Token::Display(display));
        } else if let Some(unit) = TimeUnit::from_keyword(segment) {
            out.push(Token::Unit(unit));
        } else {
            name_parts.push(segment);
        }
    }
    if !name_parts.is_empty() {
        out.push(Token::Select(Selector::Name(name_parts.join(" "))));
    }
}

fn head_mode(head: &str) -> Option<Mode> {
    const SINCE_PREFIXES: [&str; 3] = ["since", "mode=since", "mode since"];
    const COUNTDOWN_PREFIXES: [&str; 3] = ["countdown", "mode=countdown", "mode countdown"];

    if SINCE_PREFIXES.iter().any(|p| head.starts_with(p)) {
        Some(Mode::Since)
    } else if COUNTDOWN_PREFIXES.iter().any(|p| head.starts_with(p)) {
        Some(Mode::Countdown)
    } else if head.contains("ended") || head.contains("past") {
        Some(Mode::Since)
    } else if head.contains("upcoming") {
        Some(Mode::Countdown)
    } else {
        None
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config(""), ParsedConfig::default());
        assert_eq!(parse_config(" , ,"), ParsedConfig::default());
        assert_eq!(parse_config("").page, 1);
        assert_eq!(parse_config("").effective_mode(), Mode::Countdown);
    }

    #[test]
    fn test_since_with_index() {
        let config = parse_config("since,3");
        assert_eq!(config.mode, Some(Mode::Since));
        assert_eq!(config.target_index(), Some(3));
        assert!(config.selection_specified());
    }

    #[test]
    fn test_mode_display_and_name() {
        let config = parse_config("mode=since.circular.gym");
        assert_eq!(config.mode, Some(Mode::Since));
        assert_eq!(config.display, Some(DisplayVariant::Circular));
        assert_eq!(config.target_name(), Some("gym"));
    }

    #[test]
    fn test_grid_and_page() {
        let config = parse_config("col,pg2");
        assert!(config.grid_view);
        assert_eq!(config.page, 2);
        assert!(!config.selection_specified());
    }

    #[test]
    fn test_unit_suffix_and_name() {
        let config = parse_config("since.weeks.habit");
        assert_eq!(config.mode, Some(Mode::Since));
        assert_eq!(config.unit_override, Some(TimeUnit::Weeks));
        assert_eq!(config.target_name(), Some("habit"));
    }

    #[test]
    fn test_unit_alias_suffix() {
        assert_eq!(parse_config("since.yrs").unit_override, Some(TimeUnit::Years));
        assert_eq!(parse_config("since.hr").unit_override, Some(TimeUnit::Hours));
        assert_eq!(parse_config("since.mo").unit_override, Some(TimeUnit::Months));
    }

    #[test]
    fn test_rect_alias() {
        let config = parse_config("since.rect.streak");
        assert_eq!(config.display, Some(DisplayVariant::Rectangular));
        assert_eq!(config.target_name(), Some("streak"));
    }

    #[test]
    fn test_multi_segment_name_joined_with_spaces() {
        let config = parse_config("since.wk.circular.work.anniversary");
        assert_eq!(config.unit_override, Some(TimeUnit::Weeks));
        assert_eq!(config.display, Some(DisplayVariant::Circular));
        assert_eq!(config.target_name(), Some("work anniversary"));
    }

    #[test]
    fn test_display_token_without_mode() {
        let config = parse_config("topbar,5");
        assert_eq!(config.display, Some(DisplayVariant::Topbar));
        assert_eq!(config.mode, None);
        assert_eq!(config.effective_mode(), Mode::Countdown);
        assert_eq!(config.target_index(), Some(5));
    }

    #[test]
    fn test_leading_dot_display() {
        let config = parse_config(".circular");
        assert_eq!(config.display, Some(DisplayVariant::Circular));
        assert!(!config.selection_specified());
    }

    #[test]
    fn test_mode_spellings() {
        assert_eq!(parse_config("mode since").mode, Some(Mode::Since));
        assert_eq!(parse_config("mode=countdown").mode, Some(Mode::Countdown));
        assert_eq!(parse_config("ended").mode, Some(Mode::Since));
        assert_eq!(parse_config("past").mode, Some(Mode::Since));
        assert_eq!(parse_config("upcoming").mode, Some(Mode::Countdown));
    }

    #[test]
    fn test_later_tokens_override() {
        let config = parse_config("since,countdown,pg3,pg4");
        assert_eq!(config.mode, Some(Mode::Countdown));
        assert_eq!(config.page, 4);

        let config = parse_config("since.circular,topbar");
        assert_eq!(config.display, Some(DisplayVariant::Topbar));
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let config = parse_config(" SINCE , Work Anniversary ");
        assert_eq!(config.mode, Some(Mode::Since));
        assert_eq!(config.target_name(), Some("work anniversary"));
    }

    #[test]
    fn test_age_flag() {
        let config = parse_config("age,2");
        assert!(config.age_mode);
        assert_eq!(config.target_index(), Some(2));
    }

    #[test]
    fn test_invalid_page_defaults_to_one() {
        assert_eq!(parse_config("pgx").page, 1);
        assert_eq!(parse_config("pg").page, 1);
        assert_eq!(parse_config("pg0").page, 1);
    }

    #[test]
    fn test_selectors_keep_order() {
        let config = parse_config("mom,2,dad");
        assert_eq!(
            config.selectors,
            vec![
                Selector::Name("mom".to_string()),
                Selector::Index(2),
                Selector::Name("dad".to_string()),
            ]
        );
        assert_eq!(config.target_name(), Some("dad"));
    }

    #[test]
    fn test_plain_dotted_name_is_a_selector() {
        let config = parse_config("st. patrick");
        assert_eq!(config.target_name(), Some("st. patrick"));
        assert_eq!(config.mode, None);
    }

    #[test]
    fn test_tokenize_expands_suffixes() {
        assert_eq!(
            tokenize("since.weeks.circular.gym"),
            vec![
                Token::Mode(Mode::Since),
                Token::Unit(TimeUnit::Weeks),
                Token::Display(DisplayVariant::Circular),
                Token::Select(Selector::Name("gym".to_string())),
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let raw = "since.weeks.gym,pg2,age,col";
        assert_eq!(parse_config(raw), parse_config(raw));
        assert_eq!(raw.parse::<ParsedConfig>().unwrap(), parse_config(raw));
    }
}
