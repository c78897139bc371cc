//! # countdown-engine
//!
//! Event formatting for countdown and quote widgets.
//!
//! The engine turns loosely-typed rows (from a Notion database or a JSON
//! file) into typed event records and decides what a widget shows: which
//! event, how many days until or since it, in which unit, with which colors.
//! Every operation is pure. Nothing reads the clock; callers pass "today".
//!
//! ## Modules
//!
//! - [`date`] — Local calendar date parsing (ISO, US, fallback formats)
//! - [`duration`] — Days until the next yearly occurrence, days since, age
//! - [`units`] — Day counts → value + unit noun, with pluralization
//! - [`params`] — The widget parameter mini-language
//! - [`record`] — Event records and row ingestion
//! - [`notion`] — Notion query response decoding
//! - [`select`] — Event selection, candidate ordering, paging
//! - [`present`] — Display bundles and per-render styling
//! - [`quote`] — Quote card selection and colors
//! - [`mode`] — Countdown vs. since
//! - [`error`] — Error types

pub mod date;
pub mod duration;
pub mod error;
pub mod mode;
pub mod notion;
pub mod params;
pub mod present;
pub mod quote;
pub mod record;
pub mod select;
pub mod units;

pub use date::{format_long_date, normalize_date, today_in_timezone};
pub use duration::{age_on, days_since, days_until, next_occurrence, AgeInfo};
pub use error::EngineError;
pub use mode::Mode;
pub use notion::{event_rows, quote_rows, PropertyMap, QuotePropertyMap};
pub use params::{parse_config, DisplayVariant, ParsedConfig, Selector};
pub use present::{DisplayBundle, RenderContext};
pub use quote::{
    parse_quote_config, pick_color_pair, select_quote, ColorPair, QuoteCard, QuoteConfig,
    QuoteRecord, QuoteSize, RefreshInterval,
};
pub use record::{ingest_rows, EventRecord};
pub use select::{page_of, select_event, selector_candidates, Selection, WidgetFamily};
pub use units::{format_duration, FormattedDuration, TimeUnit};
