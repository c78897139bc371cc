//! Decoding Notion query responses into rows.
//!
//! The widgets read a Notion data source (`POST /v1/data_sources/{id}/query`).
//! Fetching is the caller's business; this module only turns the response
//! JSON into [`RawRow`]s that [`crate::record`] and [`crate::quote`] ingest.
//! Column names are configurable through [`PropertyMap`] and
//! [`QuotePropertyMap`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::RawRow;

/// Notion property names for event databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyMap {
    /// Fallback name property when the page has no non-empty title.
    pub name: String,
    pub date: String,
    pub event_type: String,
    pub icon: String,
    pub color: String,
    pub text_color: String,
    pub aliases: String,
}

impl Default for PropertyMap {
    fn default() -> Self {
        PropertyMap {
            name: "Title".to_string(),
            date: "Event Date".to_string(),
            event_type: "Event Type".to_string(),
            icon: "Widget Emoji".to_string(),
            color: "Widget Clr".to_string(),
            text_color: "Widget TxtClr".to_string(),
            aliases: "Aliases".to_string(),
        }
    }
}

/// Notion property names for quote databases. The quote is the page title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotePropertyMap {
    pub author: String,
    pub category: String,
}

impl Default for QuotePropertyMap {
    fn default() -> Self {
        QuotePropertyMap {
            author: "Author".to_string(),
            category: "Category".to_string(),
        }
    }
}

/// Whether a JSON document looks like a Notion query response.
pub fn is_query_response(doc: &Value) -> bool {
    doc.get("results").is_some_and(Value::is_array)
}

/// Decode every page of a query response into an event row.
pub fn event_rows(response: &Value, map: &PropertyMap) -> Vec<Value> {
    pages(response)
        .iter()
        .map(|page| Value::Object(event_row(page, map)))
        .collect()
}

/// Decode one page into an event row keyed the way
/// [`EventRecord::from_row`](crate::record::EventRecord::from_row) expects.
pub fn event_row(page: &Value, map: &PropertyMap) -> RawRow {
    let name = page_title(page)
        .or_else(|| mapped_text(page, &map.name))
        .unwrap_or_else(|| untitled(page));

    let mut row = RawRow::new();
    row.insert("name".to_string(), Value::String(name));
    let fields = [
        ("date", &map.date),
        ("event type", &map.event_type),
        ("icon", &map.icon),
        ("color", &map.color),
        ("widget txtclr", &map.text_color),
        ("aliases", &map.aliases),
    ];
    for (key, property) in fields {
        if let Some(text) = mapped_text(page, property) {
            row.insert(key.to_string(), Value::String(text));
        }
    }
    row
}

/// Decode every page of a query response into a quote row
/// (`quote`, `author`, `category`).
pub fn quote_rows(response: &Value, map: &QuotePropertyMap) -> Vec<Value> {
    pages(response)
        .iter()
        .map(|page| {
            let mut row = RawRow::new();
            let fields = [
                ("quote", page_title(page)),
                ("author", mapped_text(page, &map.author)),
                ("category", mapped_text(page, &map.category)),
            ];
            for (key, text) in fields {
                row.insert(key.to_string(), Value::String(text.unwrap_or_default()));
            }
            Value::Object(row)
        })
        .collect()
}

/// Plain text of a Notion property value.
///
/// Handles `title`, `rich_text`, `select`, `multi_select` (joined with
/// `", "`), `formula` (string or number) and `date` (the start).
pub fn property_text(prop: &Value) -> Option<String> {
    let text = plain_text(prop.get("title"))
        .or_else(|| plain_text(prop.get("rich_text")))
        .or_else(|| select_name(prop.get("select")))
        .or_else(|| {
            let names: Vec<String> = prop
                .get("multi_select")?
                .as_array()?
                .iter()
                .filter_map(|s| select_name(Some(s)))
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        })
        .or_else(|| {
            let formula = prop.get("formula")?;
            formula
                .get("string")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| formula.get("number").filter(|n| n.is_number()).map(Value::to_string))
        })
        .or_else(|| {
            prop.get("date")?
                .get("start")?
                .as_str()
                .map(str::to_string)
        })?;
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// The first non-empty `title` property of a page.
pub fn page_title(page: &Value) -> Option<String> {
    page.get("properties")?
        .as_object()?
        .values()
        .filter(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
        .find_map(|prop| plain_text(prop.get("title")))
}

// ── Internal helpers ────────────────────────────────────────────────────────

fn pages(response: &Value) -> &[Value] {
    match response.get("results").and_then(Value::as_array) {
        Some(results) => results,
        None => {
            log::debug!("query response has no results array");
            &[]
        }
    }
}

fn mapped_text(page: &Value, property: &str) -> Option<String> {
    page.get("properties")?.get(property).and_then(property_text)
}

fn plain_text(rich: Option<&Value>) -> Option<String> {
    let text: String = rich?
        .as_array()?
        .iter()
        .filter_map(|t| t.get("plain_text").and_then(Value::as_str))
        .collect();
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn select_name(select: Option<&Value>) -> Option<String> {
    select?
        .get("name")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn untitled(page: &Value) -> String {
    match page.get("id").and_then(Value::as_str) {
        Some(id) => {
            let tail = id.get(id.len().saturating_sub(6)..).unwrap_or(id);
            format!("Untitled ({tail})")
        }
        None => "Untitled".to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
