//! Reading row files.
//!
//! A row file is either a JSON array of row objects or a raw Notion query
//! response (`{"results": [...]}`); `-` reads stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use countdown_engine::notion;
use countdown_engine::quote::ingest_quotes;
use countdown_engine::{ingest_rows, EventRecord, PropertyMap, QuotePropertyMap, QuoteRecord};
use serde_json::Value;

pub fn read_json(path: &Path) -> Result<Value> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn load_events(path: &Path, map: &PropertyMap) -> Result<Vec<EventRecord>> {
    let doc = read_json(path)?;
    let rows = if notion::is_query_response(&doc) {
        notion::event_rows(&doc, map)
    } else {
        rows_of(doc)?
    };
    let events = ingest_rows(&rows);
    log::info!("loaded {} of {} event rows", events.len(), rows.len());
    Ok(events)
}

pub fn load_quotes(path: &Path, map: &QuotePropertyMap) -> Result<Vec<QuoteRecord>> {
    let doc = read_json(path)?;
    let rows = if notion::is_query_response(&doc) {
        notion::quote_rows(&doc, map)
    } else {
        rows_of(doc)?
    };
    let quotes = ingest_quotes(&rows);
    log::info!("loaded {} of {} quote rows", quotes.len(), rows.len());
    Ok(quotes)
}

fn rows_of(doc: Value) -> Result<Vec<Value>> {
    match doc {
        Value::Array(rows) => Ok(rows),
        _ => bail!("Expected a JSON array of rows or a Notion query response"),
    }
}
