//! The optional TOML config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use countdown_engine::{ColorPair, PropertyMap, QuotePropertyMap, RenderContext};
use serde::Deserialize;

/// Configuration at ~/.config/countdown/config.toml
///
/// Every key is optional; a missing file means defaults.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// IANA timezone used to determine today when `--tz` is not given.
    pub timezone: Option<String>,

    pub render: RenderContext,

    pub notion: NotionConfig,

    /// Categories the quote parameter recognizes.
    pub quote_categories: Vec<String>,

    /// Quote card background/font pairs; empty means white on black.
    pub color_pairs: Vec<ColorPair>,
}

/// Notion property names.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NotionConfig {
    pub events: PropertyMap,
    pub quotes: QuotePropertyMap,
}

impl CliConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("countdown");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::config_path() {
                Ok(p) => (p, false),
                Err(e) => {
                    log::debug!("{e}; using default config");
                    return Ok(Self::default());
                }
            },
        };

        if !required && !path.exists() {
            log::debug!("no config at {}", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
