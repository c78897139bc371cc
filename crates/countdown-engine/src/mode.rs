//! Countdown vs. since display modes.

use serde::{Deserialize, Serialize};

/// Whether an event counts down to its next occurrence or up from a past date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Time remaining until the next yearly occurrence.
    #[default]
    Countdown,
    /// Time elapsed since a past date.
    Since,
}

impl Mode {
    /// Infer a mode from a free-text label such as a Notion "Event Type".
    ///
    /// Labels mentioning `since`, `ended` or `past` mean [`Mode::Since`];
    /// labels mentioning `count` or `upcoming` mean [`Mode::Countdown`].
    pub fn from_label(label: &str) -> Option<Mode> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return None;
        }
        if label.contains("since") || label.contains("ended") || label.contains("past") {
            Some(Mode::Since)
        } else if label.contains("count") || label.contains("upcoming") {
            Some(Mode::Countdown)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Countdown => "countdown",
            Mode::Since => "since",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
