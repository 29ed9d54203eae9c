//! Terminal styling for rendered values and template tokens.

use console::Style;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed colour scheme for value kinds, applied only when styling is on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    enabled: bool,
}

impl Palette {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn string(&self, text: &str) -> String {
        self.paint(Style::new().green(), text)
    }

    pub(crate) fn number(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }

    pub(crate) fn boolean(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }

    pub(crate) fn null(&self, text: &str) -> String {
        self.paint(Style::new().bold(), text)
    }

    pub(crate) fn undefined(&self, text: &str) -> String {
        self.paint(Style::new().dim(), text)
    }

    pub(crate) fn date(&self, text: &str) -> String {
        self.paint(Style::new().magenta(), text)
    }

    pub(crate) fn special(&self, text: &str) -> String {
        self.paint(Style::new().cyan(), text)
    }

    pub(crate) fn error_name(&self, text: &str) -> String {
        self.paint(Style::new().red().bold(), text)
    }

    pub(crate) fn file(&self, text: &str) -> String {
        self.paint(Style::new().yellow(), text)
    }
}

/// Per-token styles for the pretty log template, as `console` dotted style
/// strings (e.g. `"bold.red"`, `"white.on_black"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrettyLogStyles {
    /// Keyed by template token name.
    pub tokens: BTreeMap<String, String>,
    /// Styles for `{{logLevelName}}` keyed by level name; `*` is the fallback.
    pub log_level_name: BTreeMap<String, String>,
}

impl Default for PrettyLogStyles {
    fn default() -> Self {
        let tokens = [
            ("yyyy", "dim"),
            ("mm", "dim"),
            ("dd", "dim"),
            ("hh", "dim"),
            ("MM", "dim"),
            ("ss", "dim"),
            ("ms", "dim"),
            ("dateIsoStr", "white"),
            ("rawIsoStr", "white"),
            ("fileName", "yellow"),
            ("fileNameWithLine", "white"),
            ("filePathWithLine", "white"),
            ("name", "white.bold"),
            ("nameWithDelimiterPrefix", "white.bold"),
            ("nameWithDelimiterSuffix", "white.bold"),
        ];
        let levels = [
            ("*", "bold.white.dim"),
            ("SILLY", "bold.white"),
            ("TRACE", "bold.white.bright"),
            ("DEBUG", "bold.green"),
            ("INFO", "bold.blue"),
            ("WARN", "bold.yellow"),
            ("ERROR", "bold.red"),
            ("FATAL", "bold.red.bright"),
        ];

        Self {
            tokens: tokens
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            log_level_name: levels
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl PrettyLogStyles {
    /// Wraps a resolved token value in its configured style.
    pub fn apply(&self, token: &str, level_name: &str, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let dotted = if token == "logLevelName" {
            self.log_level_name
                .get(level_name)
                .or_else(|| self.log_level_name.get("*"))
        } else {
            self.tokens.get(token)
        };

        match dotted {
            Some(dotted) => Style::from_dotted_str(dotted)
                .force_styling(true)
                .apply_to(text)
                .to_string(),
            None => text.to_string(),
        }
    }
}
