use crate::domain::LogLevel;
use crate::logger::LoggerOptions;
use crate::mask::DEFAULT_MASK_PLACEHOLDER;
use crate::render::PrettyLogStyles;
use crate::template::TimeZoneMode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid mask pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Minimum level as written in config: a numeric id or a level name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelSetting {
    Id(u32),
    Name(String),
}

impl Default for LevelSetting {
    fn default() -> Self {
        LevelSetting::Id(0)
    }
}

impl LevelSetting {
    pub fn id(&self) -> Result<u32, ConfigError> {
        match self {
            LevelSetting::Id(id) => Ok(*id),
            LevelSetting::Name(name) => name
                .parse::<LogLevel>()
                .map(LogLevel::id)
                .map_err(|e| ConfigError::InvalidConfig(e.to_string())),
        }
    }
}

impl FromStr for LevelSetting {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<u32>() {
            Ok(id) => LevelSetting::Id(id),
            Err(_) => LevelSetting::Name(s.trim().to_string()),
        })
    }
}

impl fmt::Display for LevelSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSetting::Id(id) => write!(f, "{id}"),
            LevelSetting::Name(name) => f.write_str(name),
        }
    }
}

/// File and environment configuration of a root logger.
///
/// Field names follow the logger options (`minLevel`, `maskValuesOfKeys`,
/// `maskValuesRegEx`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub name: Option<String>,
    pub min_level: LevelSetting,
    pub pretty_log_template: Option<String>,
    pub pretty_log_time_zone: TimeZoneMode,
    pub style_pretty_logs: bool,
    pub pretty_log_styles: Option<PrettyLogStyles>,
    pub arguments_array_name: Option<String>,
    pub meta_property: Option<String>,
    pub mask_values_of_keys: Vec<String>,
    pub mask_values_of_keys_case_insensitive: bool,
    pub mask_placeholder: String,
    #[serde(rename = "maskValuesRegEx")]
    pub mask_values_regex: Vec<String>,
    pub hide_log_position_for_production: bool,
    pub parent_names_separator: Option<String>,
    pub name_delimiter: Option<String>,
    pub indent_width: usize,
    pub max_depth: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: None,
            min_level: LevelSetting::default(),
            pretty_log_template: None,
            pretty_log_time_zone: TimeZoneMode::Utc,
            style_pretty_logs: true,
            pretty_log_styles: None,
            arguments_array_name: None,
            meta_property: None,
            mask_values_of_keys: vec!["password".to_string()],
            mask_values_of_keys_case_insensitive: false,
            mask_placeholder: DEFAULT_MASK_PLACEHOLDER.to_string(),
            mask_values_regex: Vec::new(),
            hide_log_position_for_production: false,
            parent_names_separator: None,
            name_delimiter: None,
            indent_width: 2,
            max_depth: None,
        }
    }
}

impl LoggerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoggerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Defaults overridden by `PRETTY_LOG_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = LoggerConfig::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        load_env_string_opt("PRETTY_LOG_NAME", &mut self.name);
        load_env_var("PRETTY_LOG_MIN_LEVEL", &mut self.min_level)?;
        load_env_string_opt("PRETTY_LOG_TEMPLATE", &mut self.pretty_log_template);
        load_env_var("PRETTY_LOG_TIME_ZONE", &mut self.pretty_log_time_zone)?;
        load_env_var("PRETTY_LOG_STYLE", &mut self.style_pretty_logs)?;
        load_env_var(
            "PRETTY_LOG_HIDE_POSITION",
            &mut self.hide_log_position_for_production,
        )?;
        load_env_list("PRETTY_LOG_MASK_KEYS", &mut self.mask_values_of_keys);
        load_env_list("PRETTY_LOG_MASK_PATTERNS", &mut self.mask_values_regex);
        load_env_string("PRETTY_LOG_MASK_PLACEHOLDER", &mut self.mask_placeholder);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.min_level.id()?;

        if self.indent_width > 16 {
            return Err(ConfigError::InvalidConfig(format!(
                "Indent width ({}) must not exceed 16",
                self.indent_width
            )));
        }

        if self.meta_property.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidConfig(
                "Meta property name must not be empty".to_string(),
            ));
        }

        if self.mask_placeholder.is_empty() {
            warn!("mask placeholder is empty, masked values will disappear from output");
        }

        self.compile_patterns()?;
        Ok(())
    }

    pub fn compile_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
        self.mask_values_regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn to_options(&self) -> Result<LoggerOptions, ConfigError> {
        Ok(LoggerOptions {
            name: self.name.clone(),
            min_level: Some(self.min_level.id()?),
            pretty_log_template: self.pretty_log_template.clone(),
            pretty_log_time_zone: Some(self.pretty_log_time_zone),
            style_pretty_logs: Some(self.style_pretty_logs),
            pretty_log_styles: self.pretty_log_styles.clone(),
            arguments_array_name: self.arguments_array_name.clone(),
            meta_property: self.meta_property.clone(),
            mask_values_of_keys: Some(self.mask_values_of_keys.clone()),
            mask_values_of_keys_case_insensitive: Some(self.mask_values_of_keys_case_insensitive),
            mask_placeholder: Some(self.mask_placeholder.clone()),
            mask_values_regex: Some(self.compile_patterns()?),
            hide_log_position_for_production: Some(self.hide_log_position_for_production),
            parent_names_separator: self.parent_names_separator.clone(),
            name_delimiter: self.name_delimiter.clone(),
            indent_width: Some(self.indent_width),
            max_depth: self.max_depth,
            ..Default::default()
        })
    }
}

/// Loads and parses an environment variable; a missing variable keeps the
/// current value.
fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

fn load_env_string_opt(name: &str, target: &mut Option<String>) {
    if let Ok(value) = std::env::var(name) {
        *target = Some(value);
    }
}

fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}

/// Comma separated list; empty items are dropped.
fn load_env_list(name: &str, target: &mut Vec<String>) {
    if let Ok(value) = std::env::var(name) {
        *target = value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
    }
}
