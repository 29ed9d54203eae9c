use crate::domain::LogValue;
use crate::render::PrettyLogStyles;
use crate::template::TimeZoneMode;
use regex::Regex;

/// Construction options for a logger or sub-logger.
///
/// Every field is an override: `None` keeps the default (for a root logger)
/// or the parent's value (for a sub-logger). `prefix` is appended to the
/// parent's prefix.
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    pub name: Option<String>,
    pub min_level: Option<u32>,
    pub pretty_log_template: Option<String>,
    pub pretty_log_time_zone: Option<TimeZoneMode>,
    pub style_pretty_logs: Option<bool>,
    pub pretty_log_styles: Option<PrettyLogStyles>,
    pub arguments_array_name: Option<String>,
    pub meta_property: Option<String>,
    pub mask_values_of_keys: Option<Vec<String>>,
    pub mask_values_of_keys_case_insensitive: Option<bool>,
    pub mask_placeholder: Option<String>,
    pub mask_values_regex: Option<Vec<Regex>>,
    pub hide_log_position_for_production: Option<bool>,
    pub prefix: Vec<LogValue>,
    pub parent_names_separator: Option<String>,
    pub name_delimiter: Option<String>,
    pub indent_width: Option<usize>,
    pub max_depth: Option<usize>,
    /// Leading frames of the captured stack that belong to the logger itself.
    pub call_site_skip_frames: Option<usize>,
}

impl LoggerOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}
