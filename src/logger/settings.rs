use super::options::LoggerOptions;
use crate::domain::LogValue;
use crate::mask::{DEFAULT_MASK_PLACEHOLDER, MaskRules};
use crate::render::{PrettyLogStyles, RenderOptions};
use crate::template::{DEFAULT_PRETTY_LOG_TEMPLATE, TimeZoneMode};
use regex::Regex;

/// Resolved, immutable configuration of one logger.
///
/// A sub-logger gets its own copy at creation time; later changes to the
/// parent never reach it. The minimum level lives outside the snapshot so
/// it can change between calls.
#[derive(Debug, Clone)]
pub struct LoggerSettings {
    pub name: Option<String>,
    pub parent_names: Vec<String>,
    pub min_level: u32,
    pub pretty_log_template: String,
    pub pretty_log_time_zone: TimeZoneMode,
    pub style_pretty_logs: bool,
    pub pretty_log_styles: PrettyLogStyles,
    pub arguments_array_name: Option<String>,
    pub meta_property: String,
    pub mask_values_of_keys: Vec<String>,
    pub mask_values_of_keys_case_insensitive: bool,
    pub mask_placeholder: String,
    pub mask_values_regex: Vec<Regex>,
    pub hide_log_position_for_production: bool,
    pub prefix: Vec<LogValue>,
    pub parent_names_separator: String,
    pub name_delimiter: String,
    pub indent_width: usize,
    pub max_depth: Option<usize>,
    pub call_site_skip_frames: usize,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            name: None,
            parent_names: Vec::new(),
            min_level: 0,
            pretty_log_template: DEFAULT_PRETTY_LOG_TEMPLATE.to_string(),
            pretty_log_time_zone: TimeZoneMode::Utc,
            style_pretty_logs: true,
            pretty_log_styles: PrettyLogStyles::default(),
            arguments_array_name: None,
            meta_property: "_meta".to_string(),
            mask_values_of_keys: vec!["password".to_string()],
            mask_values_of_keys_case_insensitive: false,
            mask_placeholder: DEFAULT_MASK_PLACEHOLDER.to_string(),
            mask_values_regex: Vec::new(),
            hide_log_position_for_production: false,
            prefix: Vec::new(),
            parent_names_separator: ":".to_string(),
            name_delimiter: "\t".to_string(),
            indent_width: 2,
            max_depth: None,
            call_site_skip_frames: 0,
        }
    }
}

impl LoggerSettings {
    /// Applies the overrides in `options` on top of this snapshot.
    pub fn merged(&self, options: &LoggerOptions) -> Self {
        let mut prefix = self.prefix.clone();
        prefix.extend(options.prefix.iter().cloned());

        Self {
            name: options.name.clone().or_else(|| self.name.clone()),
            parent_names: self.parent_names.clone(),
            min_level: options.min_level.unwrap_or(self.min_level),
            pretty_log_template: options
                .pretty_log_template
                .clone()
                .unwrap_or_else(|| self.pretty_log_template.clone()),
            pretty_log_time_zone: options.pretty_log_time_zone.unwrap_or(self.pretty_log_time_zone),
            style_pretty_logs: options.style_pretty_logs.unwrap_or(self.style_pretty_logs),
            pretty_log_styles: options
                .pretty_log_styles
                .clone()
                .unwrap_or_else(|| self.pretty_log_styles.clone()),
            arguments_array_name: options
                .arguments_array_name
                .clone()
                .or_else(|| self.arguments_array_name.clone()),
            meta_property: options
                .meta_property
                .clone()
                .unwrap_or_else(|| self.meta_property.clone()),
            mask_values_of_keys: options
                .mask_values_of_keys
                .clone()
                .unwrap_or_else(|| self.mask_values_of_keys.clone()),
            mask_values_of_keys_case_insensitive: options
                .mask_values_of_keys_case_insensitive
                .unwrap_or(self.mask_values_of_keys_case_insensitive),
            mask_placeholder: options
                .mask_placeholder
                .clone()
                .unwrap_or_else(|| self.mask_placeholder.clone()),
            mask_values_regex: options
                .mask_values_regex
                .clone()
                .unwrap_or_else(|| self.mask_values_regex.clone()),
            hide_log_position_for_production: options
                .hide_log_position_for_production
                .unwrap_or(self.hide_log_position_for_production),
            prefix,
            parent_names_separator: options
                .parent_names_separator
                .clone()
                .unwrap_or_else(|| self.parent_names_separator.clone()),
            name_delimiter: options
                .name_delimiter
                .clone()
                .unwrap_or_else(|| self.name_delimiter.clone()),
            indent_width: options.indent_width.unwrap_or(self.indent_width),
            max_depth: options.max_depth.or(self.max_depth),
            call_site_skip_frames: options
                .call_site_skip_frames
                .unwrap_or(self.call_site_skip_frames),
        }
    }

    pub fn mask_rules(&self) -> MaskRules {
        MaskRules::new(
            self.mask_values_of_keys.iter().cloned(),
            self.mask_values_regex.clone(),
            self.mask_values_of_keys_case_insensitive,
            self.mask_placeholder.clone(),
        )
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent_width: self.indent_width,
            max_depth: self.max_depth,
            colors: self.style_pretty_logs,
            quote_strings: false,
        }
    }
}
