use super::config::{ConfigError, LevelSetting, LoggerConfig};
use crate::domain::LogLevel;
use crate::template::TimeZoneMode;
use clap::Parser;
use std::path::PathBuf;

/// Pretty-prints log lines read from stdin.
///
/// Settings are layered: defaults, then the config file, then `PRETTY_LOG_*`
/// environment variables, then flags.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c', env = "PRETTY_LOG_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Logger name shown in every line
    #[arg(long)]
    pub name: Option<String>,

    /// Minimum level (id or name) below which lines are dropped
    #[arg(long)]
    pub min_level: Option<LevelSetting>,

    /// Pretty log template with {{token}} placeholders
    #[arg(long)]
    pub template: Option<String>,

    /// Time zone used for template time tokens (UTC or local)
    #[arg(long)]
    pub time_zone: Option<TimeZoneMode>,

    /// Disable ANSI styling
    #[arg(long)]
    pub no_style: bool,

    /// Hide the call-site position column
    #[arg(long)]
    pub hide_position: bool,

    /// Object key whose value is masked (repeatable)
    #[arg(long = "mask-key")]
    pub mask_keys: Vec<String>,

    /// Regular expression masked inside values (repeatable)
    #[arg(long = "mask-pattern")]
    pub mask_patterns: Vec<String>,

    /// Level assigned to every input line
    #[arg(long, default_value = "info")]
    pub level: LogLevel,

    /// Filter for the tool's own diagnostics on stderr
    #[arg(long, env = "PRETTY_LOG_DIAGNOSTICS", default_value = "warn")]
    pub diagnostics_level: String,
}

impl Cli {
    /// Builds the effective configuration for this invocation.
    pub fn load_config(&self) -> Result<LoggerConfig, ConfigError> {
        let mut config = match &self.config_file {
            Some(path) => LoggerConfig::from_file(path)?,
            None => LoggerConfig::default(),
        };
        config.apply_env()?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut LoggerConfig) {
        if let Some(name) = &self.name {
            config.name = Some(name.clone());
        }
        if let Some(min_level) = &self.min_level {
            config.min_level = min_level.clone();
        }
        if let Some(template) = &self.template {
            config.pretty_log_template = Some(template.clone());
        }
        if let Some(time_zone) = self.time_zone {
            config.pretty_log_time_zone = time_zone;
        }
        if self.no_style {
            config.style_pretty_logs = false;
        }
        if self.hide_position {
            config.hide_log_position_for_production = true;
        }
        if !self.mask_keys.is_empty() {
            config.mask_values_of_keys = self.mask_keys.clone();
        }
        if !self.mask_patterns.is_empty() {
            config.mask_values_regex = self.mask_patterns.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "rask-pretty-log",
            "--name",
            "stdin",
            "--min-level",
            "warn",
            "--time-zone",
            "local",
            "--no-style",
            "--mask-key",
            "token",
            "--mask-key",
            "secret",
            "--level",
            "error",
        ]);

        let mut config = LoggerConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.name.as_deref(), Some("stdin"));
        assert_eq!(config.min_level.id().unwrap(), 4);
        assert_eq!(config.pretty_log_time_zone, TimeZoneMode::Local);
        assert!(!config.style_pretty_logs);
        assert_eq!(config.mask_values_of_keys, vec!["token", "secret"]);
        assert_eq!(cli.level, LogLevel::Error);
    }

    #[test]
    fn test_invalid_time_zone_is_rejected() {
        let result = Cli::try_parse_from(["rask-pretty-log", "--time-zone", "mars"]);
        assert!(result.is_err());
    }
}
