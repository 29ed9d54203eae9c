//! Template Resolver: expands `{{token}}` placeholders of a pretty log line.

use crate::domain::StackFrame;
use crate::render::PrettyLogStyles;
use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PRETTY_LOG_TEMPLATE: &str = "{{yyyy}}.{{mm}}.{{dd}} {{hh}}:{{MM}}:{{ss}}:{{ms}}\t{{logLevelName}}\t{{filePathWithLine}}{{nameWithDelimiterPrefix}}\t";

/// Fallback for time fields when no instant is known.
const MISSING_FIELD: &str = "--";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeZoneMode {
    #[default]
    #[serde(rename = "UTC")]
    Utc,
    #[serde(rename = "local")]
    Local,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time zone '{0}'. Valid values: UTC, local")]
pub struct TimeZoneParseError(pub String);

impl FromStr for TimeZoneMode {
    type Err = TimeZoneParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(TimeZoneMode::Utc),
            "local" => Ok(TimeZoneMode::Local),
            _ => Err(TimeZoneParseError(s.to_string())),
        }
    }
}

impl fmt::Display for TimeZoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneMode::Utc => f.write_str("UTC"),
            TimeZoneMode::Local => f.write_str("local"),
        }
    }
}

/// Everything a template may refer to.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateContext<'a> {
    pub instant: Option<DateTime<Utc>>,
    pub time_zone: TimeZoneMode,
    pub log_level_name: &'a str,
    /// Logger names already joined with the parent separator.
    pub name_path: &'a str,
    pub name_delimiter: &'a str,
    pub call_site: Option<&'a StackFrame>,
    /// Token styles; `None` resolves plain text.
    pub styles: Option<&'a PrettyLogStyles>,
}

#[derive(Debug, Clone, Copy)]
struct TimeFields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
}

impl TimeFields {
    fn new(instant: DateTime<Utc>, time_zone: TimeZoneMode) -> Self {
        match time_zone {
            TimeZoneMode::Utc => Self::from_datetime(&instant),
            TimeZoneMode::Local => Self::from_datetime(&instant.with_timezone(&Local)),
        }
    }

    fn from_datetime<T: Datelike + Timelike>(date: &T) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: date.hour(),
            minute: date.minute(),
            second: date.second(),
            // leap seconds report nanoseconds past 1e9
            millis: (date.nanosecond() / 1_000_000).min(999),
        }
    }

    fn date_iso(&self, separator: char) -> String {
        format!(
            "{:04}-{:02}-{:02}{separator}{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Expands every known `{{token}}` in `template`. Unknown tokens and
/// unterminated braces are copied through unchanged.
pub fn resolve(template: &str, ctx: &TemplateContext<'_>) -> String {
    let fields = ctx.instant.map(|instant| TimeFields::new(instant, ctx.time_zone));
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let token = &after[..end];

        // "{{ {{yyyy}}": the outer braces are literal text
        if let Some(inner) = token.find("{{") {
            out.push_str(&rest[start..start + 2 + inner]);
            rest = &after[inner..];
            continue;
        }

        match token_value(token, ctx, fields.as_ref()) {
            Some(value) => match ctx.styles {
                Some(styles) => out.push_str(&styles.apply(token, ctx.log_level_name, &value)),
                None => out.push_str(&value),
            },
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn token_value(token: &str, ctx: &TemplateContext<'_>, time: Option<&TimeFields>) -> Option<String> {
    let field = |pick: fn(&TimeFields) -> String| time.map_or_else(|| MISSING_FIELD.to_string(), pick);
    let site = |pick: fn(&StackFrame) -> String| ctx.call_site.map(pick).unwrap_or_default();

    let value = match token {
        "yyyy" => field(|t| format!("{:04}", t.year)),
        "mm" => field(|t| format!("{:02}", t.month)),
        "dd" => field(|t| format!("{:02}", t.day)),
        "hh" => field(|t| format!("{:02}", t.hour)),
        "MM" => field(|t| format!("{:02}", t.minute)),
        "ss" => field(|t| format!("{:02}", t.second)),
        "ms" => field(|t| format!("{:03}", t.millis)),
        "dateIsoStr" => field(|t| t.date_iso(' ')),
        "rawIsoStr" => field(|t| t.date_iso('T')),
        "logLevelName" => ctx.log_level_name.to_string(),
        "name" => ctx.name_path.to_string(),
        "nameWithDelimiterPrefix" if ctx.name_path.is_empty() => String::new(),
        "nameWithDelimiterPrefix" => format!("{}{}", ctx.name_delimiter, ctx.name_path),
        "nameWithDelimiterSuffix" if ctx.name_path.is_empty() => String::new(),
        "nameWithDelimiterSuffix" => format!("{}{}", ctx.name_path, ctx.name_delimiter),
        "fileName" => site(|f| f.file_name.clone()),
        "fileNameWithLine" => site(StackFrame::file_name_with_line),
        "filePath" => site(|f| f.file_path.clone()),
        "filePathWithLine" => site(StackFrame::file_path_with_line),
        "fullFilePath" => site(|f| f.full_file_path.clone()),
        "fileLine" => site(|f| f.line.to_string()),
        "fileColumn" => site(|f| f.column.to_string()),
        "method" => site(|f| f.method_or_anonymous().to_string()),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn epoch_ctx() -> TemplateContext<'static> {
        TemplateContext {
            instant: Utc.timestamp_opt(0, 0).single(),
            ..Default::default()
        }
    }

    #[test]
    fn test_epoch_date() {
        assert_eq!(resolve("{{yyyy}}-{{mm}}-{{dd}}", &epoch_ctx()), "1970-01-01");
    }

    #[rstest]
    #[case("{{hh}}:{{MM}}:{{ss}}.{{ms}}", "13:05:09.042")]
    #[case("{{dateIsoStr}}", "2023-02-03 13:05:09")]
    #[case("{{rawIsoStr}}", "2023-02-03T13:05:09")]
    #[case("{{unknown}} {{yyyy}}", "{{unknown}} 2023")]
    #[case("{{ {{yyyy}}", "{{ 2023")]
    #[case("open {{yyyy", "open {{yyyy")]
    #[case("no tokens", "no tokens")]
    fn test_time_tokens(#[case] template: &str, #[case] expected: &str) {
        let instant = Utc
            .with_ymd_and_hms(2023, 2, 3, 13, 5, 9)
            .single()
            .map(|t| t + chrono::Duration::milliseconds(42));
        let ctx = TemplateContext {
            instant,
            ..Default::default()
        };
        assert_eq!(resolve(template, &ctx), expected);
    }

    #[test]
    fn test_missing_instant() {
        let ctx = TemplateContext::default();
        assert_eq!(resolve("{{yyyy}}.{{ms}}", &ctx), "--.--");
    }

    #[test]
    fn test_local_time_zone_applies_offset() {
        let instant = Utc.timestamp_opt(0, 0).single();
        let ctx = TemplateContext {
            instant,
            time_zone: TimeZoneMode::Local,
            ..Default::default()
        };
        let expected = Utc
            .timestamp_opt(0, 0)
            .single()
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H").to_string());
        assert_eq!(Some(resolve("{{yyyy}}-{{mm}}-{{dd}} {{hh}}", &ctx)), expected);
    }

    #[test]
    fn test_name_and_call_site_tokens() {
        let frame = StackFrame::new("/srv/app/src/main.rs", 73, 5, None, Some("/srv/app"));
        let ctx = TemplateContext {
            log_level_name: "INFO",
            name_path: "parent:child",
            name_delimiter: "\t",
            call_site: Some(&frame),
            ..epoch_ctx()
        };

        assert_eq!(
            resolve("{{logLevelName}}\t{{filePathWithLine}}{{nameWithDelimiterPrefix}}\t", &ctx),
            "INFO\t/src/main.rs:73\tparent:child\t"
        );
        assert_eq!(resolve("{{fileName}}:{{fileLine}}:{{fileColumn}}", &ctx), "main.rs:73:5");
        assert_eq!(resolve("{{method}}", &ctx), "<anonymous>");
        assert_eq!(resolve("{{nameWithDelimiterSuffix}}", &ctx), "parent:child\t");
    }

    #[test]
    fn test_hidden_position_and_nameless() {
        let ctx = TemplateContext {
            log_level_name: "testLevel",
            name_delimiter: "\t",
            ..epoch_ctx()
        };
        let line = resolve(
            "{{logLevelName}}\t{{filePathWithLine}}{{nameWithDelimiterPrefix}}\t",
            &ctx,
        );
        assert_eq!(line, "testLevel\t\t");
    }

    #[test]
    fn test_styles_wrap_non_empty_tokens() {
        let styles = PrettyLogStyles::default();
        let ctx = TemplateContext {
            log_level_name: "INFO",
            styles: Some(&styles),
            ..epoch_ctx()
        };
        let line = resolve("{{logLevelName}}|{{name}}", &ctx);
        assert!(line.contains("INFO"));
        assert!(line.contains('\u{1b}'));
        assert!(line.ends_with('|'));
    }

    #[test]
    fn test_time_zone_parse() {
        assert_eq!("UTC".parse::<TimeZoneMode>(), Ok(TimeZoneMode::Utc));
        assert_eq!("Local".parse::<TimeZoneMode>(), Ok(TimeZoneMode::Local));
        assert!("mars".parse::<TimeZoneMode>().is_err());
        assert_eq!(TimeZoneMode::Local.to_string(), "local");
    }
}
