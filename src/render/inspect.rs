use super::style::Palette;
use crate::domain::value::{iso_millis, number_to_string};
use crate::domain::{LogError, LogValue};
use std::sync::Arc;
use tracing::debug;

/// Token emitted in place of a container that is already being rendered.
pub const CIRCULAR_MARKER: &str = "[Circular]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces added per nesting level.
    pub indent_width: usize,
    /// Containers nested deeper than this print as `[Array]` / `[Object]`.
    /// `None` renders the whole graph.
    pub max_depth: Option<usize>,
    /// Wrap leaves in ANSI styles.
    pub colors: bool,
    /// Quote a top-level string. Nested strings are always quoted.
    pub quote_strings: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            max_depth: None,
            colors: false,
            quote_strings: false,
        }
    }
}

/// Renders a single value into human-readable, possibly multi-line text.
///
/// Never fails: cycles become [`CIRCULAR_MARKER`] and failing custom values
/// become a `<render error: ...>` token.
pub fn render(value: &LogValue, options: &RenderOptions) -> String {
    let mut renderer = Renderer {
        options,
        palette: Palette::new(options.colors),
        ancestors: Vec::new(),
    };
    renderer.value(value, 0, options.quote_strings)
}

struct Renderer<'a> {
    options: &'a RenderOptions,
    palette: Palette,
    ancestors: Vec<usize>,
}

impl Renderer<'_> {
    fn value(&mut self, value: &LogValue, depth: usize, quote: bool) -> String {
        if let Some(id) = value.container_id()
            && self.ancestors.contains(&id)
        {
            return self.palette.special(CIRCULAR_MARKER);
        }

        match value {
            LogValue::Undefined => self.palette.undefined("undefined"),
            LogValue::Null => self.palette.null("null"),
            LogValue::Str(s) if quote => self.palette.string(&quote_str(s)),
            LogValue::Str(s) => s.clone(),
            LogValue::Number(n) => self.palette.number(&number_to_string(*n)),
            LogValue::Bool(b) => self.palette.boolean(&b.to_string()),
            LogValue::Buffer(bytes) => {
                let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
                self.palette.special(&format!("<Buffer {}>", hex.join(" ")))
            }
            LogValue::Date(date) => self.palette.date(&iso_millis(date)),
            LogValue::Error(error) => self.error(error, depth),
            LogValue::Array(items) => {
                if self.too_deep(depth) {
                    return self.palette.special("[Array]");
                }
                let snapshot = items.read().clone();
                if snapshot.is_empty() {
                    return "[]".to_string();
                }

                self.ancestors.push(Arc::as_ptr(items) as *const () as usize);
                let pad = self.pad(depth + 1);
                let lines: Vec<String> = snapshot
                    .iter()
                    .map(|item| format!("{pad}{}", self.value(item, depth + 1, true)))
                    .collect();
                self.ancestors.pop();

                format!("[\n{}\n{}]", lines.join(",\n"), self.pad(depth))
            }
            LogValue::Object(entries) => {
                if self.too_deep(depth) {
                    return self.palette.special("[Object]");
                }
                let snapshot = entries.read().clone();
                if snapshot.is_empty() {
                    return "{}".to_string();
                }

                self.ancestors.push(Arc::as_ptr(entries) as *const () as usize);
                let pad = self.pad(depth + 1);
                let lines: Vec<String> = snapshot
                    .iter()
                    .map(|(key, item)| {
                        format!("{pad}{}: {}", format_key(key), self.value(item, depth + 1, true))
                    })
                    .collect();
                self.ancestors.pop();

                format!("{{\n{}\n{}}}", lines.join(",\n"), self.pad(depth))
            }
            LogValue::Custom(custom) => match custom.render() {
                Ok(text) => text,
                Err(e) => {
                    debug!(type_name = custom.type_name(), error = %e, "custom value failed to render");
                    self.palette.special(&format!("<render error: {e}>"))
                }
            },
        }
    }

    fn error(&self, error: &LogError, depth: usize) -> String {
        let mut out = self.palette.error_name(error.name());
        if !error.message().is_empty() {
            out.push_str(": ");
            out.push_str(error.message());
        }

        let pad = self.pad(depth);
        let frame_pad = self.pad(depth + 1);
        let lines: Vec<String> = error
            .stack_frames()
            .iter()
            .map(|frame| {
                format!(
                    "{frame_pad}• {}\t{}:{}:{}",
                    frame.method_or_anonymous(),
                    self.palette.file(&frame.file_path),
                    frame.line,
                    frame.column
                )
            })
            .collect();
        out.push_str(&format!("\n{pad}error stack:\n"));
        out.push_str(&lines.join("\n"));

        for cause in error.causes() {
            out.push_str(&format!("\n{pad}caused by: {cause}"));
        }
        out
    }

    fn too_deep(&self, depth: usize) -> bool {
        self.options.max_depth.is_some_and(|max| depth > max)
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(self.options.indent_width * depth)
    }
}

fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn format_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        key.to_string()
    } else {
        quote_str(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomValue, RenderError};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn plain(value: &LogValue) -> String {
        render(value, &RenderOptions::default())
    }

    struct Broken;

    impl CustomValue for Broken {
        fn type_name(&self) -> &str {
            "Broken"
        }

        fn render(&self) -> Result<String, RenderError> {
            Err(RenderError::custom("Broken", "no display"))
        }
    }

    #[rstest]
    #[case(LogValue::Undefined, "undefined")]
    #[case(LogValue::Null, "null")]
    #[case(LogValue::from("Test"), "Test")]
    #[case(LogValue::from(555), "555")]
    #[case(LogValue::from(1.5), "1.5")]
    #[case(LogValue::Number(f64::NAN), "NaN")]
    #[case(LogValue::Number(f64::INFINITY), "Infinity")]
    #[case(LogValue::from(true), "true")]
    #[case(LogValue::from(false), "false")]
    fn test_primitives_render_canonically(#[case] value: LogValue, #[case] expected: &str) {
        assert_eq!(plain(&value), expected);
    }

    #[test]
    fn test_buffer() {
        assert_eq!(plain(&LogValue::buffer(&b"foo"[..])), "<Buffer 66 6f 6f>");
        assert_eq!(plain(&LogValue::buffer(vec![0x00u8, 0xff])), "<Buffer 00 ff>");
    }

    #[test]
    fn test_date() {
        let date = Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(plain(&LogValue::date(date)), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_array_multiline() {
        let value = LogValue::array([
            LogValue::from(1),
            LogValue::from(2),
            LogValue::from(3),
            LogValue::from("test"),
        ]);
        assert_eq!(plain(&value), "[\n  1,\n  2,\n  3,\n  'test'\n]");
    }

    #[test]
    fn test_nested_object() {
        let value = LogValue::object([
            ("test", LogValue::from(true)),
            ("nested", LogValue::object([("1", false)])),
        ]);
        assert_eq!(
            plain(&value),
            "{\n  test: true,\n  nested: {\n    '1': false\n  }\n}"
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(plain(&LogValue::array(Vec::<LogValue>::new())), "[]");
        assert_eq!(plain(&LogValue::object(Vec::<(String, LogValue)>::new())), "{}");
    }

    #[test]
    fn test_quoting_and_escapes() {
        let value = LogValue::array(["it's", "a\nb"]);
        assert_eq!(plain(&value), "[\n  'it\\'s',\n  'a\\nb'\n]");

        let options = RenderOptions {
            quote_strings: true,
            ..Default::default()
        };
        assert_eq!(render(&LogValue::from("top"), &options), "'top'");
    }

    #[test]
    fn test_cycle_terminates_with_marker() {
        let object = LogValue::object([("name", "root")]);
        let list = LogValue::array([object.clone()]);
        object.insert("children", list.clone());

        let text = plain(&object);
        assert!(text.contains(CIRCULAR_MARKER));
        assert!(text.starts_with("{\n  name: 'root',"));
    }

    #[test]
    fn test_shared_but_acyclic_is_not_circular() {
        let shared = LogValue::object([("x", 1)]);
        let value = LogValue::array([shared.clone(), shared]);
        assert!(!plain(&value).contains(CIRCULAR_MARKER));
    }

    #[test]
    fn test_max_depth() {
        let value = LogValue::object([(
            "a",
            LogValue::object([("b", LogValue::array([1]))]),
        )]);
        let options = RenderOptions {
            max_depth: Some(1),
            ..Default::default()
        };
        assert_eq!(
            render(&value, &options),
            "{\n  a: {\n    b: [Array]\n  }\n}"
        );
    }

    #[test]
    fn test_error_with_stack() {
        let error = LogError::with_stack(
            "Error",
            "test",
            "Error: test\n    at Object.<anonymous> (/app/tests/run.test.ts:93:26)",
        )
        .with_cause("disk gone");
        let text = plain(&LogValue::error(error));

        assert!(text.starts_with("Error: test\nerror stack:\n"));
        assert!(text.contains("• Object.<anonymous>\t"));
        assert!(text.contains("run.test.ts:93:26"));
        assert!(text.ends_with("caused by: disk gone"));
    }

    #[test]
    fn test_error_without_parseable_frames_keeps_stack_header() {
        let error = LogError::with_stack("Error", "x", "Error: x\n    at native code");
        assert_eq!(plain(&LogValue::error(error)), "Error: x\nerror stack:\n");

        let nested = LogValue::object([("err", LogError::with_stack("TypeError", "bad", ""))]);
        assert_eq!(
            plain(&nested),
            "{\n  err: TypeError: bad\n  error stack:\n\n}"
        );
    }

    #[test]
    fn test_custom_render_failure_is_contained() {
        let value = LogValue::array([LogValue::custom(Broken), LogValue::from(1)]);
        let text = plain(&value);
        assert!(text.contains("<render error: "));
        assert!(text.contains("  1\n]"));
    }

    #[test]
    fn test_colors_keep_text() {
        let options = RenderOptions {
            colors: true,
            ..Default::default()
        };
        let text = render(&LogValue::array(["x"]), &options);
        assert!(text.contains("'x'"));
        assert!(text.contains('\u{1b}'));
    }
}
