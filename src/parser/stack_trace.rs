use super::regex_patterns::GrammarTable;
use crate::domain::StackFrame;
use crate::domain::stack_frame::working_dir;
use std::path::Path;
use tracing::{trace, warn};

/// Line grammars understood by the parser, tried in order.
///
/// - `location_frame`: `at Method.name (path:line:col)`, `at path:line:col`
///   (V8 frames and the location line of a `std::backtrace` frame)
/// - `backtrace_symbol`: `  12: crate::module::function` (`std::backtrace`)
static FRAME_GRAMMARS: GrammarTable = GrammarTable::new(&[
    (
        "location_frame",
        r"^\s*at\s+(?:(?P<method>.+?)\s+\()?(?P<path>.+?):(?P<line>\d+):(?P<column>\d+)\)?\s*$",
    ),
    ("backtrace_symbol", r"^\s*(?P<index>\d+):\s+(?P<symbol>\S.*?)\s*$"),
]);

/// The `::h0123456789abcdef` suffix of legacy mangled symbols.
static SYMBOL_HASH: GrammarTable = GrammarTable::new(&[("symbol_hash", r"::h[0-9a-f]{16}$")]);

/// Turns raw stack text into ordered frames, call site first.
#[derive(Debug, Clone, Default)]
pub struct StackTraceParser {
    root: Option<String>,
}

impl StackTraceParser {
    /// Parser that shortens paths relative to the process working directory.
    pub fn new() -> Self {
        Self {
            root: working_dir().map(str::to_string),
        }
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root
                .as_ref()
                .to_str()
                .map(|root| root.trim_end_matches('/').to_string()),
        }
    }

    /// Parser that keeps paths as written (only a leading `/` is ensured).
    pub fn without_root() -> Self {
        Self { root: None }
    }

    pub fn parse(&self, raw: &str) -> Vec<StackFrame> {
        let hash = match SYMBOL_HASH.get("symbol_hash") {
            Ok(hash) => hash,
            Err(e) => {
                warn!(error = %e, "stack frame grammars unavailable");
                return Vec::new();
            }
        };

        let mut frames = Vec::new();
        let mut pending_symbol: Option<String> = None;

        for line in raw.lines() {
            match FRAME_GRAMMARS.classify(line) {
                Ok(Some(("location_frame", caps))) => {
                    let method = caps
                        .name("method")
                        .map(|m| m.as_str().to_string())
                        .or_else(|| pending_symbol.take());
                    pending_symbol = None;

                    let (Ok(line_number), Ok(column)) =
                        (caps["line"].parse::<u32>(), caps["column"].parse::<u32>())
                    else {
                        trace!(line, "skipping stack line with out-of-range position");
                        continue;
                    };

                    frames.push(StackFrame::new(
                        &caps["path"],
                        line_number,
                        column,
                        method,
                        self.root.as_deref(),
                    ));
                }
                Ok(Some((_, caps))) => {
                    pending_symbol = Some(hash.replace(&caps["symbol"], "").into_owned());
                }
                Ok(None) => {
                    trace!(line, "skipping unrecognised stack line");
                    pending_symbol = None;
                }
                Err(e) => {
                    warn!(error = %e, "stack frame grammars unavailable");
                    return Vec::new();
                }
            }
        }

        frames
    }
}

/// Parses with the working directory as path root.
pub fn parse_stack(raw: &str) -> Vec<StackFrame> {
    StackTraceParser::new().parse(raw)
}
