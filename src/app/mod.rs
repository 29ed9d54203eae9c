pub mod cli;
pub mod config;
pub mod logging_system;

pub use cli::Cli;
pub use config::{ConfigError, LevelSetting, LoggerConfig};
pub use logging_system::{DiagnosticsError, init_diagnostics};

use crate::domain::LogValue;
use crate::logger::Logger;
use crate::sink::{ConsoleSink, Sink};
use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, info};

pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_diagnostics(&cli.diagnostics_level)?;

    let stdin = std::io::stdin();
    let logged = run(&cli, stdin.lock(), Arc::new(ConsoleSink))?;
    info!(logged, "input exhausted");
    Ok(())
}

/// Pretty-logs every non-blank line of `input` and returns how many lines
/// were emitted.
pub fn run<R: BufRead>(cli: &Cli, input: R, sink: Arc<dyn Sink>) -> anyhow::Result<usize> {
    let config = cli.load_config().context("failed to load logger configuration")?;
    let logger = Logger::builder()
        .options(config.to_options()?)
        .sink(sink)
        .build();
    debug!(?config, "logger configured");

    let mut logged = 0;
    for line in input.lines() {
        let line = line.context("failed to read input line")?;
        if line.trim().is_empty() {
            continue;
        }
        if logger.log_level(cli.level, vec![parse_line(&line)]).is_some() {
            logged += 1;
        }
    }
    Ok(logged)
}

/// JSON objects and arrays become structured values; anything else stays text.
pub fn parse_line(line: &str) -> LogValue {
    match serde_json::from_str::<serde_json::Value>(line) {
        Ok(json @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
            LogValue::from(json)
        }
        _ => LogValue::from(line),
    }
}
