use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum DiagnosticsError {
    #[error("Invalid diagnostics filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("Failed to install diagnostics subscriber: {0}")]
    InstallFailed(String),
}

/// Targets that stay quiet unless asked for explicitly.
const DEFAULT_DIRECTIVES: &[&str] = &["regex=warn"];

/// Joins the default level with per-target directives into an `EnvFilter`
/// string.
pub fn build_filter_string(default_level: &str, directives: &[&str]) -> String {
    let mut parts = Vec::with_capacity(directives.len() + 1);
    parts.push(default_level.trim().to_lowercase());
    parts.extend(
        directives
            .iter()
            .map(|directive| directive.trim())
            .filter(|directive| !directive.is_empty())
            .map(str::to_string),
    );
    parts.join(",")
}

/// Installs the stderr subscriber for the engine's own `tracing` events.
///
/// `RUST_LOG` wins over `level` when set. Only the first call installs
/// anything; later calls return the first outcome.
pub fn init_diagnostics(level: &str) -> Result<(), DiagnosticsError> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();

    let filter_string = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| build_filter_string(level, DEFAULT_DIRECTIVES));
    let filter = EnvFilter::try_new(&filter_string).map_err(|source| {
        DiagnosticsError::InvalidFilter {
            filter: filter_string.clone(),
            source,
        }
    })?;

    INIT.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .try_init()
            .map_err(|e| e.to_string())
    })
    .clone()
    .map_err(DiagnosticsError::InstallFailed)
}
