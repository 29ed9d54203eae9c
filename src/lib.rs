// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_lossless,            // Infallible casts are clear enough with `as`
    clippy::cast_possible_truncation, // Level ids and line numbers stay small
    clippy::cast_precision_loss,      // Integer arguments are rendered through f64
    clippy::cast_sign_loss,           // Safe where values are known non-negative
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. MaskRules in mask module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod domain;
pub mod logger;
pub mod mask;
pub mod parser;
pub mod render;
pub mod sink;
pub mod template;

// Re-export main types for easy access
pub use domain::{
    ErrorEntry, LogError, LogLevel, LogRecord, LogValue, Meta, RecordEntry, RenderError,
    StackFrame,
};
pub use logger::{Logger, LoggerBuilder, LoggerOptions};
pub use sink::{ConsoleSink, MemorySink, Sink};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds a `Vec<LogValue>` from heterogeneous arguments.
///
/// ```
/// use rask_pretty_log::log_args;
/// let args = log_args!["Foo %s", "bar", 42, true];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! log_args {
    () => {
        ::std::vec::Vec::<$crate::LogValue>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::LogValue::from($arg)),+]
    };
}
