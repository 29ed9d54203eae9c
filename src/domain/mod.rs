//! Domain layer for rask-pretty-log.
//!
//! Contains the canonical types shared across all modules:
//! - `LogValue`: the closed set of value kinds a log call can carry
//! - `LogError`: an error value with its raw stack text
//! - `StackFrame`: one parsed call-site frame
//! - `LogLevel`: the standard severities and their numeric ids
//! - `LogRecord` / `Meta`: what a log call returns for inspection

pub mod error;
pub mod log_error;
pub mod log_level;
pub mod log_record;
pub mod stack_frame;
pub mod value;

pub use error::{LevelParseError, RenderError};
pub use log_error::LogError;
pub use log_level::LogLevel;
pub use log_record::{ErrorEntry, LogRecord, Meta, RecordEntry};
pub use stack_frame::StackFrame;
pub use value::{CustomValue, LogValue, SharedArray, SharedObject};
