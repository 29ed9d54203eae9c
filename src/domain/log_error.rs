use super::stack_frame::StackFrame;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::Location;

/// An error carried as a log argument.
///
/// Keeps the raw stack text; frames are parsed on demand so the same error
/// can be rendered or inspected without re-capturing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogError {
    name: String,
    message: String,
    stack: String,
    causes: Vec<String>,
}

impl LogError {
    /// Creates an error whose stack starts at the caller.
    ///
    /// When the runtime has backtraces enabled (`RUST_BACKTRACE`), the frames
    /// of `std::backtrace` are appended after the caller frame.
    #[track_caller]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        let caller = Location::caller();
        let name = name.into();
        let message = message.into();

        let mut stack = format!(
            "{}\n    at {}:{}:{}",
            header(&name, &message),
            caller.file(),
            caller.line(),
            caller.column()
        );
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            stack.push('\n');
            stack.push_str(&backtrace.to_string());
        }

        Self {
            name,
            message,
            stack,
            causes: Vec::new(),
        }
    }

    /// Wraps an externally produced stack trace (V8 or `std::backtrace` text).
    pub fn with_stack(
        name: impl Into<String>,
        message: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: stack.into(),
            causes: Vec::new(),
        }
    }

    /// Converts any standard error, keeping its `source()` chain as causes.
    #[track_caller]
    pub fn from_std<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let mut error = Self::new(short_type_name(std::any::type_name::<E>()), err.to_string());
        let mut source = err.source();
        while let Some(cause) = source {
            error.causes.push(cause.to_string());
            source = cause.source();
        }
        error
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw, unparsed stack text.
    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    pub fn stack_frames(&self) -> Vec<StackFrame> {
        crate::parser::parse_stack(&self.stack)
    }
}

fn header(name: &str, message: &str) -> String {
    if message.is_empty() {
        name.to_string()
    } else {
        format!("{name}: {message}")
    }
}

fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&header(&self.name, &self.message))
    }
}

impl std::error::Error for LogError {}
