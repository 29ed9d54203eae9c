use super::stack_trace::parse_stack;
use crate::domain::StackFrame;
use std::backtrace::Backtrace;
use std::panic::Location;
use tracing::trace;

/// Source of raw stack text for call-site resolution.
///
/// Injected into the logger so tests can supply synthetic stacks. Any
/// `Fn(&'static Location<'static>) -> String` closure is a capture.
pub trait StackCapture: Send + Sync {
    fn capture(&self, caller: &'static Location<'static>) -> String;
}

/// Uses the `#[track_caller]` location of the log call. Cheap and exact,
/// but carries no method name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallerLocation;

impl StackCapture for CallerLocation {
    fn capture(&self, caller: &'static Location<'static>) -> String {
        format!(
            "    at {}:{}:{}",
            caller.file(),
            caller.line(),
            caller.column()
        )
    }
}

/// Captures a full `std::backtrace`. Needs debug info to yield locations;
/// pair it with a skip count that steps over the logger's own frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceCapture;

impl StackCapture for BacktraceCapture {
    fn capture(&self, _caller: &'static Location<'static>) -> String {
        Backtrace::force_capture().to_string()
    }
}

impl<F> StackCapture for F
where
    F: Fn(&'static Location<'static>) -> String + Send + Sync,
{
    fn capture(&self, caller: &'static Location<'static>) -> String {
        self(caller)
    }
}

/// Resolves the call site of a log call.
///
/// Discards `skip_frames` leading frames of the captured stack and returns
/// the first remaining one, or the caller location when nothing is left.
pub fn capture_call_site(
    capture: &dyn StackCapture,
    caller: &'static Location<'static>,
    skip_frames: usize,
) -> StackFrame {
    let raw = capture.capture(caller);
    parse_stack(&raw)
        .into_iter()
        .nth(skip_frames)
        .unwrap_or_else(|| {
            trace!(skip_frames, "captured stack had no usable frame, using caller location");
            StackFrame::from_location(caller)
        })
}
