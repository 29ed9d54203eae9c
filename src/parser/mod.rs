pub mod call_site;
pub mod regex_error;
pub mod regex_patterns;
pub mod stack_trace;

pub use call_site::{BacktraceCapture, CallerLocation, StackCapture, capture_call_site};
pub use regex_error::RegexError;
pub use regex_patterns::GrammarTable;
pub use stack_trace::{StackTraceParser, parse_stack};
