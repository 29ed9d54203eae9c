//! Value Renderer: turns log arguments into pretty, deterministic text.

pub mod format;
pub mod inspect;
pub mod style;

pub use format::format_arguments;
pub use inspect::{CIRCULAR_MARKER, RenderOptions, render};
pub use style::PrettyLogStyles;
