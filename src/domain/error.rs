use thiserror::Error;

/// Failure raised by caller-supplied data while it is being rendered.
///
/// The renderer never propagates this; it substitutes a fallback token so one
/// bad value cannot abort the whole line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("custom value '{type_name}' failed to render: {reason}")]
    CustomValue { type_name: String, reason: String },
}

impl RenderError {
    pub fn custom(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        RenderError::CustomValue {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelParseError {
    #[error("Invalid log level '{input}'. Valid levels: {valid_levels:?}")]
    InvalidLevel {
        input: String,
        valid_levels: Vec<String>,
    },
}
