// Errors for the lazily compiled grammar tables
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RegexError {
    #[error("Grammar '{name}' failed to compile ({pattern}): {source}")]
    CompilationFailed {
        name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown grammar: {name}")]
    UnknownGrammar { name: String },
}
