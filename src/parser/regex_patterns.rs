//! Named grammar tables, compiled on first use.
use super::regex_error::RegexError;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Ordered `(name, pattern)` table shared by every parser instance.
///
/// Order matters: [`GrammarTable::classify`] reports the first entry that
/// matches, so more specific grammars go first.
pub struct GrammarTable {
    entries: &'static [(&'static str, &'static str)],
    compiled: OnceLock<Result<Vec<Regex>, RegexError>>,
}

impl GrammarTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            entries,
            compiled: OnceLock::new(),
        }
    }

    fn compiled(&self) -> Result<&[Regex], RegexError> {
        self.compiled
            .get_or_init(|| {
                self.entries
                    .iter()
                    .map(|(name, pattern)| {
                        Regex::new(pattern).map_err(|source| RegexError::CompilationFailed {
                            name: (*name).to_string(),
                            pattern: (*pattern).to_string(),
                            source,
                        })
                    })
                    .collect()
            })
            .as_deref()
            .map_err(Clone::clone)
    }

    pub fn get(&self, name: &str) -> Result<&Regex, RegexError> {
        let position = self
            .entries
            .iter()
            .position(|(entry, _)| *entry == name)
            .ok_or_else(|| RegexError::UnknownGrammar {
                name: name.to_string(),
            })?;
        Ok(&self.compiled()?[position])
    }

    /// Name and captures of the first grammar matching `line`.
    pub fn classify<'t>(
        &self,
        line: &'t str,
    ) -> Result<Option<(&'static str, Captures<'t>)>, RegexError> {
        let compiled = self.compiled()?;
        Ok(self
            .entries
            .iter()
            .zip(compiled)
            .find_map(|((name, _), regex)| regex.captures(line).map(|caps| (*name, caps))))
    }
}
