use serde::{Deserialize, Serialize};
use std::panic::Location;
use std::sync::OnceLock;

/// One frame of a parsed stack trace, or the call site of a log call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// Path exactly as it appeared in the raw stack.
    pub full_file_path: String,
    /// Path relative to the working directory, always with a leading `/`.
    pub file_path: String,
    pub file_name: String,
    pub line: u32,
    pub column: u32,
    /// `None` for anonymous frames.
    pub method: Option<String>,
}

impl StackFrame {
    pub fn new(
        full_file_path: impl Into<String>,
        line: u32,
        column: u32,
        method: Option<String>,
        root: Option<&str>,
    ) -> Self {
        let full_file_path = full_file_path.into();
        let file_path = relative_file_path(&full_file_path, root);
        let file_name = file_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            full_file_path,
            file_path,
            file_name,
            line,
            column,
            method,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(
            location.file(),
            location.line(),
            location.column(),
            None,
            working_dir(),
        )
    }

    pub fn method_or_anonymous(&self) -> &str {
        self.method.as_deref().unwrap_or("<anonymous>")
    }

    pub fn file_name_with_line(&self) -> String {
        format!("{}:{}", self.file_name, self.line)
    }

    pub fn file_path_with_line(&self) -> String {
        format!("{}:{}", self.file_path, self.line)
    }
}

/// Working directory used to shorten absolute frame paths, read once.
pub(crate) fn working_dir() -> Option<&'static str> {
    static WORKING_DIR: OnceLock<Option<String>> = OnceLock::new();
    WORKING_DIR
        .get_or_init(|| {
            std::env::current_dir()
                .ok()
                .and_then(|dir| dir.to_str().map(|s| s.trim_end_matches('/').to_string()))
                .filter(|dir| !dir.is_empty())
        })
        .as_deref()
}

fn relative_file_path(full: &str, root: Option<&str>) -> String {
    let trimmed = full.strip_prefix("file://").unwrap_or(full);
    let relative = root
        .and_then(|root| trimmed.strip_prefix(root))
        .filter(|rest| rest.starts_with('/'))
        .unwrap_or(trimmed);
    let relative = relative.trim_start_matches("./");

    if relative.starts_with('/') {
        relative.to_string()
    } else {
        format!("/{relative}")
    }
}
