use super::log_error::LogError;
use super::stack_frame::StackFrame;
use super::value::LogValue;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Metadata attached to every emitted record. Created fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub runtime: &'static str,
    pub hostname: Option<String>,
    pub date: DateTime<Utc>,
    pub log_level_id: u32,
    pub log_level_name: String,
    /// The emitting logger's own name, without ancestors.
    pub name: Option<String>,
    pub parent_names: Vec<String>,
    /// Call site of the log call; absent when positions are hidden.
    pub path: Option<StackFrame>,
}

impl Meta {
    /// Ancestor names followed by the logger's own name.
    pub fn name_path(&self, separator: &str) -> String {
        self.parent_names
            .iter()
            .map(String::as_str)
            .chain(self.name.as_deref())
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// An error argument, kept both as the original value and as parsed frames.
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub native_error: Arc<LogError>,
    pub name: String,
    pub message: String,
    pub stack: Vec<StackFrame>,
}

impl ErrorEntry {
    pub fn new(error: Arc<LogError>) -> Self {
        Self {
            name: error.name().to_string(),
            message: error.message().to_string(),
            stack: error.stack_frames(),
            native_error: error,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "nativeError": {
                "name": self.native_error.name(),
                "message": self.native_error.message(),
            },
            "name": self.name,
            "message": self.message,
            "stack": self.stack,
        })
    }
}

#[derive(Debug, Clone)]
pub enum RecordEntry {
    Value(LogValue),
    Error(ErrorEntry),
}

impl RecordEntry {
    pub fn as_value(&self) -> Option<&LogValue> {
        match self {
            RecordEntry::Value(value) => Some(value),
            RecordEntry::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorEntry> {
        match self {
            RecordEntry::Error(entry) => Some(entry),
            RecordEntry::Value(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            RecordEntry::Value(value) => value.to_json(),
            RecordEntry::Error(entry) => entry.to_json(),
        }
    }
}

impl From<LogValue> for RecordEntry {
    fn from(value: LogValue) -> Self {
        match value {
            LogValue::Error(error) => RecordEntry::Error(ErrorEntry::new(error)),
            other => RecordEntry::Value(other),
        }
    }
}

/// What a successful log call returns: the (masked) arguments plus metadata.
#[derive(Debug, Clone)]
pub struct LogRecord {
    arguments: Vec<RecordEntry>,
    meta: Meta,
    arguments_array_name: Option<String>,
    meta_property: String,
}

impl LogRecord {
    pub fn new(
        arguments: Vec<LogValue>,
        meta: Meta,
        arguments_array_name: Option<String>,
        meta_property: impl Into<String>,
    ) -> Self {
        Self {
            arguments: arguments.into_iter().map(RecordEntry::from).collect(),
            meta,
            arguments_array_name,
            meta_property: meta_property.into(),
        }
    }

    pub fn arguments(&self) -> &[RecordEntry] {
        &self.arguments
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn arguments_array_name(&self) -> Option<&str> {
        self.arguments_array_name.as_deref()
    }

    pub fn meta_property(&self) -> &str {
        &self.meta_property
    }

    /// Positional lookup by index key (`"0"`, `"1"`, ...).
    ///
    /// When an arguments array name is configured the arguments are not
    /// addressable by index at the top level, matching the keyed layout of
    /// [`LogRecord::to_json`].
    pub fn get(&self, key: &str) -> Option<&RecordEntry> {
        if self.arguments_array_name.is_some() {
            return None;
        }
        key.parse::<usize>()
            .ok()
            .and_then(|index| self.arguments.get(index))
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        match &self.arguments_array_name {
            Some(name) => {
                let values = self.arguments.iter().map(RecordEntry::to_json).collect();
                map.insert(name.clone(), serde_json::Value::Array(values));
            }
            None => {
                for (index, entry) in self.arguments.iter().enumerate() {
                    map.insert(index.to_string(), entry.to_json());
                }
            }
        }
        let meta = serde_json::to_value(&self.meta).unwrap_or(serde_json::Value::Null);
        map.insert(self.meta_property.clone(), meta);
        serde_json::Value::Object(map)
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta() -> Meta {
        Meta {
            runtime: "rust",
            hostname: None,
            date: Utc.timestamp_opt(0, 0).unwrap(),
            log_level_id: 3,
            log_level_name: "INFO".to_string(),
            name: Some("child".to_string()),
            parent_names: vec!["root".to_string(), "parent".to_string()],
            path: None,
        }
    }

    #[test]
    fn test_name_path() {
        assert_eq!(meta().name_path(":"), "root:parent:child");

        let nameless = Meta {
            name: None,
            parent_names: Vec::new(),
            ..meta()
        };
        assert_eq!(nameless.name_path(":"), "");
    }

    #[test]
    fn test_positional_entries_and_errors() {
        let error = LogError::with_stack("Error", "boom", "Error: boom\n    at run (/app/x.rs:1:2)");
        let record = LogRecord::new(
            vec![LogValue::from("test"), LogValue::error(error)],
            meta(),
            None,
            "_meta",
        );

        assert!(record.get("0").and_then(RecordEntry::as_value).is_some());
        let entry = record.get("1").and_then(RecordEntry::as_error).unwrap();
        assert_eq!(entry.native_error.message(), "boom");
        assert_eq!(entry.stack[0].file_name, "x.rs");
        assert!(record.get("2").is_none());
    }

    #[test]
    fn test_keyed_json_layout() {
        let record = LogRecord::new(vec![LogValue::from(1)], meta(), None, "_test");
        let json = record.to_json();
        assert_eq!(json["0"], 1.0);
        assert_eq!(json["_test"]["logLevelName"], "INFO");
        assert_eq!(json["_test"]["parentNames"][1], "parent");

        let record = LogRecord::new(
            vec![LogValue::from("a"), LogValue::from("b")],
            meta(),
            Some("argumentsArray".to_string()),
            "_meta",
        );
        let json = record.to_json();
        assert_eq!(json["argumentsArray"], serde_json::json!(["a", "b"]));
        assert!(record.get("0").is_none());
    }
}
