use super::error::RenderError;
use super::log_error::LogError;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared, caller-mutable array storage. Identity is the `Arc` allocation.
pub type SharedArray = Arc<RwLock<Vec<LogValue>>>;

/// Shared, caller-mutable object storage with keys in insertion order.
pub type SharedObject = Arc<RwLock<Vec<(String, LogValue)>>>;

/// Caller-supplied stringification hook.
pub trait CustomValue: Send + Sync {
    fn type_name(&self) -> &str {
        "Custom"
    }

    fn render(&self) -> Result<String, RenderError>;
}

/// Any value a log call can carry.
///
/// Arrays and objects are shared containers so callers can build cyclic
/// graphs; the engine only ever reads them.
#[derive(Clone)]
pub enum LogValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Buffer(Bytes),
    Date(DateTime<Utc>),
    Error(Arc<LogError>),
    Array(SharedArray),
    Object(SharedObject),
    Custom(Arc<dyn CustomValue>),
}

impl LogValue {
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<LogValue>,
    {
        LogValue::Array(Arc::new(RwLock::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    /// Builds an object; a repeated key overwrites the earlier value in place.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<LogValue>,
    {
        let value = LogValue::Object(Arc::new(RwLock::new(Vec::new())));
        for (key, entry) in entries {
            value.insert(key, entry);
        }
        value
    }

    pub fn buffer(bytes: impl Into<Bytes>) -> Self {
        LogValue::Buffer(bytes.into())
    }

    pub fn date(date: DateTime<Utc>) -> Self {
        LogValue::Date(date)
    }

    pub fn error(error: LogError) -> Self {
        LogValue::Error(Arc::new(error))
    }

    pub fn custom(value: impl CustomValue + 'static) -> Self {
        LogValue::Custom(Arc::new(value))
    }

    /// Appends to an array. Returns `false` for non-arrays.
    pub fn push(&self, value: impl Into<LogValue>) -> bool {
        match self {
            LogValue::Array(items) => {
                items.write().push(value.into());
                true
            }
            _ => false,
        }
    }

    /// Sets an object key, keeping the position of an existing key.
    /// Returns `false` for non-objects.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<LogValue>) -> bool {
        let LogValue::Object(entries) = self else {
            return false;
        };
        let key = key.into();
        let value = value.into();
        let mut entries = entries.write();
        match entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => entries.push((key, value)),
        }
        true
    }

    pub fn get(&self, key: &str) -> Option<LogValue> {
        match self {
            LogValue::Object(entries) => entries
                .read()
                .iter()
                .find(|(existing, _)| existing == key)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<LogValue> {
        match self {
            LogValue::Array(items) => items.read().get(index).cloned(),
            _ => None,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        match self {
            LogValue::Object(entries) => entries.read().iter().map(|(key, _)| key.clone()).collect(),
            _ => Vec::new(),
        }
    }

    /// Element count for arrays and objects, zero otherwise.
    pub fn len(&self) -> usize {
        match self {
            LogValue::Array(items) => items.read().len(),
            LogValue::Object(entries) => entries.read().len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LogValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LogValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            LogValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&Arc<LogError>> {
        match self {
            LogValue::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LogValue::Undefined => "undefined",
            LogValue::Null => "null",
            LogValue::Bool(_) => "boolean",
            LogValue::Number(_) => "number",
            LogValue::Str(_) => "string",
            LogValue::Buffer(_) => "buffer",
            LogValue::Date(_) => "date",
            LogValue::Error(_) => "error",
            LogValue::Array(_) => "array",
            LogValue::Object(_) => "object",
            LogValue::Custom(_) => "custom",
        }
    }

    /// Allocation address of an array or object container.
    pub fn container_id(&self) -> Option<usize> {
        match self {
            LogValue::Array(items) => Some(Arc::as_ptr(items) as *const () as usize),
            LogValue::Object(entries) => Some(Arc::as_ptr(entries) as *const () as usize),
            _ => None,
        }
    }

    /// True when both values are the very same array or object container.
    pub fn same_container(&self, other: &LogValue) -> bool {
        match (self.container_id(), other.container_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Canonical text of primitive leaves; `None` for structured values.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            LogValue::Undefined => Some("undefined".to_string()),
            LogValue::Null => Some("null".to_string()),
            LogValue::Bool(b) => Some(b.to_string()),
            LogValue::Number(n) => Some(number_to_string(*n)),
            LogValue::Str(s) => Some(s.clone()),
            LogValue::Date(date) => Some(iso_millis(date)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut ancestors = Vec::new();
        self.to_json_inner(&mut ancestors)
    }

    fn to_json_inner(&self, ancestors: &mut Vec<usize>) -> serde_json::Value {
        use serde_json::Value;

        if let Some(id) = self.container_id()
            && ancestors.contains(&id)
        {
            return Value::String("[Circular]".to_string());
        }

        match self {
            LogValue::Undefined | LogValue::Null => Value::Null,
            LogValue::Bool(b) => Value::Bool(*b),
            LogValue::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                Value::Number((*n as i64).into())
            }
            LogValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            LogValue::Str(s) => Value::String(s.clone()),
            LogValue::Buffer(bytes) => serde_json::json!({
                "type": "Buffer",
                "data": bytes.iter().copied().collect::<Vec<u8>>(),
            }),
            LogValue::Date(date) => Value::String(iso_millis(date)),
            LogValue::Error(error) => serde_json::json!({
                "name": error.name(),
                "message": error.message(),
                "stack": error.stack(),
            }),
            LogValue::Array(items) => {
                let snapshot = items.read().clone();
                ancestors.push(Arc::as_ptr(items) as *const () as usize);
                let converted = snapshot
                    .iter()
                    .map(|item| item.to_json_inner(ancestors))
                    .collect();
                ancestors.pop();
                Value::Array(converted)
            }
            LogValue::Object(entries) => {
                let snapshot = entries.read().clone();
                ancestors.push(Arc::as_ptr(entries) as *const () as usize);
                let converted = snapshot
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json_inner(ancestors)))
                    .collect();
                ancestors.pop();
                Value::Object(converted)
            }
            LogValue::Custom(custom) => match custom.render() {
                Ok(text) => Value::String(text),
                Err(e) => Value::String(format!("<render error: {e}>")),
            },
        }
    }
}

/// JavaScript-compatible number text: `NaN`, `Infinity`, no trailing `.0`,
/// `-0` as `0`, and exponent form (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{n}");
    }

    let exponential = format!("{n:e}");
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exponential,
    }
}

/// ISO-8601 instant with millisecond precision and a `Z` designator.
pub fn iso_millis(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Debug for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = crate::render::RenderOptions {
            quote_strings: true,
            ..Default::default()
        };
        f.write_str(&crate::render::render(self, &options))
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Str(value.to_string())
    }
}

impl From<String> for LogValue {
    fn from(value: String) -> Self {
        LogValue::Str(value)
    }
}

impl From<&String> for LogValue {
    fn from(value: &String) -> Self {
        LogValue::Str(value.clone())
    }
}

impl From<bool> for LogValue {
    fn from(value: bool) -> Self {
        LogValue::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogValue {
                fn from(value: $ty) -> Self {
                    LogValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Bytes> for LogValue {
    fn from(value: Bytes) -> Self {
        LogValue::Buffer(value)
    }
}

impl From<DateTime<Utc>> for LogValue {
    fn from(value: DateTime<Utc>) -> Self {
        LogValue::Date(value)
    }
}

impl From<LogError> for LogValue {
    fn from(value: LogError) -> Self {
        LogValue::error(value)
    }
}

impl From<Arc<LogError>> for LogValue {
    fn from(value: Arc<LogError>) -> Self {
        LogValue::Error(value)
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(LogValue::Null, Into::into)
    }
}

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(value: Vec<T>) -> Self {
        LogValue::array(value)
    }
}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => LogValue::Null,
            Value::Bool(b) => LogValue::Bool(b),
            Value::Number(n) => LogValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => LogValue::Str(s),
            Value::Array(items) => LogValue::array(items),
            Value::Object(map) => LogValue::object(map),
        }
    }
}
