//! Masking Engine: redacts values by key and by pattern without touching the
//! caller's graph.
//!
//! The walk builds shadow containers only along branches that change.
//! Untouched branches are returned as the caller's own `Arc`s, and a
//! container reached twice maps to the same result, so shared and cyclic
//! structure survives masking.

use crate::domain::value::number_to_string;
use crate::domain::{LogValue, SharedArray, SharedObject};
use parking_lot::RwLock;
use regex::{NoExpand, Regex};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_MASK_PLACEHOLDER: &str = "[***]";

#[derive(Debug, Clone)]
pub enum MaskRule {
    /// Replaces the whole value stored under this object key.
    Key(String),
    /// Replaces matches inside every leaf's text.
    Pattern(Regex),
}

#[derive(Debug, Clone)]
pub struct MaskRules {
    keys: Vec<String>,
    case_insensitive: bool,
    patterns: Vec<Regex>,
    placeholder: String,
}

impl Default for MaskRules {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), Vec::new(), false, DEFAULT_MASK_PLACEHOLDER)
    }
}

impl MaskRules {
    pub fn new<I, K>(
        keys: I,
        patterns: Vec<Regex>,
        case_insensitive: bool,
        placeholder: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .map(|key: String| if case_insensitive { key.to_lowercase() } else { key })
            .collect();

        Self {
            keys,
            case_insensitive,
            patterns,
            placeholder: placeholder.into(),
        }
    }

    pub fn from_rules(
        rules: impl IntoIterator<Item = MaskRule>,
        case_insensitive: bool,
        placeholder: impl Into<String>,
    ) -> Self {
        let mut keys = Vec::new();
        let mut patterns = Vec::new();
        for rule in rules {
            match rule {
                MaskRule::Key(key) => keys.push(key),
                MaskRule::Pattern(pattern) => patterns.push(pattern),
            }
        }
        Self::new(keys, patterns, case_insensitive, placeholder)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.patterns.is_empty()
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn matches_key(&self, key: &str) -> bool {
        if self.case_insensitive {
            let key = key.to_lowercase();
            self.keys.iter().any(|rule| *rule == key)
        } else {
            self.keys.iter().any(|rule| rule == key)
        }
    }

    /// Returns the masked counterpart of `value`; `value` itself is not modified.
    pub fn mask(&self, value: &LogValue) -> LogValue {
        if self.is_empty() {
            return value.clone();
        }
        Walker::new(self).walk(value).0
    }

    /// Masks a whole argument list in one walk, so a container passed in
    /// several arguments is shadowed once.
    pub fn mask_all(&self, values: &[LogValue]) -> Vec<LogValue> {
        if self.is_empty() {
            return values.to_vec();
        }
        let mut walker = Walker::new(self);
        values.iter().map(|value| walker.walk(value).0).collect()
    }

    fn mask_text(&self, text: &str) -> Option<String> {
        let mut masked = text.to_string();
        for pattern in &self.patterns {
            if pattern.is_match(&masked) {
                masked = pattern
                    .replace_all(&masked, NoExpand(&self.placeholder))
                    .into_owned();
            }
        }
        (masked != text).then_some(masked)
    }
}

/// Masks with the default placeholder.
pub fn mask(
    value: &LogValue,
    key_rules: &[String],
    regex_rules: &[Regex],
    case_insensitive: bool,
) -> LogValue {
    MaskRules::new(
        key_rules.iter().cloned(),
        regex_rules.to_vec(),
        case_insensitive,
        DEFAULT_MASK_PLACEHOLDER,
    )
    .mask(value)
}

struct Walker<'a> {
    rules: &'a MaskRules,
    /// Shadows of containers whose walk has not finished yet.
    in_progress: HashMap<usize, LogValue>,
    done: HashMap<usize, (LogValue, bool)>,
}

impl<'a> Walker<'a> {
    fn new(rules: &'a MaskRules) -> Self {
        Self {
            rules,
            in_progress: HashMap::new(),
            done: HashMap::new(),
        }
    }

    /// Returns the masked value and whether it differs from the input.
    fn walk(&mut self, value: &LogValue) -> (LogValue, bool) {
        if let Some(id) = value.container_id() {
            if let Some(result) = self.done.get(&id) {
                return result.clone();
            }
            // back-edge of a cycle: point at the shadow so the copy never
            // leads back into the original graph
            if let Some(shadow) = self.in_progress.get(&id) {
                return (shadow.clone(), true);
            }
        }

        match value {
            LogValue::Array(items) => self.walk_array(items),
            LogValue::Object(entries) => self.walk_object(entries),
            leaf => self.walk_leaf(leaf),
        }
    }

    fn walk_array(&mut self, items: &SharedArray) -> (LogValue, bool) {
        let id = Arc::as_ptr(items) as *const () as usize;
        let shadow: SharedArray = Arc::new(RwLock::new(Vec::new()));
        self.in_progress.insert(id, LogValue::Array(shadow.clone()));

        let snapshot = items.read().clone();
        let mut changed = false;
        let masked: Vec<LogValue> = snapshot
            .iter()
            .map(|item| {
                let (item, item_changed) = self.walk(item);
                changed |= item_changed;
                item
            })
            .collect();

        self.in_progress.remove(&id);
        let result = if changed {
            *shadow.write() = masked;
            (LogValue::Array(shadow), true)
        } else {
            (LogValue::Array(items.clone()), false)
        };
        self.done.insert(id, result.clone());
        result
    }

    fn walk_object(&mut self, entries: &SharedObject) -> (LogValue, bool) {
        let id = Arc::as_ptr(entries) as *const () as usize;
        let shadow: SharedObject = Arc::new(RwLock::new(Vec::new()));
        self.in_progress.insert(id, LogValue::Object(shadow.clone()));

        let snapshot = entries.read().clone();
        let mut changed = false;
        let masked: Vec<(String, LogValue)> = snapshot
            .iter()
            .map(|(key, item)| {
                if self.rules.matches_key(key) {
                    changed = true;
                    return (key.clone(), LogValue::Str(self.rules.placeholder.clone()));
                }
                let (item, item_changed) = self.walk(item);
                changed |= item_changed;
                (key.clone(), item)
            })
            .collect();

        self.in_progress.remove(&id);
        let result = if changed {
            *shadow.write() = masked;
            (LogValue::Object(shadow), true)
        } else {
            (LogValue::Object(entries.clone()), false)
        };
        self.done.insert(id, result.clone());
        result
    }

    /// With any pattern configured, primitive leaves come back as their
    /// (possibly masked) text.
    fn walk_leaf(&self, leaf: &LogValue) -> (LogValue, bool) {
        if self.rules.patterns.is_empty() {
            return (leaf.clone(), false);
        }

        let text = match leaf {
            LogValue::Str(s) => s.clone(),
            LogValue::Number(n) => number_to_string(*n),
            LogValue::Bool(b) => b.to_string(),
            LogValue::Custom(custom) => match custom.render() {
                Ok(text) => text,
                Err(_) => return (leaf.clone(), false),
            },
            _ => return (leaf.clone(), false),
        };

        match (self.rules.mask_text(&text), leaf) {
            (Some(masked), _) => (LogValue::Str(masked), true),
            (None, LogValue::Str(_)) => (leaf.clone(), false),
            (None, _) => (LogValue::Str(text), true),
        }
    }
}
