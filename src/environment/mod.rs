//! # Run Variables
//!
//! Values captured by earlier test cases (the discovered patient id, for one)
//! and made available to later ones through `{{variable}}` interpolation of
//! request paths, query values and JSON bodies.

use std::collections::HashMap;

use serde_json::Value;

/// Run-scoped variable bag. Lives for exactly one run.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Interpolate `{{variable}}` placeholders in the given text. Unknown
    /// placeholders are left untouched.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (key, value) in &self.values {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }
        result
    }

    /// Interpolate every string leaf of a JSON value.
    pub fn interpolate_json(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.interpolate(text)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.interpolate_json(item)).collect())
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.interpolate_json(item)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}
