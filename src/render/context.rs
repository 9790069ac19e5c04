//! Variables handed to a template.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Insertion-ordered variable map for one rendered file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    variables: IndexMap<String, JsonValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any earlier value under the same name
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> &mut Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.variables.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn to_tera(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (key, value) in &self.variables {
            context.insert(key.as_str(), value);
        }
        context
    }
}
