// File: src/i18n.rs
// Purpose: Label lookup for menu and breadcrumb text

use std::collections::HashMap;

/// Translate a label key into display text
pub trait Translate {
    fn translate(&self, key: &str) -> String;
}

/// Label catalog backed by a map, falling back to the key itself
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    labels: HashMap<String, String>,
}

impl Catalog {
    pub fn new(labels: HashMap<String, String>) -> Self {
        Self { labels }
    }

    /// Builder method to add or replace a label
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

impl Translate for Catalog {
    fn translate(&self, key: &str) -> String {
        self.labels
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
