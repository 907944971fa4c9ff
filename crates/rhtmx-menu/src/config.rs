// File: src/config.rs
// Purpose: Menu and breadcrumb configuration parsed from menu.toml

use crate::i18n::Catalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Menu configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default)]
    pub menu: MenuSection,

    #[serde(default)]
    pub breadcrumb: BreadcrumbConfig,

    /// Display strings looked up by key (e.g. `menu_root`)
    #[serde(default = "default_labels")]
    pub labels: HashMap<String, String>,
}

/// Rendering options for the menu list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSection {
    /// Class of the outermost `<ul>` (default: "menu")
    #[serde(default = "default_css_class")]
    pub css_class: String,

    /// Optional `id` of the outermost `<ul>`
    #[serde(default)]
    pub id: Option<String>,
}

/// Breadcrumb trail options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadcrumbConfig {
    /// Session key the visited pages are stored under
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Markup placed between crumbs; not escaped
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Link target of the first crumb
    #[serde(default = "default_root_url")]
    pub root_url: String,

    /// Label key translated for the first crumb
    #[serde(default = "default_root_label_key")]
    pub root_label_key: String,

    /// Path returned when there is not enough history to go back
    #[serde(default = "default_root_url")]
    pub fallback_path: String,
}

fn default_css_class() -> String {
    "menu".to_string()
}

fn default_session_key() -> String {
    "crumbs".to_string()
}

fn default_separator() -> String {
    " &raquo; ".to_string()
}

fn default_root_url() -> String {
    "/".to_string()
}

fn default_root_label_key() -> String {
    "menu_root".to_string()
}

fn default_labels() -> HashMap<String, String> {
    HashMap::from([("menu_root".to_string(), "Home".to_string())])
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            menu: MenuSection::default(),
            breadcrumb: BreadcrumbConfig::default(),
            labels: default_labels(),
        }
    }
}

impl Default for MenuSection {
    fn default() -> Self {
        Self {
            css_class: default_css_class(),
            id: None,
        }
    }
}

impl Default for BreadcrumbConfig {
    fn default() -> Self {
        Self {
            session_key: default_session_key(),
            separator: default_separator(),
            root_url: default_root_url(),
            root_label_key: default_root_label_key(),
            fallback_path: default_root_url(),
        }
    }
}

impl MenuConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read menu config: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: MenuConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse menu config: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./menu.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("menu.toml")
    }

    /// Label catalog built from the `[labels]` table
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.labels.clone())
    }
}
