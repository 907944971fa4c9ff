// File: src/session.rs
// Purpose: Visited-page history kept in the user's session and its breadcrumb rendering

use crate::context::CurrentRequestContext;
use crate::entry::MenuEntry;
use crate::error::SessionError;
use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// One step of the breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// Where the crumb links to; None renders as plain text
    pub path: Option<String>,
    pub title: String,
}

impl Crumb {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            title: title.into(),
        }
    }

    /// A crumb without a link
    pub fn label(title: impl Into<String>) -> Self {
        Self {
            path: None,
            title: title.into(),
        }
    }
}

impl From<&MenuEntry> for Crumb {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            path: entry.link().map(str::to_string),
            title: entry.title().to_string(),
        }
    }
}

/// Key-value session storage provided by the web framework
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<JsonValue>;
    fn set(&mut self, key: &str, value: JsonValue);
}

/// Session storage held in memory, one instance per browsing session
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: HashMap<String, JsonValue>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<JsonValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: JsonValue) {
        self.values.insert(key.to_string(), value);
    }
}

/// Pages visited in this session, oldest first
///
/// A path appears at most once: coming back to a page drops everything that
/// was visited after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbSession {
    crumbs: Vec<Crumb>,
}

impl BreadcrumbSession {
    pub fn new(crumbs: Vec<Crumb>) -> Self {
        Self { crumbs }
    }

    /// Read stored history, reporting data that cannot be decoded
    pub fn try_load(store: &dyn SessionStore, key: &str) -> Result<Self, SessionError> {
        match store.get(key) {
            Some(value) => Ok(Self::new(serde_json::from_value(value)?)),
            None => Ok(Self::default()),
        }
    }

    /// Read stored history; unreadable data counts as no history
    pub fn load(store: &dyn SessionStore, key: &str) -> Self {
        Self::try_load(store, key).unwrap_or_else(|e| {
            tracing::warn!("Discarding breadcrumb history: {}", e);
            Self::default()
        })
    }

    /// Write the history back to the session
    pub fn save(&self, store: &mut dyn SessionStore, key: &str) {
        match serde_json::to_value(&self.crumbs) {
            Ok(value) => store.set(key, value),
            Err(e) => tracing::warn!("Failed to store breadcrumb history: {}", e),
        }
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    /// Fold the current request into the history
    ///
    /// With no history yet the trail is seeded from `root` and the menu path
    /// to the current page. Otherwise a known path truncates the trail back to
    /// it and an unknown path is appended with `page_title`.
    pub fn reconcile(
        &mut self,
        ctx: &CurrentRequestContext,
        tree_path: &[&MenuEntry],
        page_title: &str,
        root: Crumb,
    ) -> &[Crumb] {
        let current = ctx.current_path.as_str();

        if self.crumbs.is_empty() {
            tracing::debug!(path = current, depth = tree_path.len(), "Seeding breadcrumbs from menu");
            self.crumbs = vec![root];
            for &entry in tree_path {
                let crumb = Crumb::from(entry);
                // Paths are unique within the trail
                if crumb.path.is_some() && self.crumbs.iter().any(|c| c.path == crumb.path) {
                    continue;
                }
                self.crumbs.push(crumb);
            }
        } else if let Some(index) = self
            .crumbs
            .iter()
            .position(|crumb| crumb.path.as_deref() == Some(current))
        {
            tracing::debug!(path = current, index, "Returning to earlier breadcrumb");
            self.crumbs.truncate(index + 1);
        } else {
            tracing::debug!(path = current, "Appending breadcrumb");
            self.crumbs.push(Crumb::new(current, page_title));
        }

        &self.crumbs
    }

    /// The crumb `steps_back` positions from the end (1 = most recent)
    pub fn crumb_back(&self, steps_back: usize) -> Result<&Crumb, SessionError> {
        let available = self.crumbs.len();
        if steps_back == 0 || steps_back > available {
            return Err(SessionError::MissingHistory {
                requested: steps_back,
                available,
            });
        }
        Ok(&self.crumbs[available - steps_back])
    }

    /// Path of the page `steps_back` positions back, or `fallback`
    pub fn previous_page_path(&self, steps_back: usize, fallback: &str) -> String {
        match self.crumb_back(steps_back) {
            Ok(Crumb {
                path: Some(path), ..
            }) => path.clone(),
            Ok(_) => fallback.to_string(),
            Err(e) => {
                tracing::debug!("Using fallback path {}: {}", fallback, e);
                fallback.to_string()
            }
        }
    }

    /// Render the stored trail, see [`render_crumbs`]
    pub fn render(&self, separator: &str) -> Markup {
        render_crumbs(&self.crumbs, separator)
    }
}

/// Render a trail of crumbs separated by `separator`
///
/// Every crumb but the last links to its page. The last one is the current
/// page and is plain text. A lone crumb is followed by a trailing separator.
pub fn render_crumbs(crumbs: &[Crumb], separator: &str) -> Markup {
    let sep = PreEscaped(separator);
    let last = crumbs.len().saturating_sub(1);

    html! {
        @for (i, crumb) in crumbs.iter().enumerate() {
            @if i > 0 {
                (sep)
            }
            @match (&crumb.path, i == last) {
                (Some(path), false) => {
                    a href=(path) { (crumb.title) }
                }
                _ => {
                    (crumb.title)
                }
            }
        }
        @if crumbs.len() == 1 {
            (PreEscaped(separator.trim_end()))
        }
    }
}

/// Path `steps_back` pages back in the history stored under `key`
pub fn previous_page_path(
    store: &dyn SessionStore,
    key: &str,
    steps_back: usize,
    fallback: &str,
) -> String {
    BreadcrumbSession::load(store, key).previous_page_path(steps_back, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteDescriptor;
    use pretty_assertions::assert_eq;

    fn history() -> BreadcrumbSession {
        BreadcrumbSession::new(vec![
            Crumb::new("/p1", "t1"),
            Crumb::new("/p2", "t2"),
            Crumb::new("/p3", "t3"),
        ])
    }

    fn ctx(path: &str) -> CurrentRequestContext {
        CurrentRequestContext::new(path, RouteDescriptor::new("pages", "show"))
    }

    #[test]
    fn test_revisit_truncates() {
        let mut session = history();
        let crumbs = session.reconcile(&ctx("/p2"), &[], "ignored", Crumb::new("/", "Home"));
        assert_eq!(crumbs, &[Crumb::new("/p1", "t1"), Crumb::new("/p2", "t2")]);
    }

    #[test]
    fn test_revisit_last_is_noop() {
        let mut session = history();
        session.reconcile(&ctx("/p3"), &[], "t3 again", Crumb::new("/", "Home"));
        assert_eq!(session, history());
    }

    #[test]
    fn test_new_path_appends() {
        let mut session = BreadcrumbSession::new(vec![Crumb::new("/p1", "t1"), Crumb::new("/p2", "t2")]);
        let crumbs = session.reconcile(&ctx("/p4"), &[], "title4", Crumb::new("/", "Home"));
        assert_eq!(
            crumbs,
            &[
                Crumb::new("/p1", "t1"),
                Crumb::new("/p2", "t2"),
                Crumb::new("/p4", "title4"),
            ]
        );
    }

    #[test]
    fn test_seed_skips_entry_linking_to_root_url() {
        let mut root = MenuEntry::root(crate::entry::EntryOptions::new());
        root.add("Home", Some("/"), crate::entry::EntryOptions::new());
        let home = &root.children()[0];

        let mut session = BreadcrumbSession::default();
        let crumbs = session.reconcile(&ctx("/"), &[home], "Home", Crumb::new("/", "Start"));
        assert_eq!(crumbs, &[Crumb::new("/", "Start")]);
    }

    #[test]
    fn test_seed_keeps_unlinked_group_crumbs() {
        let mut root = MenuEntry::root(crate::entry::EntryOptions::new());
        root.add("Group", None, crate::entry::EntryOptions::new())
            .add("Leaf", Some("/leaf"), crate::entry::EntryOptions::new());
        let group = &root.children()[0];
        let leaf = &group.children()[0];

        let mut session = BreadcrumbSession::default();
        let crumbs = session.reconcile(&ctx("/leaf"), &[group, leaf], "Leaf", Crumb::new("/", "Home"));
        assert_eq!(
            crumbs,
            &[Crumb::new("/", "Home"), Crumb::label("Group"), Crumb::new("/leaf", "Leaf")]
        );
    }

    #[test]
    fn test_query_string_is_part_of_the_path() {
        let mut session = history();
        session.reconcile(&ctx("/p2?page=2"), &[], "Page 2", Crumb::new("/", "Home"));
        assert_eq!(session.crumbs().len(), 4);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let mut store = MemorySessionStore::new();
        assert!(BreadcrumbSession::load(&store, "crumbs").is_empty());

        store.set("crumbs", serde_json::json!({"not": "a list"}));
        assert!(matches!(
            BreadcrumbSession::try_load(&store, "crumbs"),
            Err(SessionError::Malformed(_))
        ));
        assert!(BreadcrumbSession::load(&store, "crumbs").is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemorySessionStore::new();
        history().save(&mut store, "crumbs");
        assert_eq!(
            store.get("crumbs"),
            Some(serde_json::json!([
                {"path": "/p1", "title": "t1"},
                {"path": "/p2", "title": "t2"},
                {"path": "/p3", "title": "t3"}
            ]))
        );
        assert_eq!(BreadcrumbSession::load(&store, "crumbs"), history());
    }

    #[test]
    fn test_previous_page_path() {
        let session = history();
        assert_eq!(session.previous_page_path(1, "/"), "/p3");
        assert_eq!(session.previous_page_path(3, "/"), "/p1");
        assert_eq!(session.previous_page_path(4, "/"), "/");
        assert_eq!(session.previous_page_path(0, "/"), "/");
    }

    #[test]
    fn test_previous_page_path_single_crumb() {
        let session = BreadcrumbSession::new(vec![Crumb::new("/only", "Only")]);
        assert_eq!(session.previous_page_path(2, "/"), "/");
        assert!(matches!(
            session.crumb_back(2),
            Err(SessionError::MissingHistory { requested: 2, available: 1 })
        ));
    }

    #[test]
    fn test_previous_page_path_unlinked_crumb() {
        let session = BreadcrumbSession::new(vec![Crumb::label("Somewhere")]);
        assert_eq!(session.previous_page_path(1, "/home"), "/home");
    }

    #[test]
    fn test_render_last_crumb_is_text() {
        let html = history().render(" &raquo; ").into_string();
        assert_eq!(
            html,
            r#"<a href="/p1">t1</a> &raquo; <a href="/p2">t2</a> &raquo; t3"#
        );
    }

    #[test]
    fn test_render_single_crumb_has_trailing_separator() {
        let session = BreadcrumbSession::new(vec![Crumb::new("/", "Home")]);
        assert_eq!(session.render(" &raquo; ").into_string(), "Home &raquo;");
    }

    #[test]
    fn test_render_unlinked_and_escaped() {
        let crumbs = vec![Crumb::label("A & B"), Crumb::new("/c", "<c>")];
        assert_eq!(render_crumbs(&crumbs, " / ").into_string(), "A &amp; B / &lt;c&gt;");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_crumbs(&[], " / ").into_string(), "");
    }
}
