// File: src/entry.rs
// Purpose: Menu tree nodes and the fluent builder used to author them

use axum::http::Method;

/// Per-entry options accepted by [`MenuEntry::add`]
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
    /// Class attribute placed on the entry's link
    pub css_class: Option<String>,

    /// Verb used when resolving the link (GET when unset)
    pub method: Option<Method>,

    /// Treat any page served by the same controller as the current page
    pub match_by_controller: bool,

    /// `id` attribute of the link
    pub id: Option<String>,

    /// `title` attribute (tooltip) of the link
    pub tooltip: Option<String>,
}

impl EntryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the link's class attribute
    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = Some(class.into());
        self
    }

    /// Builder method to resolve the link with a verb other than GET
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Builder method to match on controller identity alone
    pub fn match_by_controller(mut self) -> Self {
        self.match_by_controller = true;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// A node in a menu tree
///
/// Entries are built top-down from a root with [`MenuEntry::add`]; a child is
/// owned by its parent and always sits exactly one level below it.
///
/// # Example
///
/// ```
/// use rhtmx_menu::{EntryOptions, MenuEntry};
///
/// let mut root = MenuEntry::root(EntryOptions::new());
/// root.add("Home", Some("/"), EntryOptions::new());
/// root.add_with("Docs", Some("/docs"), EntryOptions::new(), |docs| {
///     docs.add("API", Some("/docs/api"), EntryOptions::new());
/// });
///
/// assert_eq!(root.children().len(), 2);
/// assert_eq!(root.children()[1].children()[0].level(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MenuEntry {
    title: String,
    link: Option<String>,
    method: Method,
    match_by_controller: bool,
    css_class: Option<String>,
    id: Option<String>,
    tooltip: Option<String>,
    level: usize,
    children: Vec<MenuEntry>,
}

impl MenuEntry {
    fn new(title: String, link: Option<String>, level: usize, options: EntryOptions) -> Self {
        Self {
            title,
            link,
            method: options.method.unwrap_or(Method::GET),
            match_by_controller: options.match_by_controller,
            css_class: options.css_class,
            id: options.id,
            tooltip: options.tooltip,
            level,
            children: Vec::new(),
        }
    }

    /// Create a root entry: no title, no link, level 0
    pub fn root(options: EntryOptions) -> Self {
        Self::new(String::new(), None, 0, options)
    }

    /// Append a child one level below this entry and return it for further population
    pub fn add(
        &mut self,
        title: impl Into<String>,
        link: Option<&str>,
        options: EntryOptions,
    ) -> &mut MenuEntry {
        let child = Self::new(title.into(), link.map(str::to_string), self.level + 1, options);
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a child and run `build` on it straight away
    pub fn add_with<F>(
        &mut self,
        title: impl Into<String>,
        link: Option<&str>,
        options: EntryOptions,
        build: F,
    ) -> &mut MenuEntry
    where
        F: FnOnce(&mut MenuEntry),
    {
        let child = self.add(title, link, options);
        build(&mut *child);
        child
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn match_by_controller(&self) -> bool {
        self.match_by_controller
    }

    pub fn css_class(&self) -> Option<&str> {
        self.css_class.as_deref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn children(&self) -> &[MenuEntry] {
        &self.children
    }

    /// A group label: an entry without a link of its own
    pub fn is_group(&self) -> bool {
        self.link.is_none()
    }

    /// Pre-order, depth-first walk over this entry and all its descendants
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// First entry (in pre-order) whose link is exactly `link`
    pub fn find_by_link(&self, link: &str) -> Option<&MenuEntry> {
        self.iter().find(|entry| entry.link() == Some(link))
    }
}

/// Iterator returned by [`MenuEntry::iter`]
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a MenuEntry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a MenuEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.stack.extend(entry.children.iter().rev());
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MenuEntry {
        let mut root = MenuEntry::root(EntryOptions::new());
        root.add("Home", Some("/"), EntryOptions::new());
        root.add_with("Docs", Some("/docs"), EntryOptions::new(), |docs| {
            docs.add("API", Some("/docs/api"), EntryOptions::new());
            docs.add("Guides", None, EntryOptions::new());
        });
        root
    }

    #[test]
    fn test_root_defaults() {
        let root = MenuEntry::root(EntryOptions::new());
        assert_eq!(root.level(), 0);
        assert_eq!(root.title(), "");
        assert!(root.is_group());
        assert_eq!(root.method(), &Method::GET);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_add_assigns_levels() {
        let root = sample();
        let docs = &root.children()[1];
        assert_eq!(docs.level(), 1);
        assert_eq!(docs.children()[0].level(), 2);
        assert_eq!(docs.children()[1].level(), 2);
    }

    #[test]
    fn test_add_returns_child_for_chaining() {
        let mut root = MenuEntry::root(EntryOptions::new());
        root.add("Admin", None, EntryOptions::new())
            .add("Users", Some("/admin/users"), EntryOptions::new())
            .add("New", Some("/admin/users/new"), EntryOptions::new());

        let new = root.find_by_link("/admin/users/new").unwrap();
        assert_eq!(new.level(), 3);
        assert_eq!(new.title(), "New");
    }

    #[test]
    fn test_options_are_applied() {
        let mut root = MenuEntry::root(EntryOptions::new());
        let entry = root.add(
            "Logout",
            Some("/session"),
            EntryOptions::new()
                .method(Method::DELETE)
                .css_class("danger")
                .id("logout")
                .tooltip("Sign out")
                .match_by_controller(),
        );
        assert_eq!(entry.id(), Some("logout"));
        assert_eq!(entry.tooltip(), Some("Sign out"));
        assert_eq!(entry.method(), &Method::DELETE);
        assert_eq!(entry.css_class(), Some("danger"));
        assert!(entry.match_by_controller());
    }

    #[test]
    fn test_iter_is_preorder() {
        let root = sample();
        let titles: Vec<&str> = root.iter().map(|e| e.title()).collect();
        assert_eq!(titles, vec!["", "Home", "Docs", "API", "Guides"]);
    }

    #[test]
    fn test_find_by_link_missing() {
        assert!(sample().find_by_link("/nowhere").is_none());
    }
}
