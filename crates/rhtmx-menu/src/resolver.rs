// File: src/resolver.rs
// Purpose: Active-page resolution, breadcrumb derivation, and menu rendering

use crate::context::CurrentRequestContext;
use crate::entry::MenuEntry;
use crate::route::RouteResolver;
use maud::{html, Markup};
use std::cell::RefCell;
use std::collections::HashMap;

/// Entries are keyed by address. The resolver borrows the tree for its whole
/// lifetime, so addresses stay stable and unique while the caches live.
type EntryKey = usize;

fn key(entry: &MenuEntry) -> EntryKey {
    entry as *const MenuEntry as usize
}

/// Answers "is this entry the current page / on the way to it" for one request
///
/// Every answer is cached for the lifetime of the resolver, so asking about a
/// parent and then about each of its children resolves each link once. Create
/// a new resolver for every request; caches are never shared between requests.
///
/// # Example
///
/// ```
/// use rhtmx_menu::{CurrentRequestContext, EntryOptions, MenuEntry, NavigationResolver, RouteTable};
/// use axum::http::Method;
///
/// let router = RouteTable::new().get("/", "pages#home").get("/docs", "docs#index");
///
/// let mut root = MenuEntry::root(EntryOptions::new());
/// root.add("Home", Some("/"), EntryOptions::new());
/// root.add("Docs", Some("/docs"), EntryOptions::new());
///
/// let ctx = CurrentRequestContext::resolve("/docs/", Method::GET, &router);
/// let resolver = NavigationResolver::new(&root, &ctx, &router);
///
/// assert!(resolver.is_active(&root.children()[1]));
/// assert!(!resolver.is_active(&root.children()[0]));
/// ```
pub struct NavigationResolver<'a> {
    root: &'a MenuEntry,
    ctx: &'a CurrentRequestContext,
    router: &'a dyn RouteResolver,
    on_current_page: RefCell<HashMap<EntryKey, bool>>,
    active: RefCell<HashMap<EntryKey, bool>>,
    breadcrumbs: RefCell<HashMap<EntryKey, Vec<&'a MenuEntry>>>,
}

impl std::fmt::Debug for NavigationResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationResolver")
            .field("current_path", &self.ctx.current_path)
            .field("cached", &self.on_current_page.borrow().len())
            .finish()
    }
}

impl<'a> NavigationResolver<'a> {
    pub fn new(
        root: &'a MenuEntry,
        ctx: &'a CurrentRequestContext,
        router: &'a dyn RouteResolver,
    ) -> Self {
        Self {
            root,
            ctx,
            router,
            on_current_page: RefCell::new(HashMap::new()),
            active: RefCell::new(HashMap::new()),
            breadcrumbs: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &'a MenuEntry {
        self.root
    }

    pub fn context(&self) -> &'a CurrentRequestContext {
        self.ctx
    }

    /// Whether `entry` links to the page being served
    ///
    /// A link that the router does not recognise only affects its own entry:
    /// it is logged and treated as "not the current page".
    pub fn is_on_current_page(&self, entry: &'a MenuEntry) -> bool {
        let key = key(entry);
        if let Some(&cached) = self.on_current_page.borrow().get(&key) {
            return cached;
        }

        let result = self.link_matches(entry);
        self.on_current_page.borrow_mut().insert(key, result);
        result
    }

    fn link_matches(&self, entry: &MenuEntry) -> bool {
        let Some(link) = entry.link() else {
            return false;
        };

        if link == self.ctx.current_path {
            return true;
        }

        let Some(current) = &self.ctx.resolved_route else {
            return false;
        };

        match self.router.resolve(link, entry.method()) {
            Ok(route) => {
                (entry.match_by_controller() && route.controller == current.controller)
                    || route == *current
            }
            Err(e) => {
                tracing::debug!(link, method = %entry.method(), "Skipping menu link: {}", e);
                false
            }
        }
    }

    /// Whether `entry` is the current page or an ancestor of it
    pub fn is_active(&self, entry: &'a MenuEntry) -> bool {
        let key = key(entry);
        if let Some(&cached) = self.active.borrow().get(&key) {
            return cached;
        }

        let result = entry.children().iter().any(|child| self.is_active(child))
            || self.is_on_current_page(entry);
        self.active.borrow_mut().insert(key, result);
        result
    }

    /// Chain of active entries from `entry` down to the current page
    ///
    /// Empty when `entry` is not active. When several siblings are active
    /// (two links to the same route) only the first one in menu order is
    /// followed.
    pub fn breadcrumb_path(&self, entry: &'a MenuEntry) -> Vec<&'a MenuEntry> {
        if !self.is_active(entry) {
            return Vec::new();
        }

        let key = key(entry);
        if let Some(cached) = self.breadcrumbs.borrow().get(&key) {
            return cached.clone();
        }

        let mut path = vec![entry];
        if let Some(child) = entry.children().iter().find(|&child| self.is_active(child)) {
            path.extend(self.breadcrumb_path(child));
        }

        self.breadcrumbs.borrow_mut().insert(key, path.clone());
        path
    }

    /// Breadcrumb path below the root (the root itself is an unlinked container)
    pub fn breadcrumb_trail(&self) -> Vec<&'a MenuEntry> {
        self.breadcrumb_path(self.root).into_iter().skip(1).collect()
    }

    /// Deepest entry on the breadcrumb trail, if any entry is active
    pub fn active_leaf(&self) -> Option<&'a MenuEntry> {
        self.breadcrumb_trail().last().copied()
    }

    /// Render one entry as a list item, or nothing for an empty group label
    ///
    /// Linked entries render as `<a>`, group labels as `<span>`. Children are
    /// nested in a `<ul class="menu_level_N">` that also carries `active` and
    /// `current` when they apply.
    pub fn render_entry(&self, entry: &'a MenuEntry) -> Option<Markup> {
        let children = self.render_children(entry);

        let label = match entry.link() {
            Some(link) => html! {
                a href=(link) class=[entry.css_class()] id=[entry.id()] title=[entry.tooltip()] {
                    (entry.title())
                }
            },
            None if children.is_some() => html! { span { (entry.title()) } },
            None => return None,
        };

        let class = self.is_active(entry).then_some("active");
        Some(html! {
            li class=[class] {
                (label)
                @if let Some(children) = children {
                    (children)
                }
            }
        })
    }

    fn render_children(&self, entry: &'a MenuEntry) -> Option<Markup> {
        let items: Vec<Markup> = entry
            .children()
            .iter()
            .filter_map(|child| self.render_entry(child))
            .collect();

        if items.is_empty() {
            return None;
        }

        let mut classes = vec![format!("menu_level_{}", entry.level())];
        if self.is_active(entry) {
            classes.push("active".to_string());
        }
        if self.is_on_current_page(entry)
            || entry.children().iter().any(|child| self.is_on_current_page(child))
        {
            classes.push("current".to_string());
        }

        Some(html! {
            ul class=(classes.join(" ")) {
                @for item in &items {
                    (item)
                }
            }
        })
    }

    /// Render the whole menu as `<ul class="{css_class}">`
    ///
    /// The list also gets `current` when nothing in the menu is active.
    pub fn render_menu(&self, css_class: &str) -> Markup {
        self.render_menu_with_id(css_class, None)
    }

    /// [`render_menu`](Self::render_menu) with an `id` on the outer list
    pub fn render_menu_with_id(&self, css_class: &str, id: Option<&str>) -> Markup {
        let class = if self.is_active(self.root) {
            css_class.to_string()
        } else {
            format!("{} current", css_class)
        };

        html! {
            ul class=(class) id=[id] {
                @for child in self.root.children() {
                    @if let Some(item) = self.render_entry(child) {
                        (item)
                    }
                }
            }
        }
    }
}
