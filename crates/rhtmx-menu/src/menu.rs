// File: src/menu.rs
// Purpose: The page-facing menu: a tree plus configuration, labels, and session breadcrumbs

use crate::config::MenuConfig;
use crate::context::CurrentRequestContext;
use crate::entry::{EntryOptions, MenuEntry};
use crate::i18n::Translate;
use crate::resolver::NavigationResolver;
use crate::route::RouteResolver;
use crate::session::{BreadcrumbSession, Crumb, SessionStore};
use maud::Markup;

/// A complete menu as used by a page template
///
/// Owns the entry tree and knows how to render it, how to label the root
/// breadcrumb, and where breadcrumb history lives in the session.
///
/// # Example
///
/// ```
/// use axum::http::Method;
/// use rhtmx_menu::{
///     CurrentRequestContext, MemorySessionStore, MenuConfig, MenuItemExt, MenuRoot, RouteTable,
/// };
///
/// let router = RouteTable::new()
///     .get("/", "pages#home")
///     .get("/docs", "docs#index")
///     .get("/docs/api", "docs#api");
///
/// let menu = MenuRoot::new(MenuConfig::default()).build(|root| {
///     root.menu_item("Home", "/");
///     root.menu_item("Docs", "/docs").menu_item("API", "/docs/api");
/// });
///
/// let ctx = CurrentRequestContext::resolve("/docs/api", Method::GET, &router);
/// let mut session = MemorySessionStore::new();
///
/// let trail = menu.render_breadcrumb(&mut session, &ctx, &router, "API").into_string();
/// assert_eq!(trail, r#"<a href="/">Home</a> &raquo; <a href="/docs">Docs</a> &raquo; API"#);
/// ```
pub struct MenuRoot {
    tree: MenuEntry,
    config: MenuConfig,
    labels: Box<dyn Translate + Send + Sync>,
}

impl std::fmt::Debug for MenuRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuRoot")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .finish()
    }
}

impl MenuRoot {
    /// Create an empty menu; labels come from the config's `[labels]` table
    pub fn new(config: MenuConfig) -> Self {
        let labels = Box::new(config.catalog());
        Self {
            tree: MenuEntry::root(EntryOptions::new()),
            config,
            labels,
        }
    }

    /// Builder method to replace the label source
    pub fn with_labels(mut self, labels: impl Translate + Send + Sync + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    /// Populate the tree
    pub fn build<F>(mut self, build: F) -> Self
    where
        F: FnOnce(&mut MenuEntry),
    {
        build(&mut self.tree);
        self
    }

    /// Append a top-level entry
    pub fn add(
        &mut self,
        title: impl Into<String>,
        link: Option<&str>,
        options: EntryOptions,
    ) -> &mut MenuEntry {
        self.tree.add(title, link, options)
    }

    pub fn tree(&self) -> &MenuEntry {
        &self.tree
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Resolver for one request over this menu's tree
    pub fn resolver<'a>(
        &'a self,
        ctx: &'a CurrentRequestContext,
        router: &'a dyn RouteResolver,
    ) -> NavigationResolver<'a> {
        NavigationResolver::new(&self.tree, ctx, router)
    }

    /// Render the full `<ul class="menu">` for the current request
    pub fn render_menu(&self, ctx: &CurrentRequestContext, router: &dyn RouteResolver) -> Markup {
        let section = &self.config.menu;
        self.resolver(ctx, router)
            .render_menu_with_id(&section.css_class, section.id.as_deref())
    }

    /// First crumb of every trail: the configured root URL and its label
    pub fn root_crumb(&self) -> Crumb {
        let breadcrumb = &self.config.breadcrumb;
        Crumb::new(
            breadcrumb.root_url.clone(),
            self.labels.translate(&breadcrumb.root_label_key),
        )
    }

    /// Update the session history for this request and render the trail
    pub fn render_breadcrumb(
        &self,
        session: &mut dyn SessionStore,
        ctx: &CurrentRequestContext,
        router: &dyn RouteResolver,
        page_title: &str,
    ) -> Markup {
        let key = &self.config.breadcrumb.session_key;
        let resolver = self.resolver(ctx, router);

        let mut history = BreadcrumbSession::load(session, key);
        history.reconcile(ctx, &resolver.breadcrumb_trail(), page_title, self.root_crumb());
        history.save(session, key);

        history.render(&self.config.breadcrumb.separator)
    }

    /// Path of a page visited earlier in this session
    ///
    /// Falls back to the configured path when the history is too short.
    pub fn previous_page_path(&self, session: &dyn SessionStore, steps_back: usize) -> String {
        let breadcrumb = &self.config.breadcrumb;
        BreadcrumbSession::load(session, &breadcrumb.session_key)
            .previous_page_path(steps_back, &breadcrumb.fallback_path)
    }
}

impl Default for MenuRoot {
    fn default() -> Self {
        Self::new(MenuConfig::default())
    }
}

/// Shorthand for the common case: a linked entry with default options
pub trait MenuItemExt {
    fn menu_item(&mut self, title: &str, link: &str) -> &mut MenuEntry;
    fn menu_group(&mut self, title: &str) -> &mut MenuEntry;
}

impl MenuItemExt for MenuEntry {
    fn menu_item(&mut self, title: &str, link: &str) -> &mut MenuEntry {
        self.add(title, Some(link), EntryOptions::new())
    }

    fn menu_group(&mut self, title: &str) -> &mut MenuEntry {
        self.add(title, None, EntryOptions::new())
    }
}
