//! # RHTMX Menu
//!
//! Navigation menus and breadcrumb trails for server-rendered RHTMX pages.
//!
//! - Author the menu as a tree with [`MenuEntry::add`]
//! - Entries are matched against the current request by route, not just by
//!   literal path, so `/docs/` and `/docs` light up the same entry
//! - Each request gets its own [`NavigationResolver`]; answers are cached for
//!   that request only
//! - Breadcrumbs remember where the visitor came from across requests via a
//!   [`SessionStore`], truncating when they go back
//!
//! ## Example
//!
//! ```
//! use axum::http::Method;
//! use rhtmx_menu::{CurrentRequestContext, MenuItemExt, MenuRoot, RouteTable};
//!
//! let router = RouteTable::new()
//!     .get("/", "pages#home")
//!     .get("/docs", "docs#index")
//!     .get("/docs/api", "docs#api");
//!
//! let menu = MenuRoot::default().build(|root| {
//!     root.menu_item("Home", "/");
//!     root.menu_item("Docs", "/docs").menu_item("API", "/docs/api");
//! });
//!
//! let ctx = CurrentRequestContext::resolve("/docs/api", Method::GET, &router);
//! let html = menu.render_menu(&ctx, &router).into_string();
//!
//! assert!(html.contains(r#"<ul class="menu_level_1 active current">"#));
//! ```

pub mod config;
pub mod context;
pub mod entry;
pub mod error;
pub mod i18n;
pub mod menu;
pub mod resolver;
pub mod route;
pub mod session;

pub use config::{BreadcrumbConfig, MenuConfig, MenuSection};
pub use context::CurrentRequestContext;
pub use entry::{EntryOptions, MenuEntry};
pub use error::{RouteResolutionError, SessionError};
pub use i18n::{Catalog, Translate};
pub use menu::{MenuItemExt, MenuRoot};
pub use resolver::NavigationResolver;
pub use route::{RouteDef, RouteDescriptor, RouteResolver, RouteTable};
pub use session::{
    previous_page_path, render_crumbs, BreadcrumbSession, Crumb, MemorySessionStore, SessionStore,
};

// Re-export Maud so callers can splice menus into their templates
pub use maud::{Markup, PreEscaped};
