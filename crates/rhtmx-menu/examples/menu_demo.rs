// Example: site navigation with session breadcrumbs
//
// Run with `cargo run -p rhtmx-menu --example menu_demo` and browse around.
// The breadcrumb trail follows you even when you leave the menu's structure
// (try Docs → API → Pricing, then click back to Docs).

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use maud::{html, PreEscaped, DOCTYPE};
use rhtmx_menu::{
    CurrentRequestContext, EntryOptions, MemorySessionStore, MenuConfig, MenuItemExt, MenuRoot,
    RouteTable,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

const SESSION_COOKIE: &str = "menu_demo_sid";
const STYLE: &str = ".active > a { font-weight: bold; } .current { border-left: 2px solid #c33; }";

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    menu: Arc<MenuRoot>,
    routes: Arc<RouteTable>,
    // Never evicted and keyed by an unsigned cookie: demo only, not for production
    sessions: Arc<RwLock<HashMap<String, MemorySessionStore>>>,
    next_session: Arc<AtomicU64>,
}

fn routes() -> RouteTable {
    RouteTable::new()
        .get("/", "pages#home")
        .get("/pricing", "pages#pricing")
        .get("/docs", "docs#index")
        .get("/docs/api", "docs#api")
        .get("/docs/guides/:slug", "guides#show")
        .get("/users", "users#index")
        .get("/users/:id", "users#show")
}

fn menu(config: MenuConfig) -> MenuRoot {
    MenuRoot::new(config).build(|root| {
        root.menu_item("Home", "/");
        root.add_with("Docs", Some("/docs"), EntryOptions::new(), |docs| {
            docs.menu_item("API", "/docs/api");
            docs.menu_group("Guides")
                .menu_item("Getting started", "/docs/guides/getting-started");
        });
        root.add("Users", Some("/users"), EntryOptions::new().match_by_controller());
        // Nothing below it: never rendered
        root.menu_group("Coming soon");
    })
}

/// Session id from the Cookie header
fn session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(key, _)| *key == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

async fn page(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let (sid, is_new) = match session_id(&headers) {
        Some(sid) => (sid, false),
        None => (state.next_session.fetch_add(1, Ordering::Relaxed).to_string(), true),
    };

    let ctx = CurrentRequestContext::from_request(&method, &uri, state.routes.as_ref());
    let title = match &ctx.resolved_route {
        Some(route) => format!("{} / {}", route.controller, route.action),
        None => "Not found".to_string(),
    };

    let mut sessions = state.sessions.write().await;
    let session = sessions.entry(sid.clone()).or_default();

    let nav = state.menu.render_menu(&ctx, state.routes.as_ref());
    let trail = state.menu.render_breadcrumb(session, &ctx, state.routes.as_ref(), &title);
    let back = state.menu.previous_page_path(session, 2);
    drop(sessions);

    info!(path = %ctx.current_path, session = %sid, "Rendered page");

    let body = html! {
        (DOCTYPE)
        html {
            head {
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                nav { (nav) }
                div.breadcrumbs { (trail) }
                h1 { (title) }
                p { a href=(back) { "Back" } }
            }
        }
    };

    let mut response = Html(body.into_string()).into_response();
    if is_new {
        if let Ok(cookie) = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, sid).parse() {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = MenuConfig::load_default().unwrap_or_else(|e| {
        eprintln!("Failed to load menu config: {}, using defaults", e);
        MenuConfig::default()
    });

    let state = AppState {
        menu: Arc::new(menu(config)),
        routes: Arc::new(routes()),
        sessions: Arc::new(RwLock::new(HashMap::new())),
        next_session: Arc::new(AtomicU64::new(1)),
    };

    let app = Router::new().fallback(page).with_state(state);

    let addr = "127.0.0.1:3000";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
