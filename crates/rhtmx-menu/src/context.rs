// File: src/context.rs
// Purpose: The per-request view of "where are we" used by menu resolution

use crate::route::{strip_query, RouteDescriptor, RouteResolver};
use axum::http::{Method, Uri};

/// Current request as seen by the menu: its path and what that path resolved to
///
/// Build one per request. A resolver created from it caches its answers, so a
/// different request needs a new context and a new resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRequestContext {
    /// Full request path, query string included when present
    pub current_path: String,

    /// HTTP method of the current request
    pub method: Method,

    /// Router's answer for the current path; None for unroutable pages
    pub resolved_route: Option<RouteDescriptor>,
}

impl CurrentRequestContext {
    /// Create a context from an already resolved route
    pub fn new(current_path: impl Into<String>, resolved_route: RouteDescriptor) -> Self {
        Self {
            current_path: current_path.into(),
            method: Method::GET,
            resolved_route: Some(resolved_route),
        }
    }

    /// Create a context for a path the router does not know
    pub fn unrouted(current_path: impl Into<String>) -> Self {
        Self {
            current_path: current_path.into(),
            method: Method::GET,
            resolved_route: None,
        }
    }

    /// Resolve `current_path` through `router` to build the context
    ///
    /// An unknown path still yields a context; entries can then only match
    /// it literally.
    pub fn resolve(
        current_path: impl Into<String>,
        method: Method,
        router: &dyn RouteResolver,
    ) -> Self {
        let current_path = current_path.into();
        let resolved_route = match router.resolve(strip_query(&current_path), &method) {
            Ok(route) => Some(route),
            Err(e) => {
                tracing::debug!("Current request is not routable: {}", e);
                None
            }
        };

        Self {
            current_path,
            method,
            resolved_route,
        }
    }

    /// Build a context from an incoming request's method and URI
    pub fn from_request(method: &Method, uri: &Uri, router: &dyn RouteResolver) -> Self {
        let current_path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        Self::resolve(current_path, method.clone(), router)
    }

    /// Path without query string or fragment
    pub fn path(&self) -> &str {
        strip_query(&self.current_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteTable;

    fn table() -> RouteTable {
        RouteTable::new()
            .get("/docs", "docs#index")
            .get("/docs/:page", "docs#show")
    }

    #[test]
    fn test_resolve_known_path() {
        let ctx = CurrentRequestContext::resolve("/docs/api", Method::GET, &table());
        assert_eq!(ctx.current_path, "/docs/api");
        assert_eq!(
            ctx.resolved_route,
            Some(RouteDescriptor::new("docs", "show").with_param("page", "api"))
        );
    }

    #[test]
    fn test_resolve_unknown_path() {
        let ctx = CurrentRequestContext::resolve("/missing", Method::GET, &table());
        assert!(ctx.resolved_route.is_none());
    }

    #[test]
    fn test_from_request_keeps_query() {
        let uri: Uri = "/docs?sort=asc".parse().unwrap();
        let ctx = CurrentRequestContext::from_request(&Method::GET, &uri, &table());
        assert_eq!(ctx.current_path, "/docs?sort=asc");
        assert_eq!(ctx.path(), "/docs");
        assert_eq!(ctx.resolved_route, Some(RouteDescriptor::new("docs", "index")));
    }

    #[test]
    fn test_unrouted() {
        let ctx = CurrentRequestContext::unrouted("/404");
        assert_eq!(ctx.method, Method::GET);
        assert!(ctx.resolved_route.is_none());
    }
}
