// File: src/error.rs
// Purpose: Error types for route resolution and breadcrumb history

use axum::http::Method;

/// A menu link that the router does not recognise
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteResolutionError {
    #[error("no route matches {method} {path}")]
    NoMatch { method: Method, path: String },
}

/// Problems reading breadcrumb history back out of the session
///
/// Neither variant reaches a page render: missing history falls back to the
/// configured root path and malformed history is re-seeded from the menu.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("requested {requested} steps back but only {available} crumbs are stored")]
    MissingHistory { requested: usize, available: usize },

    #[error("stored breadcrumbs could not be decoded: {0}")]
    Malformed(#[from] serde_json::Error),
}
