// File: src/route.rs
// Purpose: Route descriptors, the resolver seam, and a pattern-based route table

use crate::error::RouteResolutionError;
use axum::http::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// What a path resolves to: the handling controller, its action, and parameters
///
/// Two descriptors are the same page when all three parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    pub controller: String,
    pub action: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl RouteDescriptor {
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder method to add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Resolves an arbitrary path through the application's router
pub trait RouteResolver {
    fn resolve(&self, path: &str, method: &Method) -> Result<RouteDescriptor, RouteResolutionError>;
}

/// Validates if a path is in canonical form
///
/// Canonical paths start with `/`, contain no `//` or `\`, and only the root
/// ends with `/`.
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }
    if path.contains("//") || path.contains('\\') {
        return false;
    }
    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Borrows when the input is already canonical.
///
/// ```
/// use rhtmx_menu::route::normalize_path;
///
/// assert_eq!(normalize_path("/docs/"), "/docs");
/// assert_eq!(normalize_path("\\docs\\api"), "/docs/api");
/// assert_eq!(normalize_path("//"), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Drop the query string and fragment from a request path
pub fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

/// A single route: verb, URL pattern, and the controller/action it dispatches to
///
/// Pattern segments may be static (`docs`), required (`:id`), optional
/// (`:page?`) or catch-all (`*rest`).
#[derive(Debug, Clone)]
pub struct RouteDef {
    pub method: Method,
    pub pattern: String,
    pub controller: String,
    pub action: String,
    /// Values used for parameters the path leaves out
    pub defaults: BTreeMap<String, String>,
    /// Lower matches first
    pub priority: usize,
}

impl RouteDef {
    /// Create a route from a `controller#action` target
    ///
    /// ```
    /// use axum::http::Method;
    /// use rhtmx_menu::RouteDef;
    ///
    /// let route = RouteDef::new(Method::GET, "/users/:id", "users#show");
    /// assert_eq!(route.controller, "users");
    /// assert_eq!(route.action, "show");
    /// ```
    pub fn new(method: Method, pattern: &str, target: &str) -> Self {
        let (controller, action) = target.split_once('#').unwrap_or((target, "index"));
        let pattern = normalize_path(pattern).into_owned();
        let priority = calculate_priority(&pattern);

        Self {
            method,
            pattern,
            controller: controller.to_string(),
            action: action.to_string(),
            defaults: BTreeMap::new(),
            priority,
        }
    }

    /// Builder method to supply a default parameter value
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Match a normalized path, returning the extracted parameters
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let pattern_segments: Vec<&str> =
            self.pattern.split('/').filter(|s| !s.is_empty()).collect();
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut params = match_segments(&pattern_segments, &path_segments, BTreeMap::new())?;
        for (name, value) in &self.defaults {
            params.entry(name.clone()).or_insert_with(|| value.clone());
        }
        Some(params)
    }

    fn descriptor(&self, params: BTreeMap<String, String>) -> RouteDescriptor {
        RouteDescriptor {
            controller: self.controller.clone(),
            action: self.action.clone(),
            params,
        }
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| segment.to_string())
}

fn match_segments(
    pattern: &[&str],
    path: &[&str],
    mut params: BTreeMap<String, String>,
) -> Option<BTreeMap<String, String>> {
    let Some((&segment, rest)) = pattern.split_first() else {
        return path.is_empty().then_some(params);
    };

    match segment.chars().next() {
        Some('*') => {
            let name = segment.trim_start_matches('*');
            if path.is_empty() {
                return None;
            }
            let joined = path.iter().map(|s| decode(s)).collect::<Vec<_>>().join("/");
            params.insert(name.to_string(), joined);
            Some(params)
        }
        Some(':') if segment.ends_with('?') => {
            let name = &segment[1..segment.len() - 1];
            if let Some((&value, path_rest)) = path.split_first() {
                let mut consumed = params.clone();
                consumed.insert(name.to_string(), decode(value));
                if let Some(found) = match_segments(rest, path_rest, consumed) {
                    return Some(found);
                }
            }
            match_segments(rest, path, params)
        }
        Some(':') => {
            let (&value, path_rest) = path.split_first()?;
            params.insert(segment[1..].to_string(), decode(value));
            match_segments(rest, path_rest, params)
        }
        _ => {
            let (&value, path_rest) = path.split_first()?;
            if segment != value {
                return None;
            }
            match_segments(rest, path_rest, params)
        }
    }
}

/// Static routes first, then fewer dynamic segments, catch-alls last
fn calculate_priority(pattern: &str) -> usize {
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let depth = segments.len();

    if segments.iter().any(|s| s.starts_with('*')) {
        return 1000 + depth;
    }

    let dynamic = segments.iter().filter(|s| s.starts_with(':')).count();
    if dynamic == 0 {
        return 0;
    }
    let optional = segments.iter().filter(|s| s.ends_with('?')).count();
    dynamic + depth + optional
}

/// A list of routes consulted in priority order
///
/// # Example
///
/// ```
/// use axum::http::Method;
/// use rhtmx_menu::{RouteDef, RouteResolver, RouteTable};
///
/// let mut table = RouteTable::new();
/// table.add_route(RouteDef::new(Method::GET, "/users/new", "users#new"));
/// table.add_route(RouteDef::new(Method::GET, "/users/:id", "users#show"));
///
/// let route = table.resolve("/users/42", &Method::GET).unwrap();
/// assert_eq!(route.action, "show");
/// assert_eq!(route.params.get("id").map(String::as_str), Some("42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route, keeping the table ordered by priority
    ///
    /// Routes with equal priority keep their insertion order.
    pub fn add_route(&mut self, route: RouteDef) {
        let at = self
            .routes
            .iter()
            .position(|existing| existing.priority > route.priority)
            .unwrap_or(self.routes.len());
        self.routes.insert(at, route);
    }

    /// Builder variant of [`RouteTable::add_route`]
    pub fn with_route(mut self, route: RouteDef) -> Self {
        self.add_route(route);
        self
    }

    /// Shorthand for a GET route
    pub fn get(self, pattern: &str, target: &str) -> Self {
        self.with_route(RouteDef::new(Method::GET, pattern, target))
    }

    /// Shorthand for a POST route
    pub fn post(self, pattern: &str, target: &str) -> Self {
        self.with_route(RouteDef::new(Method::POST, pattern, target))
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, path: &str, method: &Method) -> Result<RouteDescriptor, RouteResolutionError> {
        let path = normalize_path(strip_query(path));

        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| route.matches(&path).map(|params| route.descriptor(params)))
            .ok_or_else(|| RouteResolutionError::NoMatch {
                method: method.clone(),
                path: path.into_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table() -> RouteTable {
        RouteTable::new()
            .get("/", "pages#home")
            .get("/docs/:page?", "docs#show")
            .get("/docs/api", "docs#api")
            .get("/users/:id", "users#show")
            .get("/files/*path", "files#show")
            .post("/users", "users#create")
            .with_route(RouteDef::new(Method::GET, "/blog/:page?", "blog#index").with_default("page", "1"))
    }

    #[rstest]
    #[case("/", true)]
    #[case("/about", true)]
    #[case("", false)]
    #[case("about", false)]
    #[case("/about/", false)]
    #[case("/about//page", false)]
    #[case("/about\\page", false)]
    fn test_is_valid_path(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_valid_path(path), expected);
    }

    #[test]
    fn test_normalize_borrows_valid_paths() {
        assert!(matches!(normalize_path("/docs"), Cow::Borrowed("/docs")));
        assert_eq!(normalize_path("/path//to///page/"), "/path/to/page");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/docs?page=2"), "/docs");
        assert_eq!(strip_query("/docs#top"), "/docs");
        assert_eq!(strip_query("/docs"), "/docs");
    }

    #[test]
    fn test_target_without_action_defaults_to_index() {
        let route = RouteDef::new(Method::GET, "/posts", "posts");
        assert_eq!(route.action, "index");
    }

    #[test]
    fn test_static_route_beats_dynamic() {
        let route = table().resolve("/docs/api", &Method::GET).unwrap();
        assert_eq!(route, RouteDescriptor::new("docs", "api"));
    }

    #[test]
    fn test_optional_param() {
        let table = table();
        assert_eq!(
            table.resolve("/docs", &Method::GET).unwrap(),
            RouteDescriptor::new("docs", "show")
        );
        assert_eq!(
            table.resolve("/docs/intro", &Method::GET).unwrap(),
            RouteDescriptor::new("docs", "show").with_param("page", "intro")
        );
    }

    #[test]
    fn test_defaults_fill_missing_params() {
        let table = table();
        let bare = table.resolve("/blog", &Method::GET).unwrap();
        let explicit = table.resolve("/blog/1", &Method::GET).unwrap();
        assert_eq!(bare, explicit);
        assert_eq!(bare.params.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_catch_all_requires_a_segment() {
        let table = table();
        let route = table.resolve("/files/a/b%20c.txt", &Method::GET).unwrap();
        assert_eq!(route.params.get("path").map(String::as_str), Some("a/b c.txt"));
        assert!(table.resolve("/files", &Method::GET).is_err());
    }

    #[test]
    fn test_method_is_part_of_the_match() {
        let table = table();
        assert_eq!(
            table.resolve("/users", &Method::POST).unwrap(),
            RouteDescriptor::new("users", "create")
        );
        assert_eq!(
            table.resolve("/users", &Method::GET),
            Err(RouteResolutionError::NoMatch {
                method: Method::GET,
                path: "/users".to_string(),
            })
        );
    }

    #[test]
    fn test_resolve_ignores_trailing_slash_and_query() {
        let table = table();
        assert_eq!(
            table.resolve("/users/7/?tab=posts", &Method::GET).unwrap(),
            RouteDescriptor::new("users", "show").with_param("id", "7")
        );
    }

    #[test]
    fn test_equal_priority_keeps_insertion_order() {
        let table = RouteTable::new()
            .get("/a/:x", "first#show")
            .get("/a/:y", "second#show");
        assert_eq!(table.resolve("/a/1", &Method::GET).unwrap().controller, "first");
    }
}
