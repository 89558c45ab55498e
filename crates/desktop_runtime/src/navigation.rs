//! Route table and the URL/window synchronization guard.

use crate::model::WindowKind;

/// Splits a location into its path and optional query (without `?`), dropping any fragment.
pub fn split_location(location: &str) -> (&str, Option<&str>) {
    let without_fragment = location.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query).filter(|q| !q.is_empty())),
        None => (without_fragment, None),
    }
}

/// Canonical form of a location: leading `/`, no trailing slash except at root, query kept,
/// fragment dropped.
pub fn normalize_location(location: &str) -> String {
    let (path, query) = split_location(location.trim());
    let trimmed = path.trim_end_matches('/');
    let mut normalized = if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    if let Some(query) = query {
        normalized.push('?');
        normalized.push_str(query);
    }
    normalized
}

/// Value of `name` in a `a=1&b=2` query string. Empty values count as absent.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.replace('+', " "))
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub kind: WindowKind,
    pub title: String,
    /// Query parameter carrying the content key (`id` for `/post?id=42`).
    pub key_param: Option<String>,
}

/// A location resolved against the [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub kind: WindowKind,
    pub content_key: Option<String>,
    pub title: String,
    /// Normalized location that produced the match.
    pub location: String,
}

/// Static path → window-kind table supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, path: &str, kind: WindowKind, title: &str) -> Self {
        self.push(path, kind, title, None);
        self
    }

    pub fn keyed_route(mut self, path: &str, kind: WindowKind, title: &str, key_param: &str) -> Self {
        self.push(path, kind, title, Some(key_param.to_string()));
        self
    }

    fn push(&mut self, path: &str, kind: WindowKind, title: &str, key_param: Option<String>) {
        self.entries.push(RouteEntry {
            path: normalize_location(path),
            kind,
            title: title.to_string(),
            key_param,
        });
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        let location = normalize_location(location);
        let (path, query) = split_location(&location);
        let entry = self.entries.iter().find(|entry| entry.path == path)?;
        let content_key = entry
            .key_param
            .as_deref()
            .and_then(|param| query.and_then(|q| query_param(q, param)));
        Some(RouteMatch {
            kind: entry.kind,
            content_key,
            title: entry.title.clone(),
            location,
        })
    }

    /// Location that shows `kind` (and `content_key` for keyed routes).
    pub fn path_for(&self, kind: WindowKind, content_key: Option<&str>) -> Option<String> {
        let entry = self.entries.iter().find(|entry| entry.kind == kind)?;
        match (entry.key_param.as_deref(), content_key) {
            (Some(param), Some(key)) => Some(format!("{}?{param}={key}", entry.path)),
            _ => Some(entry.path.clone()),
        }
    }
}

/// Owns the route table, the location the browser currently shows, and the location the desktop
/// last navigated to.
///
/// Only the echo of a location this bridge produced skips window sync. That breaks the
/// window → URL → window feedback loop while repeated user navigations still reach the windows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationBridge {
    routes: RouteTable,
    current_location: Option<String>,
    pending_echo: Option<String>,
}

impl NavigationBridge {
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes,
            current_location: None,
            pending_echo: None,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Normalized location the browser shows, as far as the desktop knows.
    pub fn current_location(&self) -> Option<&str> {
        self.current_location.as_deref()
    }

    /// Location produced by the desktop whose router echo has not arrived yet.
    pub fn pending_echo(&self) -> Option<&str> {
        self.pending_echo.as_deref()
    }

    /// Records a route change and reports whether windows should follow it.
    ///
    /// Returns `false` only for the router echo of the bridge's own last navigation.
    pub fn accept_route_change(&mut self, normalized: &str) -> bool {
        self.current_location = Some(normalized.to_string());
        match self.pending_echo.take() {
            Some(produced) => produced != normalized,
            None => true,
        }
    }

    /// Location to navigate to for `path`, or `None` when the browser already shows it.
    pub fn navigation_target(&mut self, path: &str) -> Option<String> {
        let normalized = normalize_location(path);
        if self.current_location.as_deref() == Some(normalized.as_str()) {
            return None;
        }
        Some(self.produce(normalized))
    }

    /// Like [`Self::navigation_target`] but always yields the location.
    pub fn force_navigation(&mut self, path: &str) -> String {
        self.produce(normalize_location(path))
    }

    fn produce(&mut self, normalized: String) -> String {
        self.current_location = Some(normalized.clone());
        self.pending_echo = Some(normalized.clone());
        normalized
    }
}
