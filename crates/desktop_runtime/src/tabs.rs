//! Navigation tabs correlated with windows, and the bounded recently-closed ring.

use std::collections::VecDeque;

use crate::{
    model::{HistoryEntry, Tab, WindowId, WindowRecord},
    navigation::split_location,
};

/// Outcome of closing a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabClose {
    pub tab: Tab,
    /// Location the browser should show next.
    pub fallback: String,
}

/// Ordered browser-style tab list; at most one tab is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    fallback_path: String,
    next_tab_seq: u64,
}

impl TabStrip {
    pub fn new(fallback_path: impl Into<String>) -> Self {
        Self {
            tabs: Vec::new(),
            fallback_path: fallback_path.into(),
            next_tab_seq: 1,
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active(&self) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.is_active)
    }

    pub fn set_fallback_path(&mut self, fallback_path: impl Into<String>) {
        self.fallback_path = fallback_path.into();
    }

    /// Activates the tab showing `path`, creating it when missing.
    ///
    /// A new tab takes `window_id` as its id when given, so later lookups correlate by id.
    pub fn activate_path(&mut self, path: &str, title: &str, window_id: Option<&WindowId>) -> &Tab {
        let index = match self.tabs.iter().position(|tab| tab.path == path) {
            Some(index) => index,
            None => {
                let id = match window_id {
                    Some(id) if !self.tabs.iter().any(|tab| tab.id == id.0) => id.0.clone(),
                    _ => self.allocate_id(),
                };
                self.tabs.push(Tab {
                    id,
                    path: path.to_string(),
                    title: title.to_string(),
                    is_active: false,
                });
                self.tabs.len() - 1
            }
        };
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.is_active = i == index;
        }
        &self.tabs[index]
    }

    /// Index of the tab correlated with `window`: by id, then exact path, then path prefix.
    pub fn position_for_window(&self, window: &WindowRecord) -> Option<usize> {
        if let Some(index) = self.tabs.iter().position(|tab| tab.id == window.id.0) {
            return Some(index);
        }
        let route = window.route.as_deref()?;
        self.tabs
            .iter()
            .position(|tab| tab.path == route)
            .or_else(|| {
                self.tabs
                    .iter()
                    .position(|tab| paths_correlate(&tab.path, route))
            })
    }

    pub fn close_tab_for_window(&mut self, window: &WindowRecord) -> Option<TabClose> {
        let index = self.position_for_window(window)?;
        Some(self.close_at(index))
    }

    pub fn close_tab(&mut self, tab_id: &str) -> Option<TabClose> {
        let index = self.tabs.iter().position(|tab| tab.id == tab_id)?;
        Some(self.close_at(index))
    }

    /// Renames the tab correlated with `window`.
    pub fn rename_for_window(&mut self, window: &WindowRecord, title: &str) -> bool {
        let Some(index) = self.position_for_window(window) else {
            return false;
        };
        self.tabs[index].title = title.to_string();
        true
    }

    /// Puts a previously closed tab back and activates it.
    pub fn restore(&mut self, tab: Tab) {
        let path = tab.path.clone();
        if !self.tabs.iter().any(|t| t.path == path || t.id == tab.id) {
            self.tabs.push(Tab {
                is_active: false,
                ..tab
            });
        }
        let title = self
            .tabs
            .iter()
            .find(|t| t.path == path)
            .map(|t| t.title.clone())
            .unwrap_or_default();
        self.activate_path(&path, &title, None);
    }

    pub fn clear(&mut self) {
        self.tabs.clear();
    }

    fn close_at(&mut self, index: usize) -> TabClose {
        let tab = self.tabs.remove(index);
        let fallback = if self.tabs.is_empty() {
            self.fallback_path.clone()
        } else if tab.is_active {
            let next = index.saturating_sub(1).min(self.tabs.len() - 1);
            for (i, t) in self.tabs.iter_mut().enumerate() {
                t.is_active = i == next;
            }
            self.tabs[next].path.clone()
        } else {
            self.active()
                .map(|t| t.path.clone())
                .unwrap_or_else(|| self.fallback_path.clone())
        };
        TabClose { tab, fallback }
    }

    fn allocate_id(&mut self) -> String {
        loop {
            let id = format!("tab-{}", self.next_tab_seq);
            self.next_tab_seq += 1;
            if !self.tabs.iter().any(|tab| tab.id == id) {
                return id;
            }
        }
    }
}

/// `/post` correlates with `/post?id=42`; two different queries on the same path do not.
pub fn paths_correlate(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let (a_path, a_query) = split_location(a);
    let (b_path, b_query) = split_location(b);
    a_path == b_path && (a_query.is_none() || b_query.is_none())
}

/// Newest-first ring of closed windows, deduplicated by window id and by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl ClosedHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        let path = entry.path().map(str::to_owned);
        self.entries.retain(|existing| {
            existing.window.id != entry.window.id
                && (path.is_none() || existing.path() != path.as_deref())
        });
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Removes and returns the entry for `window_id`.
    pub fn take(&mut self, window_id: &str) -> Option<HistoryEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.window.id == window_id)?;
        self.entries.remove(index)
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.entries.truncate(self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{WindowKind, WindowLayoutRecord, WindowRect};

    fn window(id: &str, route: Option<&str>) -> WindowRecord {
        WindowRecord {
            id: WindowId::from(id),
            kind: WindowKind::Post,
            content_key: None,
            title: id.to_string(),
            rect: WindowRect::default(),
            pre_restore: None,
            z_index: 10,
            is_focused: false,
            minimized: false,
            maximized: false,
            route: route.map(str::to_owned),
            closing: None,
        }
    }

    fn entry(id: &str, route: &str) -> HistoryEntry {
        HistoryEntry {
            window: WindowLayoutRecord {
                route: Some(route.to_string()),
                ..window(id, Some(route)).layout_record()
            },
            tab: None,
        }
    }

    fn paths(strip: &TabStrip) -> Vec<&str> {
        strip.tabs().iter().map(|t| t.path.as_str()).collect()
    }

    #[test]
    fn activating_existing_path_reuses_tab() {
        let mut strip = TabStrip::new("/");
        strip.activate_path("/", "Home", None);
        strip.activate_path("/explore", "Explore", None);
        strip.activate_path("/", "Home", None);
        assert_eq!(paths(&strip), vec!["/", "/explore"]);
        assert_eq!(strip.active().map(|t| t.path.as_str()), Some("/"));
    }

    #[test]
    fn closing_active_tab_falls_back_to_previous() {
        let mut strip = TabStrip::new("/");
        strip.activate_path("/", "Home", None);
        strip.activate_path("/explore", "Explore", None);
        strip.activate_path("/search", "Search", None);
        let id = strip.active().expect("active").id.clone();

        let closed = strip.close_tab(&id).expect("close");
        assert_eq!(closed.fallback, "/explore");
        assert_eq!(strip.active().map(|t| t.path.as_str()), Some("/explore"));
    }

    #[test]
    fn closing_first_active_tab_falls_forward() {
        let mut strip = TabStrip::new("/");
        strip.activate_path("/explore", "Explore", None);
        strip.activate_path("/search", "Search", None);
        strip.activate_path("/explore", "Explore", None);
        let id = strip.active().expect("active").id.clone();

        assert_eq!(strip.close_tab(&id).expect("close").fallback, "/search");
    }

    #[test]
    fn closing_background_tab_keeps_active_and_last_tab_uses_fallback() {
        let mut strip = TabStrip::new("/");
        strip.activate_path("/explore", "Explore", None);
        let background = strip.tabs()[0].id.clone();
        strip.activate_path("/search", "Search", None);

        assert_eq!(strip.close_tab(&background).expect("close").fallback, "/search");
        let last = strip.tabs()[0].id.clone();
        assert_eq!(strip.close_tab(&last).expect("close").fallback, "/");
        assert!(strip.tabs().is_empty());
    }

    #[test]
    fn window_correlation_by_id_then_path_then_prefix() {
        let mut strip = TabStrip::new("/");
        strip.activate_path("/post?id=1", "Post", Some(&WindowId::from("post-a")));
        strip.activate_path("/questions", "Questions", None);

        assert_eq!(strip.position_for_window(&window("post-a", None)), Some(0));
        assert_eq!(
            strip.position_for_window(&window("other", Some("/post?id=1"))),
            Some(0)
        );
        assert_eq!(
            strip.position_for_window(&window("q", Some("/questions?id=7"))),
            Some(1)
        );
        assert_eq!(
            strip.position_for_window(&window("p2", Some("/post?id=2"))),
            None
        );
    }

    #[test]
    fn history_dedupes_by_id_and_path_and_respects_capacity() {
        let mut history = ClosedHistory::new(3);
        history.push(entry("a", "/a"));
        history.push(entry("b", "/b"));
        history.push(entry("a2", "/a"));
        history.push(entry("b", "/b2"));
        let ids: Vec<&str> = history.entries().map(|e| e.window.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a2"]);

        history.push(entry("c", "/c"));
        history.push(entry("d", "/d"));
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|e| e.window.id.as_str()), Some("d"));
        assert!(history.take("a2").is_none());
        assert!(history.take("c").is_some());
    }
}
