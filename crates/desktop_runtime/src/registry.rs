//! Canonical window collection and its narrow mutation API.
//!
//! [`WindowRegistry`] is the only owner of window records. Operations on unknown (or closing)
//! ids are no-ops that report `false`/`None`, because UI events routinely race with closes.
//! Every mutation leaves the registry satisfying:
//!
//! - ids are unique (closing windows included);
//! - at most one window is focused, and it is live and not minimized;
//! - live, non-minimized windows have distinct z-indices and the focused one is on top;
//! - sizes are at least the effective minimum;
//! - singleton kinds have one live instance and keyed kinds one per `(kind, content_key)`.

use leptos::logging;

use crate::{
    config::WindowManagerConfig,
    geometry,
    kinds::{descriptor, is_singleton},
    model::{
        ClosingState, HistoryEntry, OpenWindowOptions, PendingClose, SnapSide, Tab, WindowHandle,
        WindowId, WindowKind, WindowLayoutRecord, WindowPatch, WindowRecord, WindowRect,
    },
    stacking::{focus_fallback, StackingPolicy},
    tabs::ClosedHistory,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRegistry {
    windows: Vec<WindowRecord>,
    stacking: StackingPolicy,
    history: ClosedHistory,
    config: WindowManagerConfig,
    next_window_seq: u64,
    next_close_token: u64,
    cancelled_tokens: Vec<u64>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new(WindowManagerConfig::default())
    }
}

impl WindowRegistry {
    pub fn new(config: WindowManagerConfig) -> Self {
        Self {
            windows: Vec::new(),
            stacking: StackingPolicy::new(config.base_z_index, config.max_z_index),
            history: ClosedHistory::new(config.history_capacity),
            config,
            next_window_seq: 1,
            next_close_token: 1,
            cancelled_tokens: Vec::new(),
        }
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: WindowManagerConfig) {
        self.stacking
            .set_bounds(config.base_z_index, config.max_z_index, &mut self.windows);
        self.history.set_capacity(config.history_capacity);
        self.config = config;
    }

    /// All windows in insertion order, closing ones included.
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn live_windows(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter().filter(|w| w.is_live())
    }

    pub fn get(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn get_live(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.get(window_id).filter(|w| w.is_live())
    }

    pub fn focused(&self) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.is_focused)
    }

    pub fn history(&self) -> &ClosedHistory {
        &self.history
    }

    /// Live window matching the singleton rule for `kind` or its `(kind, content_key)` key.
    pub fn find_live(&self, kind: WindowKind, content_key: Option<&str>) -> Option<&WindowRecord> {
        let singleton = is_singleton(kind);
        self.live_windows()
            .find(|w| w.kind == kind && (singleton || w.content_key.as_deref() == content_key))
    }

    /// Tokens of close timers whose windows were removed without finalizing.
    pub fn take_cancelled_tokens(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.cancelled_tokens)
    }

    /// Opens a window or focuses the live window it would duplicate.
    pub fn open_window(
        &mut self,
        kind: WindowKind,
        options: OpenWindowOptions,
        viewport: WindowRect,
    ) -> WindowHandle {
        // An explicit id names this window only when the kinds agree; a live
        // window of another kind keeps its id and the new one gets a fresh one.
        let mut explicit_id = options.id.clone().filter(|id| !id.is_empty()).map(WindowId);
        if let Some(explicit) = explicit_id.clone() {
            match self.get(&explicit).map(|w| (w.is_live(), w.kind == kind)) {
                Some((true, true)) => {
                    self.bring_to_front(&explicit);
                    return WindowHandle {
                        id: explicit,
                        created: false,
                    };
                }
                Some((true, false)) => explicit_id = None,
                Some((false, _)) => self.drop_closing(&explicit),
                None => {}
            }
        }

        let content_key = options.content_key.clone().filter(|key| !key.is_empty());
        if let Some(existing) = self
            .find_live(kind, content_key.as_deref())
            .map(|w| w.id.clone())
        {
            self.bring_to_front(&existing);
            return WindowHandle {
                id: existing,
                created: false,
            };
        }

        let id = match explicit_id {
            Some(id) => id,
            None => self.allocate_id(kind),
        };
        let descriptor = descriptor(kind);
        let (default_w, default_h) = descriptor.default_size.unwrap_or((
            self.config.default_window_width,
            self.config.default_window_height,
        ));
        let mut rect = geometry::centered_rect(
            options.width.unwrap_or(default_w),
            options.height.unwrap_or(default_h),
            &self.config,
            viewport,
        );
        if options.x.is_some() || options.y.is_some() {
            rect = geometry::fit_rect(
                WindowRect {
                    x: options.x.unwrap_or(rect.x),
                    y: options.y.unwrap_or(rect.y),
                    ..rect
                },
                &self.config,
                viewport,
            );
        }

        let maximized = options.maximized || self.config.is_narrow(viewport);
        let (rect, pre_restore) = if maximized {
            (geometry::maximized_rect(&self.config, viewport), Some(rect))
        } else {
            (rect, None)
        };

        self.windows.push(WindowRecord {
            id: id.clone(),
            kind,
            content_key,
            title: options
                .title
                .unwrap_or_else(|| descriptor.default_title.to_string()),
            rect,
            pre_restore,
            z_index: 0,
            is_focused: false,
            minimized: false,
            maximized,
            route: None,
            closing: None,
        });
        self.bring_to_front(&id);
        WindowHandle { id, created: true }
    }

    /// Like [`Self::open_window`] with a string type tag; unknown tags open nothing.
    pub fn open_window_by_tag(
        &mut self,
        tag: &str,
        options: OpenWindowOptions,
        viewport: WindowRect,
    ) -> Option<WindowHandle> {
        let kind = WindowKind::from_tag(tag)?;
        Some(self.open_window(kind, options, viewport))
    }

    /// Starts the exit transition; the window stays rendered until [`Self::finalize_close`].
    pub fn close_window(&mut self, window_id: &WindowId, tab: Option<Tab>) -> Option<PendingClose> {
        let token = self.next_close_token;
        let window = self
            .windows
            .iter_mut()
            .find(|w| &w.id == window_id && w.is_live())?;
        self.next_close_token += 1;
        window.closing = Some(ClosingState { token, tab });
        let was_focused = std::mem::take(&mut window.is_focused);
        if was_focused {
            self.focus_fallback(None);
        }
        Some(PendingClose {
            window_id: window_id.clone(),
            token,
        })
    }

    /// Removes a closing window if `token` still matches and records it in history.
    pub fn finalize_close(&mut self, window_id: &WindowId, token: u64) -> Option<HistoryEntry> {
        let index = self.windows.iter().position(|w| {
            &w.id == window_id && w.closing.as_ref().map(|c| c.token) == Some(token)
        })?;
        let window = self.windows.remove(index);
        let entry = HistoryEntry {
            window: window.layout_record(),
            tab: window.closing.and_then(|closing| closing.tab),
        };
        self.history.push(entry.clone());
        Some(entry)
    }

    /// Merges a partial patch. Returns `true` when the window changed.
    pub fn update_window(
        &mut self,
        window_id: &WindowId,
        patch: WindowPatch,
        viewport: WindowRect,
    ) -> bool {
        let config = self.config.clone();
        let Some(window) = self.live_mut(window_id) else {
            return false;
        };
        let before = window.clone();

        if let Some(title) = patch.title.clone() {
            window.title = title;
        }
        if patch.has_geometry() {
            let base = if window.maximized {
                window.pre_restore.unwrap_or(window.rect)
            } else {
                window.rect
            };
            let patched = geometry::fit_rect(
                WindowRect {
                    x: patch.x.unwrap_or(base.x),
                    y: patch.y.unwrap_or(base.y),
                    w: patch.width.unwrap_or(base.w),
                    h: patch.height.unwrap_or(base.h),
                },
                &config,
                viewport,
            );
            if window.maximized {
                window.pre_restore = Some(patched);
            } else {
                window.rect = patched;
            }
        }

        match patch.maximized {
            Some(true) => {
                self.maximize(window_id, viewport);
            }
            Some(false) => {
                self.restore_from_maximized(window_id, viewport);
            }
            None => {}
        }
        match patch.minimized {
            Some(true) => {
                self.minimize(window_id);
            }
            Some(false) => {
                self.unminimize(window_id);
            }
            None => {}
        }

        self.get(window_id) != Some(&before)
    }

    /// Focuses `window_id`, un-minimizing it, and gives it the top z-index.
    pub fn bring_to_front(&mut self, window_id: &WindowId) -> bool {
        if self.get_live(window_id).is_none() {
            return false;
        }
        for window in &mut self.windows {
            let target = &window.id == window_id;
            window.is_focused = target;
            if target {
                window.minimized = false;
            }
        }
        self.stacking.raise(&mut self.windows, window_id)
    }

    pub fn minimize(&mut self, window_id: &WindowId) -> bool {
        let Some(window) = self.live_mut(window_id) else {
            return false;
        };
        if window.minimized {
            return false;
        }
        window.minimized = true;
        if std::mem::take(&mut window.is_focused) {
            self.focus_fallback(Some(window_id));
        }
        true
    }

    pub fn maximize(&mut self, window_id: &WindowId, viewport: WindowRect) -> bool {
        let maximized = geometry::maximized_rect(&self.config, viewport);
        let Some(window) = self.live_mut(window_id) else {
            return false;
        };
        if !window.maximized {
            window.pre_restore = Some(window.rect);
            window.maximized = true;
        }
        window.rect = maximized;
        self.bring_to_front(window_id)
    }

    /// Un-minimizes a minimized window, otherwise leaves the maximized state.
    pub fn restore(&mut self, window_id: &WindowId, viewport: WindowRect) -> bool {
        match self.get_live(window_id) {
            Some(window) if window.minimized => self.unminimize(window_id),
            Some(window) if window.maximized => {
                self.restore_from_maximized(window_id, viewport);
                self.bring_to_front(window_id)
            }
            Some(_) => self.bring_to_front(window_id),
            None => false,
        }
    }

    pub fn toggle_maximize(&mut self, window_id: &WindowId, viewport: WindowRect) -> bool {
        match self.get_live(window_id).map(|w| w.maximized) {
            Some(true) => self.restore(window_id, viewport),
            Some(false) => self.maximize(window_id, viewport),
            None => false,
        }
    }

    /// Places the window on the left or right half of the usable area.
    pub fn snap(&mut self, window_id: &WindowId, side: SnapSide, viewport: WindowRect) -> bool {
        let rect = geometry::snap_rect(side, &self.config, viewport);
        let Some(window) = self.live_mut(window_id) else {
            return false;
        };
        if window.minimized {
            return false;
        }
        window.maximized = false;
        window.pre_restore = None;
        window.rect = rect;
        self.bring_to_front(window_id)
    }

    pub fn set_title(&mut self, window_id: &WindowId, title: &str) -> bool {
        match self.live_mut(window_id) {
            Some(window) if window.title != title => {
                window.title = title.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn set_route(&mut self, window_id: &WindowId, route: Option<String>) {
        if let Some(window) = self.live_mut(window_id) {
            window.route = route;
        }
    }

    /// Commits interaction geometry as-is. Callers clamp first.
    pub(crate) fn commit_rect(&mut self, window_id: &WindowId, rect: WindowRect) -> bool {
        match self.live_mut(window_id) {
            Some(window) if window.rect != rect => {
                window.rect = rect;
                true
            }
            _ => false,
        }
    }

    /// Re-creates a window from a history snapshot, or focuses the live window it matches.
    ///
    /// The entry leaves history either way. Snapshots of unknown kinds are dropped.
    pub fn reopen(&mut self, entry: HistoryEntry, viewport: WindowRect) -> Option<WindowHandle> {
        self.history.take(&entry.window.id);
        let record = entry.window;
        let kind = WindowKind::from_tag(&record.kind)?;
        let geometry = match (record.is_maximized, record.pre_restore) {
            (true, Some(pre_restore)) => pre_restore,
            _ => WindowRect::new(record.x, record.y, record.width, record.height),
        };
        let id_free = self.get(&WindowId(record.id.clone())).is_none();
        let handle = self.open_window(
            kind,
            OpenWindowOptions {
                id: id_free.then(|| record.id.clone()),
                title: Some(record.title).filter(|t| !t.is_empty()),
                content_key: record.content_key,
                x: Some(geometry.x),
                y: Some(geometry.y),
                width: Some(geometry.w),
                height: Some(geometry.h),
                maximized: record.is_maximized,
            },
            viewport,
        );
        if handle.created {
            self.set_route(&handle.id, record.route);
        }
        Some(handle)
    }

    /// Re-opens the most recently closed window.
    pub fn reopen_latest(&mut self, viewport: WindowRect) -> Option<(WindowHandle, Option<Tab>)> {
        loop {
            let entry = self.history.latest()?.clone();
            let tab = entry.tab.clone();
            if let Some(handle) = self.reopen(entry, viewport) {
                return Some((handle, tab));
            }
        }
    }

    /// Persistable records of live windows in insertion order.
    pub fn layout_records(&self) -> Vec<WindowLayoutRecord> {
        self.live_windows().map(WindowRecord::layout_record).collect()
    }

    /// Replaces all windows with persisted records.
    ///
    /// Unknown kinds, duplicate ids, and duplicate singleton/keyed windows are skipped; at most
    /// `max_restore_windows` of the top-most records survive. Geometry is re-clamped to
    /// `viewport`, stacking order is kept, and the top-most visible window takes focus.
    pub fn hydrate(&mut self, records: Vec<WindowLayoutRecord>, viewport: WindowRect) {
        self.remove_all();

        let mut restored: Vec<WindowRecord> = Vec::new();
        for record in records {
            let Some(kind) = WindowKind::from_tag(&record.kind) else {
                logging::warn!(
                    "skipping persisted window `{}` with unknown type `{}`",
                    record.id,
                    record.kind
                );
                continue;
            };
            let content_key = record.content_key.filter(|key| !key.is_empty());
            let duplicate = restored.iter().any(|w| {
                w.id.0 == record.id
                    || (w.kind == kind
                        && (is_singleton(kind) || w.content_key == content_key))
            });
            if record.id.is_empty() || duplicate {
                continue;
            }

            let stored = WindowRect::new(record.x, record.y, record.width, record.height);
            let (rect, pre_restore) = if record.is_maximized {
                let restore_to = record.pre_restore.unwrap_or(stored);
                (
                    geometry::maximized_rect(&self.config, viewport),
                    Some(geometry::fit_rect(restore_to, &self.config, viewport)),
                )
            } else {
                (geometry::fit_rect(stored, &self.config, viewport), None)
            };
            let title = if record.title.is_empty() {
                descriptor(kind).default_title.to_string()
            } else {
                record.title
            };

            restored.push(WindowRecord {
                id: WindowId(record.id),
                kind,
                content_key,
                title,
                rect,
                pre_restore,
                z_index: record.z_index,
                is_focused: false,
                minimized: record.is_minimized,
                maximized: record.is_maximized,
                route: record.route,
                closing: None,
            });
        }

        let limit = self.config.max_restore_windows;
        if restored.len() > limit {
            let mut by_z: Vec<(u32, usize)> = restored
                .iter()
                .enumerate()
                .map(|(i, w)| (w.z_index, i))
                .collect();
            by_z.sort();
            let dropped: Vec<usize> = by_z[..restored.len() - limit]
                .iter()
                .map(|&(_, i)| i)
                .collect();
            let mut index = 0;
            restored.retain(|_| {
                let keep = !dropped.contains(&index);
                index += 1;
                keep
            });
        }

        self.windows = restored;
        self.stacking.rebase(&mut self.windows);
        self.focus_fallback(None);
    }

    /// Removes every window immediately; pending close timers are reported as cancelled.
    pub fn remove_all(&mut self) {
        for window in self.windows.drain(..) {
            if let Some(closing) = window.closing {
                self.cancelled_tokens.push(closing.token);
            }
        }
        self.stacking.rebase(&mut self.windows);
    }

    /// Re-clamps every window after a viewport change. Returns `true` when geometry moved.
    pub fn fit_to_viewport(&mut self, viewport: WindowRect) -> bool {
        let config = self.config.clone();
        let mut changed = false;
        for window in &mut self.windows {
            let rect = if window.maximized {
                geometry::maximized_rect(&config, viewport)
            } else {
                geometry::fit_rect(window.rect, &config, viewport)
            };
            if rect != window.rect {
                window.rect = rect;
                changed = true;
            }
        }
        changed
    }

    fn live_mut(&mut self, window_id: &WindowId) -> Option<&mut WindowRecord> {
        self.windows
            .iter_mut()
            .find(|w| &w.id == window_id && w.is_live())
    }

    fn unminimize(&mut self, window_id: &WindowId) -> bool {
        self.bring_to_front(window_id)
    }

    fn restore_from_maximized(&mut self, window_id: &WindowId, viewport: WindowRect) {
        let config = self.config.clone();
        if let Some(window) = self.live_mut(window_id) {
            if window.maximized {
                let restore_to = window.pre_restore.take().unwrap_or(window.rect);
                window.rect = geometry::fit_rect(restore_to, &config, viewport);
                window.maximized = false;
            }
        }
    }

    /// Focuses the highest visible window when nothing else holds focus.
    fn focus_fallback(&mut self, skip: Option<&WindowId>) {
        if self.windows.iter().any(|w| w.is_focused) {
            return;
        }
        if let Some(next) = focus_fallback(&self.windows, skip) {
            if let Some(window) = self.windows.iter_mut().find(|w| w.id == next) {
                window.is_focused = true;
            }
        }
    }

    /// Removes a closing window ahead of its timer, recording it like a normal finalize.
    fn drop_closing(&mut self, window_id: &WindowId) {
        let token = self
            .get(window_id)
            .and_then(|w| w.closing.as_ref())
            .map(|c| c.token);
        if let Some(token) = token {
            self.finalize_close(window_id, token);
            self.cancelled_tokens.push(token);
        }
    }

    fn allocate_id(&mut self, kind: WindowKind) -> WindowId {
        loop {
            let id = WindowId(format!("{}-{}", kind.as_str(), self.next_window_seq));
            self.next_window_seq += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VIEWPORT: WindowRect = WindowRect::new(0, 0, 1280, 800);

    fn registry() -> WindowRegistry {
        WindowRegistry::default()
    }

    fn open(registry: &mut WindowRegistry, kind: WindowKind, key: Option<&str>) -> WindowId {
        let options = OpenWindowOptions {
            content_key: key.map(str::to_owned),
            ..OpenWindowOptions::default()
        };
        registry.open_window(kind, options, VIEWPORT).id
    }

    fn focused_id(registry: &WindowRegistry) -> Option<WindowId> {
        registry.focused().map(|w| w.id.clone())
    }

    #[test]
    fn singleton_open_twice_focuses_existing() {
        let mut registry = registry();
        let home = open(&mut registry, WindowKind::Home, None);
        let explore = open(&mut registry, WindowKind::Explore, None);
        assert_eq!(focused_id(&registry), Some(explore));

        let handle = registry.open_window(WindowKind::Home, OpenWindowOptions::default(), VIEWPORT);
        assert_eq!(
            handle,
            WindowHandle {
                id: home.clone(),
                created: false
            }
        );
        assert_eq!(registry.live_windows().count(), 2);
        assert_eq!(focused_id(&registry), Some(home));
    }

    #[test]
    fn keyed_windows_are_unique_per_content_key() {
        let mut registry = registry();
        let first = open(&mut registry, WindowKind::Post, Some("42"));
        let other = open(&mut registry, WindowKind::Post, Some("7"));
        let again = open(&mut registry, WindowKind::Post, Some("42"));
        assert_ne!(first, other);
        assert_eq!(first, again);
        assert_eq!(registry.live_windows().count(), 2);
    }

    #[test]
    fn new_window_is_centered_with_default_size() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Home, None);
        let window = registry.get(&id).expect("window");
        assert_eq!(window.rect, WindowRect::new(240, 100, 800, 600));
        assert_eq!(window.title, "Home");
        assert!(window.is_focused);
        assert_eq!(window.z_index, 10);
    }

    #[test]
    fn narrow_viewport_forces_maximized() {
        let mut registry = registry();
        let phone = WindowRect::new(0, 0, 390, 700);
        let handle = registry.open_window(WindowKind::Home, OpenWindowOptions::default(), phone);
        let window = registry.get(&handle.id).expect("window");
        assert!(window.maximized);
        assert_eq!(window.rect, WindowRect::new(8, 8, 374, 684));
        assert!(window.pre_restore.is_some());
    }

    #[test]
    fn explicit_options_are_clamped() {
        let mut registry = registry();
        let handle = registry.open_window(
            WindowKind::About,
            OpenWindowOptions {
                id: Some("about-main".to_string()),
                title: Some("About us".to_string()),
                x: Some(-100),
                y: Some(50),
                width: Some(100),
                height: Some(5000),
                ..OpenWindowOptions::default()
            },
            VIEWPORT,
        );
        let window = registry.get(&handle.id).expect("window");
        assert_eq!(window.id, WindowId::from("about-main"));
        assert_eq!(window.title, "About us");
        assert_eq!(window.rect, WindowRect::new(8, 8, 400, 784));
    }

    #[test]
    fn open_by_unknown_tag_creates_nothing() {
        let mut registry = registry();
        assert_eq!(
            registry.open_window_by_tag("calculator", OpenWindowOptions::default(), VIEWPORT),
            None
        );
        assert!(registry.windows().is_empty());
        assert!(registry
            .open_window_by_tag("search", OpenWindowOptions::default(), VIEWPORT)
            .is_some());
    }

    #[test]
    fn close_is_idempotent_and_finalize_checks_token() {
        let mut registry = registry();
        let home = open(&mut registry, WindowKind::Home, None);
        let explore = open(&mut registry, WindowKind::Explore, None);

        let pending = registry.close_window(&explore, None).expect("pending");
        assert_eq!(registry.close_window(&explore, None), None);
        assert_eq!(registry.close_window(&WindowId::from("ghost"), None), None);
        assert_eq!(focused_id(&registry), Some(home.clone()));

        assert_eq!(registry.finalize_close(&explore, pending.token + 1), None);
        let entry = registry
            .finalize_close(&explore, pending.token)
            .expect("finalized");
        assert_eq!(entry.window.id, "explore-2");
        assert_eq!(registry.finalize_close(&explore, pending.token), None);
        assert_eq!(registry.windows().len(), 1);
        assert_eq!(registry.history().len(), 1);
    }

    #[test]
    fn closing_window_does_not_block_new_singleton() {
        let mut registry = registry();
        let home = open(&mut registry, WindowKind::Home, None);
        registry.close_window(&home, None).expect("pending");

        let reopened = open(&mut registry, WindowKind::Home, None);
        assert_ne!(reopened, home);
        assert_eq!(registry.live_windows().count(), 1);
    }

    #[test]
    fn explicit_id_reuse_drops_closing_window_and_cancels_timer() {
        let mut registry = registry();
        let options = OpenWindowOptions {
            id: Some("search-main".to_string()),
            ..OpenWindowOptions::default()
        };
        let first = registry.open_window(WindowKind::Search, options.clone(), VIEWPORT);
        let pending = registry.close_window(&first.id, None).expect("pending");

        let second = registry.open_window(WindowKind::Search, options, VIEWPORT);
        assert!(second.created);
        assert_eq!(second.id, first.id);
        assert_eq!(registry.windows().len(), 1);
        assert_eq!(registry.take_cancelled_tokens(), vec![pending.token]);
        assert_eq!(registry.finalize_close(&first.id, pending.token), None);
    }

    #[test]
    fn explicit_id_of_another_kind_opens_a_separate_window() {
        let mut registry = registry();
        let options = OpenWindowOptions {
            id: Some("main".to_string()),
            ..OpenWindowOptions::default()
        };
        let search = registry.open_window(WindowKind::Search, options.clone(), VIEWPORT);
        let settings = registry.open_window(WindowKind::Settings, options, VIEWPORT);

        assert!(settings.created);
        assert_ne!(settings.id, search.id);
        assert_eq!(registry.get(&search.id).map(|w| w.kind), Some(WindowKind::Search));
        assert_eq!(registry.get(&settings.id).map(|w| w.kind), Some(WindowKind::Settings));
        assert_eq!(focused_id(&registry), Some(settings.id));
    }

    #[test]
    fn minimize_focused_passes_focus_to_most_recent_other() {
        let mut registry = registry();
        let a = open(&mut registry, WindowKind::Home, None);
        let b = open(&mut registry, WindowKind::Explore, None);
        let c = open(&mut registry, WindowKind::Search, None);
        registry.bring_to_front(&a);

        assert!(registry.minimize(&a));
        assert_eq!(focused_id(&registry), Some(c.clone()));
        assert!(registry.minimize(&c));
        assert_eq!(focused_id(&registry), Some(b.clone()));
        assert!(registry.minimize(&b));
        assert_eq!(focused_id(&registry), None);
    }

    #[test]
    fn maximize_and_restore_round_trip_geometry() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Home, None);
        let before = registry.get(&id).expect("window").rect;

        registry.maximize(&id, VIEWPORT);
        let window = registry.get(&id).expect("window");
        assert_eq!(window.rect, WindowRect::new(8, 8, 1264, 784));
        assert_eq!(window.pre_restore, Some(before));

        registry.minimize(&id);
        assert_eq!(registry.get(&id).expect("window").rect.w, 1264);
        registry.restore(&id, VIEWPORT);
        let window = registry.get(&id).expect("window");
        assert!(!window.minimized && window.maximized && window.is_focused);

        registry.toggle_maximize(&id, VIEWPORT);
        let window = registry.get(&id).expect("window");
        assert!(!window.maximized);
        assert_eq!(window.rect, before);
        assert_eq!(window.pre_restore, None);
    }

    #[test]
    fn update_window_clamps_geometry_and_routes_flags() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Home, None);

        assert!(registry.update_window(
            &id,
            WindowPatch {
                width: Some(10),
                height: Some(-40),
                x: Some(5000),
                ..WindowPatch::default()
            },
            VIEWPORT,
        ));
        let window = registry.get(&id).expect("window");
        assert_eq!(window.rect, WindowRect::new(872, 100, 400, 300));

        registry.update_window(
            &id,
            WindowPatch {
                maximized: Some(true),
                ..WindowPatch::default()
            },
            VIEWPORT,
        );
        registry.update_window(
            &id,
            WindowPatch {
                x: Some(20),
                ..WindowPatch::default()
            },
            VIEWPORT,
        );
        let window = registry.get(&id).expect("window");
        assert!(window.maximized);
        assert_eq!(window.pre_restore.map(|r| r.x), Some(20));

        assert!(!registry.update_window(
            &WindowId::from("ghost"),
            WindowPatch::default(),
            VIEWPORT
        ));
    }

    #[test]
    fn reopen_restores_snapshot_with_same_id() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Post, Some("42"));
        registry.set_route(&id, Some("/post?id=42".to_string()));
        registry.update_window(
            &id,
            WindowPatch {
                x: Some(30),
                y: Some(40),
                ..WindowPatch::default()
            },
            VIEWPORT,
        );
        let pending = registry.close_window(&id, None).expect("pending");
        registry.finalize_close(&id, pending.token);

        let (handle, tab) = registry.reopen_latest(VIEWPORT).expect("reopened");
        assert_eq!(tab, None);
        assert_eq!(handle, WindowHandle { id: id.clone(), created: true });
        let window = registry.get(&id).expect("window");
        assert_eq!((window.rect.x, window.rect.y), (30, 40));
        assert_eq!(window.content_key.as_deref(), Some("42"));
        assert_eq!(window.route.as_deref(), Some("/post?id=42"));
        assert!(registry.history().is_empty());
        assert_eq!(registry.reopen_latest(VIEWPORT), None);
    }

    #[test]
    fn hydrate_skips_invalid_records_and_keeps_stacking_order() {
        let mut registry = registry();
        let record = |id: &str, kind: &str, key: Option<&str>, z: u32| WindowLayoutRecord {
            id: id.to_string(),
            kind: kind.to_string(),
            content_key: key.map(str::to_owned),
            title: String::new(),
            x: 20,
            y: 20,
            width: 100,
            height: 100,
            is_maximized: false,
            is_minimized: false,
            z_index: z,
            pre_restore: None,
            route: None,
        };

        registry.hydrate(
            vec![
                record("a", "home", None, 50),
                record("b", "terminal", None, 60),
                record("c", "post", Some("1"), 70),
                record("a", "explore", None, 80),
                record("d", "home", None, 90),
                record("e", "post", Some("1"), 95),
                record("f", "post", Some("2"), 40),
            ],
            VIEWPORT,
        );

        let ids: Vec<&str> = registry.windows().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "f"]);
        let z: Vec<u32> = registry.windows().iter().map(|w| w.z_index).collect();
        assert_eq!(z, vec![11, 12, 10]);
        assert_eq!(focused_id(&registry), Some(WindowId::from("c")));
        let window = registry.get(&WindowId::from("a")).expect("a");
        assert_eq!(window.rect, WindowRect::new(20, 20, 400, 300));
        assert_eq!(window.title, "Home");
    }

    #[test]
    fn hydrate_caps_to_top_most_records() {
        let mut registry = WindowRegistry::new(WindowManagerConfig {
            max_restore_windows: 2,
            ..WindowManagerConfig::default()
        });
        let records = (0..4)
            .map(|i| WindowLayoutRecord {
                id: format!("p{i}"),
                kind: "post".to_string(),
                content_key: Some(i.to_string()),
                title: "Post".to_string(),
                x: 0,
                y: 0,
                width: 500,
                height: 400,
                is_maximized: false,
                is_minimized: false,
                z_index: [30, 10, 40, 20][i],
                pre_restore: None,
                route: None,
            })
            .collect();

        registry.hydrate(records, VIEWPORT);
        let ids: Vec<&str> = registry.windows().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p2"]);
    }

    #[test]
    fn hydrate_cancels_pending_close_timers() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Home, None);
        let pending = registry.close_window(&id, None).expect("pending");

        registry.hydrate(Vec::new(), VIEWPORT);
        assert!(registry.windows().is_empty());
        assert_eq!(registry.take_cancelled_tokens(), vec![pending.token]);
        assert!(registry.take_cancelled_tokens().is_empty());
    }

    #[test]
    fn snap_places_window_on_half_and_clears_maximized() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Home, None);
        registry.maximize(&id, VIEWPORT);
        registry.snap(&id, SnapSide::Right, VIEWPORT);
        let window = registry.get(&id).expect("window");
        assert_eq!(window.rect, WindowRect::new(640, 8, 632, 784));
        assert!(!window.maximized);
    }

    #[test]
    fn viewport_shrink_pulls_windows_inside() {
        let mut registry = registry();
        let id = open(&mut registry, WindowKind::Home, None);
        assert!(registry.fit_to_viewport(WindowRect::new(0, 0, 900, 700)));
        let window = registry.get(&id).expect("window");
        assert_eq!(window.rect, WindowRect::new(92, 92, 800, 600));
    }
}
