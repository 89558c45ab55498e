//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use thiserror::Error;

use crate::{
    config::WindowManagerConfig,
    interaction::InteractionState,
    keyboard::{escape_close_target, resolve_key_command, KeyCommand},
    model::{
        KeyChord, OpenWindowOptions, OpenWindowRequest, PointerPosition, ResizeEdge, SnapSide, Tab,
        WindowHandle, WindowId, WindowKind, WindowLayoutRecord, WindowPatch, WindowPhase,
        WindowRecord, WindowRect,
    },
    navigation::{normalize_location, NavigationBridge, RouteTable},
    registry::WindowRegistry,
    tabs::{paths_correlate, TabStrip},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Explicitly owned desktop state: windows, tabs, and the URL bridge.
pub struct DesktopState {
    /// Canonical window collection.
    pub registry: WindowRegistry,
    /// Browser-style tabs mirroring visited locations.
    pub tabs: TabStrip,
    /// Route table and URL loop guard.
    pub navigation: NavigationBridge,
    /// Current desktop viewport in CSS pixels.
    pub viewport: WindowRect,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self::new(WindowManagerConfig::default(), RouteTable::default())
    }
}

impl DesktopState {
    pub fn new(config: WindowManagerConfig, routes: RouteTable) -> Self {
        let config = config.sanitized();
        Self {
            tabs: TabStrip::new(config.fallback_path.clone()),
            registry: WindowRegistry::new(config),
            navigation: NavigationBridge::new(routes),
            viewport: WindowRect::default(),
        }
    }

    pub fn config(&self) -> &WindowManagerConfig {
        self.registry.config()
    }

    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.registry.focused().map(|window| window.id.clone())
    }

    /// Replaces the configuration and re-fits existing windows to it.
    pub fn apply_config(&mut self, config: WindowManagerConfig) {
        let config = config.sanitized();
        self.tabs.set_fallback_path(config.fallback_path.clone());
        self.registry.set_config(config);
        self.registry.fit_to_viewport(self.viewport);
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window, or focus the live window it would duplicate.
    OpenWindow(OpenWindowRequest),
    /// Open a window from a string type tag (host integrations, persisted data).
    OpenWindowByTag {
        /// Window type tag such as `"post"`.
        tag: String,
        /// Open overrides.
        options: OpenWindowOptions,
    },
    /// Start the close transition for a window.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Close timer fired.
    FinalizeClose {
        /// Window whose transition ended.
        window_id: WindowId,
        /// Token issued when the close started.
        token: u64,
    },
    /// Merge a partial geometry/title/flag patch.
    UpdateWindow {
        /// Window to patch.
        window_id: WindowId,
        /// Fields to change.
        patch: WindowPatch,
    },
    /// Rename a window (issued by window content).
    SetWindowTitle {
        /// Window to rename.
        window_id: WindowId,
        /// New title.
        title: String,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Maximize a window to the current viewport.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Restore a minimized or maximized window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize a normal window or restore a maximized one (title-bar double click).
    ToggleMaximize {
        /// Window to toggle.
        window_id: WindowId,
    },
    /// Place a window on one half of the viewport.
    SnapWindow {
        /// Window to snap.
        window_id: WindowId,
        /// Half to occupy.
        side: SnapSide,
    },
    /// Begin dragging a window by its title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// DOM pointer id owning the drag.
        pointer_id: i32,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Begin resizing a window from an edge or corner handle.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// DOM pointer id owning the resize.
        pointer_id: i32,
        /// Pointer position at resize start.
        pointer: PointerPosition,
        /// Edge or corner being dragged.
        edge: ResizeEdge,
    },
    /// Pointer moved while a session may be active.
    PointerMove {
        /// DOM pointer id.
        pointer_id: i32,
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer released or cancelled.
    PointerUp {
        /// DOM pointer id.
        pointer_id: i32,
        /// Final pointer position.
        pointer: PointerPosition,
    },
    /// Browser viewport changed size.
    SetViewport {
        /// New viewport rectangle.
        viewport: WindowRect,
    },
    /// Browser location changed (initial load, link, back/forward).
    RouteChanged {
        /// Raw location: path plus optional query.
        location: String,
    },
    /// Global key press.
    KeyDown(KeyChord),
    /// Replace the window manager configuration.
    ApplyConfig(WindowManagerConfig),
    /// Close a tab and the window correlated with it.
    CloseTab {
        /// Tab to close.
        tab_id: String,
    },
    /// Re-open the most recently closed window.
    ReopenClosed,
    /// Replace all windows with a persisted layout.
    HydrateLayout {
        /// Records loaded from storage.
        records: Vec<WindowLayoutRecord>,
    },
    /// Remove every window immediately.
    CloseAllWindows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the host runtime to execute.
pub enum RuntimeEffect {
    /// Persist the current window layout (debounced by the host).
    PersistLayout,
    /// Start the timer that finalizes a close transition.
    ScheduleClose {
        /// Closing window.
        window_id: WindowId,
        /// Token to hand back in [`DesktopAction::FinalizeClose`].
        token: u64,
        /// Transition length.
        delay_ms: u32,
    },
    /// Drop a pending close timer whose window is already gone.
    CancelCloseTimer {
        /// Token of the timer to cancel.
        token: u64,
    },
    /// Point the browser at a location.
    Navigate(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    /// A string type tag did not name a known window kind.
    #[error("unknown window type `{0}`")]
    UnknownWindowKind(String),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Actions that reference unknown or closing windows are no-ops. Layout persistence is requested
/// whenever the persistable layout changed, except while a pointer session is in flight; the
/// release of that session requests it instead.
///
/// # Errors
///
/// Returns [`ReducerError::UnknownWindowKind`] when a type tag does not name a window kind.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    let layout_before = state.registry.layout_records();
    let viewport = state.viewport;
    let pointer_action = matches!(
        action,
        DesktopAction::BeginMove { .. }
            | DesktopAction::BeginResize { .. }
            | DesktopAction::PointerMove { .. }
            | DesktopAction::PointerUp { .. }
    );
    let session_window_before = session_window(state, interaction);

    match action {
        DesktopAction::OpenWindow(req) => {
            open_window(state, req.kind, req.options);
            follow_focus(state, &mut effects);
        }
        DesktopAction::OpenWindowByTag { tag, options } => {
            let kind =
                WindowKind::from_tag(&tag).ok_or(ReducerError::UnknownWindowKind(tag))?;
            open_window(state, kind, options);
            follow_focus(state, &mut effects);
        }
        DesktopAction::CloseWindow { window_id } => {
            close_window(state, interaction, &window_id, &mut effects);
        }
        DesktopAction::FinalizeClose { window_id, token } => {
            state.registry.finalize_close(&window_id, token);
        }
        DesktopAction::UpdateWindow { window_id, patch } => {
            let title = patch.title.clone();
            if state.registry.update_window(&window_id, patch, viewport) {
                if let Some(title) = title {
                    rename_tab(state, &window_id, &title);
                }
            }
        }
        DesktopAction::SetWindowTitle { window_id, title } => {
            if state.registry.set_title(&window_id, &title) {
                rename_tab(state, &window_id, &title);
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            if state.registry.bring_to_front(&window_id) {
                follow_focus(state, &mut effects);
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            state.registry.minimize(&window_id);
        }
        DesktopAction::MaximizeWindow { window_id } => {
            state.registry.maximize(&window_id, viewport);
        }
        DesktopAction::RestoreWindow { window_id } => {
            if state.registry.restore(&window_id, viewport) {
                follow_focus(state, &mut effects);
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            state.registry.toggle_maximize(&window_id, viewport);
        }
        DesktopAction::SnapWindow { window_id, side } => {
            state.registry.snap(&window_id, side, viewport);
        }
        DesktopAction::BeginMove {
            window_id,
            pointer_id,
            pointer,
        } => {
            interaction.begin_move(&mut state.registry, &window_id, pointer_id, pointer);
            follow_focus(state, &mut effects);
        }
        DesktopAction::BeginResize {
            window_id,
            pointer_id,
            pointer,
            edge,
        } => {
            interaction.begin_resize(&mut state.registry, &window_id, pointer_id, pointer, edge);
            follow_focus(state, &mut effects);
        }
        DesktopAction::PointerMove { pointer_id, pointer } => {
            interaction.pointer_move(&mut state.registry, pointer_id, pointer, viewport);
        }
        DesktopAction::PointerUp { pointer_id, pointer } => {
            if interaction
                .pointer_up(&mut state.registry, pointer_id, pointer, viewport)
                .is_some()
            {
                effects.push(RuntimeEffect::PersistLayout);
            }
        }
        DesktopAction::SetViewport { viewport } => {
            state.viewport = viewport;
            state.registry.fit_to_viewport(viewport);
        }
        DesktopAction::RouteChanged { location } => {
            sync_route(state, &location);
        }
        DesktopAction::KeyDown(chord) => match resolve_key_command(&chord) {
            Some(KeyCommand::OpenSearch) => {
                let handle = open_window(state, WindowKind::Search, OpenWindowOptions::default());
                let path = state
                    .registry
                    .get(&handle.id)
                    .and_then(|window| window.route.clone());
                if let Some(path) = path {
                    let target = state.navigation.force_navigation(&path);
                    effects.push(RuntimeEffect::Navigate(target));
                }
            }
            Some(KeyCommand::CloseTopWindow) if !interaction.is_active() => {
                if let Some(window_id) = escape_close_target(&state.registry) {
                    close_window(state, interaction, &window_id, &mut effects);
                }
            }
            Some(KeyCommand::CloseTopWindow) | None => {}
        },
        DesktopAction::ApplyConfig(config) => {
            state.apply_config(config);
        }
        DesktopAction::CloseTab { tab_id } => {
            if let Some(closed) = state.tabs.close_tab(&tab_id) {
                if let Some(window_id) = window_for_tab(&state.registry, &closed.tab) {
                    schedule_close(state, interaction, &window_id, Some(closed.tab), &mut effects);
                }
                navigate(state, &closed.fallback, &mut effects);
            }
        }
        DesktopAction::ReopenClosed => {
            if let Some((_, tab)) = state.registry.reopen_latest(viewport) {
                if let Some(tab) = tab {
                    state.tabs.restore(tab);
                }
                follow_focus(state, &mut effects);
            }
        }
        DesktopAction::HydrateLayout { records } => {
            interaction.cancel();
            state.registry.hydrate(records, viewport);
            if let Some(location) = state.navigation.current_location().map(str::to_owned) {
                if let Some(matched) = state.navigation.routes().resolve(&location) {
                    let handle = open_window(
                        state,
                        matched.kind,
                        OpenWindowOptions {
                            content_key: matched.content_key,
                            ..OpenWindowOptions::default()
                        },
                    );
                    state.registry.set_route(&handle.id, Some(location));
                }
            }
        }
        DesktopAction::CloseAllWindows => {
            interaction.cancel();
            state.registry.remove_all();
            state.tabs.clear();
            let fallback = state.config().fallback_path.clone();
            navigate(state, &fallback, &mut effects);
        }
    }

    if !pointer_action && session_window(state, interaction) != session_window_before {
        interaction.rebase(&state.registry);
    }
    for token in state.registry.take_cancelled_tokens() {
        effects.push(RuntimeEffect::CancelCloseTimer { token });
    }
    if !interaction.is_active()
        && !effects.contains(&RuntimeEffect::PersistLayout)
        && state.registry.layout_records() != layout_before
    {
        effects.push(RuntimeEffect::PersistLayout);
    }
    Ok(effects)
}

/// Geometry and phase of the window an active pointer session manipulates.
fn session_window(
    state: &DesktopState,
    interaction: &InteractionState,
) -> Option<(WindowRect, WindowPhase)> {
    interaction
        .window_id()
        .and_then(|window_id| state.registry.get(window_id))
        .map(|window| (window.rect, window.phase()))
}

/// Opens (or focuses) a window and gives new windows their canonical route.
fn open_window(state: &mut DesktopState, kind: WindowKind, options: OpenWindowOptions) -> WindowHandle {
    let handle = state.registry.open_window(kind, options, state.viewport);
    if handle.created {
        let content_key = state
            .registry
            .get(&handle.id)
            .and_then(|window| window.content_key.clone());
        let route = state
            .navigation
            .routes()
            .path_for(kind, content_key.as_deref());
        state.registry.set_route(&handle.id, route);
    }
    handle
}

fn close_window(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
    effects: &mut Vec<RuntimeEffect>,
) {
    let Some(window) = state.registry.get_live(window_id).cloned() else {
        return;
    };
    let closed_tab = state.tabs.close_tab_for_window(&window);
    schedule_close(
        state,
        interaction,
        window_id,
        closed_tab.as_ref().map(|closed| closed.tab.clone()),
        effects,
    );
    if let Some(closed) = closed_tab {
        navigate(state, &closed.fallback, effects);
    }
}

fn schedule_close(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
    tab: Option<Tab>,
    effects: &mut Vec<RuntimeEffect>,
) {
    if interaction.window_id() == Some(window_id) {
        interaction.cancel();
    }
    if let Some(pending) = state.registry.close_window(window_id, tab) {
        effects.push(RuntimeEffect::ScheduleClose {
            window_id: pending.window_id,
            token: pending.token,
            delay_ms: state.config().close_delay_ms,
        });
    }
}

/// Activates the tab for `location` and, unless the bridge produced it, brings its window up.
fn sync_route(state: &mut DesktopState, location: &str) {
    let normalized = normalize_location(location);
    let matched = state.navigation.routes().resolve(&normalized);
    let accepted = state.navigation.accept_route_change(&normalized);

    let window_id = match matched.as_ref() {
        Some(matched) if accepted => {
            let handle = open_window(
                state,
                matched.kind,
                OpenWindowOptions {
                    content_key: matched.content_key.clone(),
                    ..OpenWindowOptions::default()
                },
            );
            state
                .registry
                .set_route(&handle.id, Some(normalized.clone()));
            Some(handle.id)
        }
        Some(matched) => state
            .registry
            .find_live(matched.kind, matched.content_key.as_deref())
            .map(|window| window.id.clone()),
        None => None,
    };

    let title = window_id
        .as_ref()
        .and_then(|id| state.registry.get(id))
        .map(|window| window.title.clone())
        .or_else(|| matched.map(|matched| matched.title))
        .unwrap_or_else(|| normalized.clone());
    state
        .tabs
        .activate_path(&normalized, &title, window_id.as_ref());
}

/// Navigates to the focused window's route when the URL follows focus.
fn follow_focus(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>) {
    if !state.config().url_follows_focus {
        return;
    }
    let route = state.registry.focused().and_then(|window| window.route.clone());
    if let Some(route) = route {
        navigate(state, &route, effects);
    }
}

fn navigate(state: &mut DesktopState, path: &str, effects: &mut Vec<RuntimeEffect>) {
    if let Some(target) = state.navigation.navigation_target(path) {
        effects.push(RuntimeEffect::Navigate(target));
    }
}

fn rename_tab(state: &mut DesktopState, window_id: &WindowId, title: &str) {
    if let Some(window) = state.registry.get_live(window_id).cloned() {
        state.tabs.rename_for_window(&window, title);
    }
}

/// Live window correlated with `tab`: by id, then exact route, then path prefix.
fn window_for_tab(registry: &WindowRegistry, tab: &Tab) -> Option<WindowId> {
    let live: Vec<&WindowRecord> = registry.live_windows().collect();
    live.iter()
        .find(|window| window.id.as_str() == tab.id)
        .or_else(|| {
            live.iter()
                .find(|window| window.route.as_deref() == Some(tab.path.as_str()))
        })
        .or_else(|| {
            live.iter().find(|window| {
                window
                    .route
                    .as_deref()
                    .is_some_and(|route| paths_correlate(&tab.path, route))
            })
        })
        .map(|window| window.id.clone())
}
