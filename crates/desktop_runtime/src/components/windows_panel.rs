//! Open-windows panel: switch between windows, reopen the last closed one, or clear the desktop.

use super::*;
use crate::{
    model::{WindowId, WindowRecord},
    registry::WindowRegistry,
    tabs::ClosedHistory,
};

#[component]
pub(super) fn DesktopWindowsPanel() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let open_windows =
        create_memo(move |_| state.with(|desktop| ordered_open_windows(&desktop.registry)));
    let reopen_label =
        create_memo(move |_| state.with(|desktop| reopen_label(desktop.registry.history())));

    view! {
        <aside class="desktop-windows-panel" aria-label="Open windows">
            <ul class="desktop-windows-list" role="list">
                <For
                    each=move || open_windows.get()
                    key=|win| (win.id.0.clone(), win.title.clone(), win.is_focused, win.minimized)
                    let:win
                >
                    <DesktopWindowsPanelEntry win />
                </For>
            </ul>
            <Show when=move || open_windows.with(Vec::is_empty) fallback=|| ()>
                <p class="desktop-windows-empty">"No open windows"</p>
            </Show>
            <div class="desktop-windows-actions">
                <button
                    class="desktop-windows-reopen"
                    disabled=move || reopen_label.with(Option::is_none)
                    title=move || reopen_label.get().unwrap_or_default()
                    on:click=move |_| runtime.dispatch_action(DesktopAction::ReopenClosed)
                >
                    "Reopen closed"
                </button>
                <button
                    class="desktop-windows-close-all"
                    disabled=move || open_windows.with(Vec::is_empty)
                    on:click=move |_| runtime.dispatch_action(DesktopAction::CloseAllWindows)
                >
                    "Close all windows"
                </button>
            </div>
        </aside>
    }
}

#[component]
fn DesktopWindowsPanelEntry(win: WindowRecord) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let activate = activation_action(&win);
    let close_id = win.id.clone();

    view! {
        <li class=entry_class(&win)>
            <button
                class="desktop-windows-entry"
                aria-pressed=(win.is_focused && !win.minimized).to_string()
                aria-label=entry_label(&win)
                on:click=move |_| runtime.dispatch_action(activate.clone())
            >
                {display_title(&win)}
            </button>
            <button
                class="desktop-windows-entry-close"
                aria-label="Close window"
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    runtime.dispatch_action(DesktopAction::CloseWindow {
                        window_id: close_id.clone(),
                    });
                }
            >
                "×"
            </button>
        </li>
    }
}

/// Live windows, bottom of the stack first.
fn ordered_open_windows(registry: &WindowRegistry) -> Vec<WindowRecord> {
    let mut windows: Vec<_> = registry.live_windows().cloned().collect();
    windows.sort_by(|a, b| (a.z_index, &a.id.0).cmp(&(b.z_index, &b.id.0)));
    windows
}

/// Minimized windows are restored; anything else is brought to the front.
fn activation_action(win: &WindowRecord) -> DesktopAction {
    let window_id: WindowId = win.id.clone();
    if win.minimized {
        DesktopAction::RestoreWindow { window_id }
    } else {
        DesktopAction::FocusWindow { window_id }
    }
}

fn display_title(win: &WindowRecord) -> String {
    if win.title.trim().is_empty() {
        "Untitled".to_string()
    } else {
        win.title.clone()
    }
}

fn entry_label(win: &WindowRecord) -> String {
    let mut parts = vec![display_title(win)];
    if win.is_focused && !win.minimized {
        parts.push("focused".to_string());
    }
    if win.minimized {
        parts.push("minimized".to_string());
    }
    if win.maximized {
        parts.push("maximized".to_string());
    }
    parts.join(", ")
}

fn entry_class(win: &WindowRecord) -> &'static str {
    match (win.is_focused && !win.minimized, win.minimized) {
        (true, _) => "desktop-windows-item active",
        (false, true) => "desktop-windows-item minimized",
        (false, false) => "desktop-windows-item",
    }
}

fn reopen_label(history: &ClosedHistory) -> Option<String> {
    history
        .latest()
        .map(|entry| format!("Reopen {}", entry.window.title))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        config::WindowManagerConfig,
        model::{OpenWindowOptions, WindowKind, WindowRect},
    };

    const VIEWPORT: WindowRect = WindowRect::new(0, 0, 1280, 800);

    fn registry_with(kinds: &[WindowKind]) -> (WindowRegistry, Vec<WindowId>) {
        let mut registry = WindowRegistry::new(WindowManagerConfig::default());
        let ids = kinds
            .iter()
            .map(|kind| {
                registry
                    .open_window(*kind, OpenWindowOptions::default(), VIEWPORT)
                    .id
            })
            .collect();
        (registry, ids)
    }

    #[test]
    fn minimized_entries_restore_and_others_focus() {
        let (mut registry, ids) = registry_with(&[WindowKind::Home, WindowKind::Explore]);
        registry.minimize(&ids[0]);

        let actions: Vec<_> = ordered_open_windows(&registry)
            .iter()
            .map(|win| (win.id.clone(), activation_action(win)))
            .collect();
        assert!(actions.iter().any(|(id, action)| id == &ids[0]
            && *action
                == DesktopAction::RestoreWindow {
                    window_id: ids[0].clone()
                }));
        assert!(actions.iter().any(|(id, action)| id == &ids[1]
            && *action
                == DesktopAction::FocusWindow {
                    window_id: ids[1].clone()
                }));
    }

    #[test]
    fn list_follows_stacking_order_and_skips_closing_windows() {
        let (mut registry, ids) = registry_with(&[
            WindowKind::Home,
            WindowKind::Explore,
            WindowKind::Search,
        ]);
        registry.bring_to_front(&ids[0]);
        registry.close_window(&ids[1], None);

        let order: Vec<_> = ordered_open_windows(&registry)
            .into_iter()
            .map(|win| win.id)
            .collect();
        assert_eq!(order, vec![ids[2].clone(), ids[0].clone()]);
    }

    #[test]
    fn reopen_is_offered_only_after_a_close_finalizes() {
        let (mut registry, ids) = registry_with(&[WindowKind::Home, WindowKind::Search]);
        assert_eq!(reopen_label(registry.history()), None);

        let pending = registry.close_window(&ids[1], None).expect("pending close");
        assert_eq!(reopen_label(registry.history()), None);

        let title = registry.get(&ids[1]).map(|w| w.title.clone()).expect("closing");
        registry.finalize_close(&ids[1], pending.token);
        assert_eq!(
            reopen_label(registry.history()),
            Some(format!("Reopen {title}"))
        );
    }

    #[test]
    fn entry_label_names_window_state() {
        let (mut registry, ids) = registry_with(&[WindowKind::Home, WindowKind::Explore]);
        registry.minimize(&ids[0]);

        let home = registry.get(&ids[0]).cloned().expect("home");
        let explore = registry.get(&ids[1]).cloned().expect("explore");
        assert_eq!(entry_label(&home), format!("{}, minimized", home.title));
        assert_eq!(entry_label(&explore), format!("{}, focused", explore.title));
        assert_eq!(entry_class(&home), "desktop-windows-item minimized");
        assert_eq!(entry_class(&explore), "desktop-windows-item active");
    }
}
