//! Desktop shell UI composition and interaction surfaces.

mod pointer;
mod window;
mod windows_panel;

use leptos::*;

use self::{
    pointer::install_pointer_session_listeners, window::DesktopWindow,
    windows_panel::DesktopWindowsPanel,
};
use crate::{
    keyboard::{resolve_key_command, KeyCommand},
    model::{KeyChord, PointerPosition, Tab},
    reducer::DesktopAction,
    runtime_context::use_desktop_runtime,
};

pub use crate::runtime_context::{DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the window layer and installs desktop-wide keyboard, resize, and pointer listeners.
pub fn DesktopShell(
    /// Render the tab strip above the window layer.
    #[prop(default = true)]
    show_tabs: bool,
    /// Render the open-windows panel beside the window layer.
    #[prop(default = true)]
    show_windows_panel: bool,
) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    let resize_listener = window_event_listener(ev::resize, move |_| {
        runtime.dispatch_action(DesktopAction::SetViewport {
            viewport: runtime.host.get_value().desktop_viewport_rect(),
        });
    });
    on_cleanup(move || resize_listener.remove());

    let key_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() {
            return;
        }
        let chord = key_chord_from_event(&ev);
        if resolve_key_command(&chord) == Some(KeyCommand::OpenSearch) {
            ev.prevent_default();
        }
        runtime.dispatch_action(DesktopAction::KeyDown(chord));
    });
    on_cleanup(move || key_listener.remove());

    install_pointer_session_listeners(runtime);

    view! {
        <div
            id="desktop-shell-root"
            class="desktop-shell"
            tabindex="-1"
            data-interacting=move || runtime.interaction.with(|i| i.is_active()).to_string()
        >
            <Show when=move || show_tabs fallback=|| ()>
                <DesktopTabStrip />
            </Show>
            <Show when=move || show_windows_panel fallback=|| ()>
                <DesktopWindowsPanel />
            </Show>
            <div class="desktop-window-layer">
                <For
                    each=move || state.with(|desktop| desktop.registry.windows().to_vec())
                    key=|win| win.id.0.clone()
                    let:win
                >
                    <DesktopWindow window_id=win.id />
                </For>
            </div>
        </div>
    }
}

#[component]
fn DesktopTabStrip() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let tabs = create_memo(move |_| runtime.state.with(|desktop| desktop.tabs.tabs().to_vec()));

    view! {
        <nav class="desktop-tabs" role="tablist">
            <For each=move || tabs.get() key=|tab| (tab.id.clone(), tab.is_active, tab.title.clone()) let:tab>
                <DesktopTab tab />
            </For>
        </nav>
    }
}

#[component]
fn DesktopTab(tab: Tab) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let path = tab.path.clone();
    let tab_id = tab.id.clone();
    let class = if tab.is_active {
        "desktop-tab active"
    } else {
        "desktop-tab"
    };

    view! {
        <div class=class role="tab" aria-selected=tab.is_active.to_string()>
            <button class="desktop-tab-label" on:click=move |_| runtime.navigate.call(path.clone())>
                {tab.title.clone()}
            </button>
            <button
                class="desktop-tab-close"
                aria-label="Close tab"
                on:click=move |ev| {
                    stop_mouse_event(&ev);
                    runtime.dispatch_action(DesktopAction::CloseTab { tab_id: tab_id.clone() });
                }
            >
                "×"
            </button>
        </div>
    }
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_pointer_event(ev: &web_sys::PointerEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}

fn key_chord_from_event(ev: &web_sys::KeyboardEvent) -> KeyChord {
    KeyChord {
        key: ev.key(),
        ctrl: ev.ctrl_key(),
        meta: ev.meta_key(),
        alt: ev.alt_key(),
        shift: ev.shift_key(),
    }
}
