use leptos::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use super::{pointer_from_pointer_event, stop_mouse_event};
use crate::{
    content::WindowContentContext,
    model::{ResizeEdge, WindowId, WindowPhase, WindowRecord},
    reducer::DesktopAction,
    runtime_context::use_desktop_runtime,
};

#[cfg(target_arch = "wasm32")]
fn try_set_pointer_capture(ev: &web_sys::PointerEvent) {
    if let Some(target) = ev.current_target() {
        if let Ok(element) = target.dyn_into::<web_sys::Element>() {
            let _ = element.set_pointer_capture(ev.pointer_id());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn try_set_pointer_capture(_: &web_sys::PointerEvent) {}

/// Only the primary button of a mouse, or the primary touch/pen contact, starts a session.
fn is_session_pointer(ev: &web_sys::PointerEvent) -> bool {
    if ev.pointer_type() == "mouse" {
        ev.button() == 0
    } else {
        ev.is_primary()
    }
}

fn window_class(win: &WindowRecord) -> String {
    let phase = match win.phase() {
        WindowPhase::Normal => "",
        WindowPhase::Maximized => " maximized",
        WindowPhase::Minimized => " minimized",
        WindowPhase::Closing => " closing",
    };
    let focused = if win.is_focused { " focused" } else { "" };
    format!("desktop-window{phase}{focused}")
}

fn window_style(win: &WindowRecord) -> String {
    format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
        win.rect.x, win.rect.y, win.rect.w, win.rect.h, win.z_index
    )
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);

    let window = create_memo(move |_| {
        runtime
            .state
            .with(|desktop| id.with_value(|id| desktop.registry.get(id).cloned()))
    });

    let dispatch_for = move |build: fn(WindowId) -> DesktopAction| {
        runtime.dispatch_action(build(id.get_value()));
    };

    let focus = move |_: web_sys::PointerEvent| {
        let should_focus = window
            .with(|w| w.as_ref().map(|w| w.is_live() && !w.is_focused))
            .unwrap_or(false);
        if should_focus {
            dispatch_for(|window_id| DesktopAction::FocusWindow { window_id });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !is_session_pointer(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id: id.get_value(),
            pointer_id: ev.pointer_id(),
            pointer: pointer_from_pointer_event(&ev),
        });
    };
    let titlebar_double_click = move |ev: web_sys::MouseEvent| {
        stop_mouse_event(&ev);
        dispatch_for(|window_id| DesktopAction::ToggleMaximize { window_id });
    };

    let is_maximized = move || window.with(|w| w.as_ref().is_some_and(|w| w.maximized));
    let can_resize = move || {
        window.with(|w| {
            w.as_ref()
                .is_some_and(|w| w.is_live() && !w.maximized && !w.minimized)
        })
    };
    let title = move || window.with(|w| w.as_ref().map(|w| w.title.clone()).unwrap_or_default());

    view! {
        <section
            class=move || window.with(|w| w.as_ref().map(window_class).unwrap_or_default())
            style=move || window.with(|w| w.as_ref().map(window_style).unwrap_or_default())
            data-window-id=id.get_value().0
            on:pointerdown=focus
            role="dialog"
            aria-label=title
        >
            <header
                class="titlebar"
                on:pointerdown=begin_move
                on:dblclick=titlebar_double_click
            >
                <div class="titlebar-title">
                    <span>{title}</span>
                </div>
                <div class="titlebar-controls">
                    <TitlebarButton
                        label=Signal::derive(|| "Minimize window")
                        glyph=Signal::derive(|| "–")
                        on_press=Callback::new(move |_| {
                            dispatch_for(|window_id| DesktopAction::MinimizeWindow { window_id })
                        })
                    />
                    <TitlebarButton
                        label=Signal::derive(move || {
                            if is_maximized() { "Restore window" } else { "Maximize window" }
                        })
                        glyph=Signal::derive(move || if is_maximized() { "❐" } else { "□" })
                        on_press=Callback::new(move |_| {
                            dispatch_for(|window_id| DesktopAction::ToggleMaximize { window_id })
                        })
                    />
                    <TitlebarButton
                        label=Signal::derive(|| "Close window")
                        glyph=Signal::derive(|| "×")
                        on_press=Callback::new(move |_| {
                            dispatch_for(|window_id| DesktopAction::CloseWindow { window_id })
                        })
                    />
                </div>
            </header>
            <div class="window-body">
                <WindowBody window_id=id.get_value() />
            </div>
            <Show when=can_resize fallback=|| ()>
                {ResizeEdge::ALL
                    .into_iter()
                    .map(|edge| view! { <WindowResizeHandle window_id=id.get_value() edge /> })
                    .collect_view()}
            </Show>
        </section>
    }
}

#[component]
fn TitlebarButton(
    label: Signal<&'static str>,
    glyph: Signal<&'static str>,
    on_press: Callback<()>,
) -> impl IntoView {
    view! {
        <button
            class="titlebar-button"
            aria-label=label
            on:pointerdown=move |ev: web_sys::PointerEvent| ev.stop_propagation()
            on:dblclick=move |ev| stop_mouse_event(&ev)
            on:click=move |ev| {
                stop_mouse_event(&ev);
                on_press.call(());
            }
        >
            {glyph}
        </button>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let id = store_value(window_id);
    let class_name = format!("window-resize-handle edge-{}", edge.css_suffix());

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !is_session_pointer(&ev) {
            return;
        }
        try_set_pointer_capture(&ev);
        ev.prevent_default();
        ev.stop_propagation();
        runtime.dispatch_action(DesktopAction::BeginResize {
            window_id: id.get_value(),
            pointer_id: ev.pointer_id(),
            pointer: pointer_from_pointer_event(&ev),
            edge,
        });
    };

    view! { <div class=class_name aria-hidden="true" on:pointerdown=on_pointerdown /> }
}

/// Mounts the window content once; later title or geometry changes do not remount it.
#[component]
fn WindowBody(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let record = runtime
        .state
        .with_untracked(|desktop| desktop.registry.get(&window_id).cloned());

    let contents = match record {
        Some(win) => {
            let title_target = window_id.clone();
            let set_title = Callback::new(move |title: String| {
                runtime.dispatch_action(DesktopAction::SetWindowTitle {
                    window_id: title_target.clone(),
                    title,
                });
            });
            let ctx = WindowContentContext {
                window_id,
                kind: win.kind,
                content_key: win.content_key,
                route: win.route,
                set_title,
            };
            runtime.content.with_value(|content| content.render(ctx))
        }
        None => view! { <p>"Closed"</p> }.into_view(),
    };

    view! { <div class="window-body-content">{contents}</div> }
}
