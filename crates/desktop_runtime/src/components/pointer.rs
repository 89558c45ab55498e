//! Window-level pointer listeners that exist only while a move/resize session is active.

use std::{cell::RefCell, rc::Rc};

use leptos::{leptos_dom::helpers::WindowListenerHandle, *};

use super::pointer_from_pointer_event;
use crate::{reducer::DesktopAction, runtime_context::DesktopRuntimeContext};

type ListenerSlots = Rc<RefCell<Vec<WindowListenerHandle>>>;

pub(super) fn install_pointer_session_listeners(runtime: DesktopRuntimeContext) {
    let listeners: ListenerSlots = Rc::default();

    create_effect({
        let listeners = listeners.clone();
        move |_| {
            let active = runtime.interaction.with(|interaction| interaction.is_active());
            if !active {
                remove_all(&listeners);
                return;
            }
            if !listeners.borrow().is_empty() {
                return;
            }

            let on_move = window_event_listener(ev::pointermove, move |ev| {
                runtime.dispatch_action(DesktopAction::PointerMove {
                    pointer_id: ev.pointer_id(),
                    pointer: pointer_from_pointer_event(&ev),
                });
            });
            // A cancelled pointer commits like a release.
            let on_up = window_event_listener(ev::pointerup, move |ev| end_session(runtime, &ev));
            let on_cancel =
                window_event_listener(ev::pointercancel, move |ev| end_session(runtime, &ev));
            listeners.borrow_mut().extend([on_move, on_up, on_cancel]);
        }
    });

    on_cleanup(move || remove_all(&listeners));
}

fn end_session(runtime: DesktopRuntimeContext, ev: &web_sys::PointerEvent) {
    runtime.dispatch_action(DesktopAction::PointerUp {
        pointer_id: ev.pointer_id(),
        pointer: pointer_from_pointer_event(ev),
    });
}

fn remove_all(listeners: &ListenerSlots) {
    for handle in listeners.borrow_mut().drain(..) {
        handle.remove();
    }
}
