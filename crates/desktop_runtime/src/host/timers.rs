use std::time::Duration;

use leptos::{logging, set_timeout_with_handle};

use crate::{
    host::DesktopHostContext, model::WindowId, reducer::DesktopAction,
    runtime_context::DesktopRuntimeContext,
};

/// Finalizes the close transition for `token` after `delay_ms`.
///
/// If the browser refuses the timer the window is finalized immediately so it cannot linger in
/// the closing state.
pub(super) fn schedule_close(
    host: &DesktopHostContext,
    runtime: DesktopRuntimeContext,
    window_id: WindowId,
    token: u64,
    delay_ms: u32,
) {
    let timers = host.close_timers.clone();
    let finalize = {
        let window_id = window_id.clone();
        move || {
            timers.borrow_mut().remove(&token);
            runtime.dispatch_action(DesktopAction::FinalizeClose { window_id, token });
        }
    };

    match set_timeout_with_handle(finalize, Duration::from_millis(u64::from(delay_ms))) {
        Ok(handle) => {
            if let Some(previous) = host.close_timers.borrow_mut().insert(token, handle) {
                previous.clear();
            }
        }
        Err(err) => {
            logging::warn!("close timer for window {window_id} failed: {err:?}");
            runtime.dispatch_action(DesktopAction::FinalizeClose { window_id, token });
        }
    }
}

pub(super) fn cancel_close(host: &DesktopHostContext, token: u64) {
    if let Some(handle) = host.close_timers.borrow_mut().remove(&token) {
        handle.clear();
    }
}

pub(super) fn cancel_all(host: &DesktopHostContext) {
    for (_, handle) in host.close_timers.borrow_mut().drain() {
        handle.clear();
    }
}
