use std::time::Duration;

use leptos::{logging, set_timeout_with_handle, spawn_local, SignalGetUntracked};

use crate::{host::DesktopHostContext, runtime_context::DesktopRuntimeContext};

/// Restarts the layout save debounce; the save reads state when the timer fires.
pub(super) fn schedule_persist(host: &DesktopHostContext, runtime: DesktopRuntimeContext) {
    cancel_pending(host);

    let delay_ms = runtime.state.get_untracked().config().persist_debounce_ms;
    let save_host = host.clone();
    let save = move || {
        save_host.persist_timer.borrow_mut().take();
        persist_now(&save_host, runtime);
    };

    match set_timeout_with_handle(save, Duration::from_millis(u64::from(delay_ms))) {
        Ok(handle) => *host.persist_timer.borrow_mut() = Some(handle),
        Err(err) => {
            logging::warn!("layout save debounce failed: {err:?}");
            persist_now(host, runtime);
        }
    }
}

pub(super) fn cancel_pending(host: &DesktopHostContext) {
    if let Some(handle) = host.persist_timer.borrow_mut().take() {
        handle.clear();
    }
}

fn persist_now(host: &DesktopHostContext, runtime: DesktopRuntimeContext) {
    let records = runtime.state.get_untracked().registry.layout_records();
    let persistence = host.persistence().clone();
    spawn_local(async move {
        persistence.save(&records).await;
    });
}
