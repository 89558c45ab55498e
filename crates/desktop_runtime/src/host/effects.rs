//! Runtime-effect dispatch for the desktop host boundary.

use leptos::Callable;

use crate::{
    host::{persistence_effects, timers, DesktopHostContext},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

pub(super) fn run_runtime_effect(
    host: DesktopHostContext,
    runtime: DesktopRuntimeContext,
    effect: RuntimeEffect,
) {
    match effect {
        RuntimeEffect::PersistLayout => persistence_effects::schedule_persist(&host, runtime),
        RuntimeEffect::ScheduleClose {
            window_id,
            token,
            delay_ms,
        } => timers::schedule_close(&host, runtime, window_id, token, delay_ms),
        RuntimeEffect::CancelCloseTimer { token } => timers::cancel_close(&host, token),
        RuntimeEffect::Navigate(location) => runtime.navigate.call(location),
    }
}
