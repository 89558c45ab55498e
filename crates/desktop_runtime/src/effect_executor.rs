//! Drains the reducer's effect queue into the host.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Runs queued [`crate::reducer::RuntimeEffect`]s in emission order.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        if runtime.effects.with(Vec::is_empty) {
            return;
        }

        // The batch leaves the queue before it runs. A refused close timer dispatches
        // `FinalizeClose` inline and `Navigate` can echo back as `RouteChanged` in the same
        // tick; whatever those append belongs to the next run of this effect.
        let batch = runtime
            .effects
            .try_update(std::mem::take)
            .unwrap_or_default();

        let host = runtime.host.get_value();
        for effect in batch {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
