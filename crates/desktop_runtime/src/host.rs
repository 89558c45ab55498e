//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! Reducer semantics stay pure; timers, storage, and viewport queries live behind
//! [`DesktopHostContext`], which is built from injected [`HostServices`].

mod boot;
mod effects;
mod persistence_effects;
mod timers;
mod viewport;

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use leptos::{leptos_dom::helpers::TimeoutHandle, Callback};
use platform_host::HostServices;

use crate::{
    model::WindowRect,
    persistence::LayoutPersistence,
    reducer::{DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle plus the timer handles owned by one desktop provider.
pub struct DesktopHostContext {
    services: HostServices,
    persistence: LayoutPersistence,
    close_timers: Rc<RefCell<HashMap<u64, TimeoutHandle>>>,
    persist_timer: Rc<RefCell<Option<TimeoutHandle>>>,
}

impl DesktopHostContext {
    /// Wraps injected host services.
    pub fn new(services: HostServices) -> Self {
        Self {
            persistence: LayoutPersistence::new(services.clone()),
            services,
            close_timers: Rc::default(),
            persist_timer: Rc::default(),
        }
    }

    /// Returns the injected host services.
    pub fn services(&self) -> &HostServices {
        &self.services
    }

    /// Returns the layout persistence adapter.
    pub fn persistence(&self) -> &LayoutPersistence {
        &self.persistence
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.services.host_strategy_name()
    }

    /// Loads configuration and the persisted layout, then hydrates the desktop.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        effects::run_runtime_effect(self.clone(), runtime, effect);
    }

    /// Clears every pending timer. Called when the provider is disposed.
    pub fn cancel_all_timers(&self) {
        timers::cancel_all(self);
        persistence_effects::cancel_pending(self);
    }

    /// Returns the current desktop viewport rect.
    pub fn desktop_viewport_rect(&self) -> WindowRect {
        viewport::desktop_viewport_rect()
    }
}
