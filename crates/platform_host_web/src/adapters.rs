use std::rc::Rc;

use platform_host::{
    HostServices, HostStrategy, LayoutStore, MemoryLayoutStore, MemoryPrefsStore, PrefsStore,
};

use crate::{WebLayoutStore, WebPrefsStore};

/// Returns the host strategy for the active build target.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(target_arch = "wasm32")]
    {
        HostStrategy::Browser
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        HostStrategy::Memory
    }
}

/// Builds the preference store for the selected strategy.
pub fn prefs_store() -> Rc<dyn PrefsStore> {
    match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebPrefsStore),
        HostStrategy::Memory => Rc::new(MemoryPrefsStore::default()),
    }
}

/// Builds the layout store for the selected strategy.
pub fn layout_store() -> Rc<dyn LayoutStore> {
    match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebLayoutStore),
        HostStrategy::Memory => Rc::new(MemoryLayoutStore::default()),
    }
}

/// Builds the [`HostServices`] bundle injected into the desktop runtime.
pub fn build_host_services() -> HostServices {
    HostServices::new(prefs_store(), layout_store(), selected_host_strategy())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_builds_select_memory_adapters() {
        let services = build_host_services();
        assert_eq!(services.host_strategy, HostStrategy::Memory);

        futures::executor::block_on(services.prefs.save_pref("k", "1")).expect("save");
        assert_eq!(
            futures::executor::block_on(services.prefs.load_pref("k")).expect("load"),
            Some("1".to_string())
        );
    }
}
