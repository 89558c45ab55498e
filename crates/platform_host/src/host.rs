//! Host service bundle handed to the desktop runtime by the entry layer.

use std::rc::Rc;

use crate::{LayoutStore, MemoryLayoutStore, MemoryPrefsStore, PrefsStore};

/// Stable host strategy selected for the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed storage (`localStorage`).
    Browser,
    /// In-memory storage used by tests and non-browser builds.
    Memory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
        }
    }
}

/// Runtime-selected storage services injected into `desktop_runtime`.
///
/// Environment-specific adapter selection happens before this bundle crosses into the runtime,
/// so the window manager never depends on browser APIs for persistence.
#[derive(Clone)]
pub struct HostServices {
    /// Lightweight typed preference store (window-manager configuration overrides).
    pub prefs: Rc<dyn PrefsStore>,
    /// Window layout store.
    pub layout: Rc<dyn LayoutStore>,
    /// Strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds a bundle from explicit adapters.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        layout: Rc<dyn LayoutStore>,
        host_strategy: HostStrategy,
    ) -> Self {
        Self {
            prefs,
            layout,
            host_strategy,
        }
    }

    /// Builds a bundle backed entirely by process memory.
    pub fn in_memory() -> Self {
        Self::new(
            Rc::new(MemoryPrefsStore::default()),
            Rc::new(MemoryLayoutStore::default()),
            HostStrategy::Memory,
        )
    }

    /// Returns the stable strategy name.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy.as_str()
    }
}
