//! Windowed desktop runtime for a content site: window registry, pointer interactions,
//! stacking, router bridge, and layout persistence.

pub mod components;
pub mod config;
pub mod content;
mod effect_executor;
pub mod geometry;
mod host;
pub mod interaction;
pub mod keyboard;
pub mod kinds;
pub mod model;
pub mod navigation;
pub mod persistence;
pub mod reducer;
pub mod registry;
mod runtime_context;
pub mod stacking;
pub mod tabs;

pub use components::{DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::WindowManagerConfig;
pub use content::{ContentFactory, ContentRegistry, WindowContentContext};
pub use interaction::InteractionState;
pub use model::*;
pub use navigation::{NavigationBridge, RouteMatch, RouteTable};
pub use persistence::{LayoutError, LayoutPersistence};
pub use reducer::{reduce_desktop, DesktopAction, DesktopState, ReducerError, RuntimeEffect};
pub use registry::WindowRegistry;
pub use runtime_context::use_desktop_runtime;
