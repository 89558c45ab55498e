//! Static descriptors for each [`WindowKind`].

use crate::model::WindowKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowKindDescriptor {
    pub kind: WindowKind,
    /// At most one live instance; otherwise windows are unique per `(kind, content_key)`.
    pub singleton: bool,
    pub default_title: &'static str,
    /// Preferred `(width, height)`; `None` falls back to the configured default size.
    pub default_size: Option<(i32, i32)>,
}

pub fn descriptor(kind: WindowKind) -> WindowKindDescriptor {
    let (singleton, default_title, default_size) = match kind {
        WindowKind::Home => (true, "Home", None),
        WindowKind::Explore => (true, "Explore", None),
        WindowKind::Search => (true, "Search", Some((720, 560))),
        WindowKind::Post => (false, "Post", Some((900, 700))),
        WindowKind::Profile => (false, "Profile", None),
        WindowKind::Community => (true, "Community", None),
        WindowKind::Questions => (false, "Questions", None),
        WindowKind::Login => (true, "Sign in", Some((480, 560))),
        WindowKind::Settings => (true, "Settings", Some((640, 520))),
        WindowKind::Admin => (true, "Admin", None),
        WindowKind::About => (true, "About", Some((640, 520))),
        WindowKind::Contact => (true, "Contact", Some((560, 520))),
        WindowKind::Services => (true, "Services", None),
        WindowKind::Write => (true, "Write for us", None),
    };
    WindowKindDescriptor {
        kind,
        singleton,
        default_title,
        default_size,
    }
}

pub fn is_singleton(kind: WindowKind) -> bool {
    descriptor(kind).singleton
}
