//! Window content dispatch.
//!
//! The host application registers one factory per [`WindowKind`]; the window frame asks the
//! registry to build its body. Content talks back to the desktop only through the callbacks in
//! [`WindowContentContext`].

use std::{collections::HashMap, rc::Rc};

use leptos::*;

use crate::model::{WindowId, WindowKind};

/// Everything a content view may know about the window hosting it.
#[derive(Clone)]
pub struct WindowContentContext {
    pub window_id: WindowId,
    pub kind: WindowKind,
    /// Keyed content identifier (`"42"` for `/post?id=42`).
    pub content_key: Option<String>,
    /// Location the window represents.
    pub route: Option<String>,
    /// Renames the hosting window and its tab.
    pub set_title: Callback<String>,
}

pub type ContentFactory = Rc<dyn Fn(WindowContentContext) -> View>;

/// [`WindowKind`] to content factory table.
#[derive(Clone, Default)]
pub struct ContentRegistry {
    factories: HashMap<WindowKind, ContentFactory>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::register`].
    pub fn with<F>(mut self, kind: WindowKind, factory: F) -> Self
    where
        F: Fn(WindowContentContext) -> View + 'static,
    {
        self.register(kind, factory);
        self
    }

    /// Registers (or replaces) the factory for `kind`.
    pub fn register<F>(&mut self, kind: WindowKind, factory: F)
    where
        F: Fn(WindowContentContext) -> View + 'static,
    {
        self.factories.insert(kind, Rc::new(factory));
    }

    pub fn contains(&self, kind: WindowKind) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Kinds without a registered factory.
    pub fn missing_kinds(&self) -> Vec<WindowKind> {
        WindowKind::ALL
            .into_iter()
            .filter(|kind| !self.contains(*kind))
            .collect()
    }

    /// Builds the body for `ctx.kind`, or a placeholder when nothing is registered.
    pub fn render(&self, ctx: WindowContentContext) -> View {
        match self.factories.get(&ctx.kind) {
            Some(factory) => factory(ctx),
            None => {
                let label = ctx.kind.as_str();
                view! {
                    <div class="window-content-missing">
                        <p>{format!("No content registered for `{label}`.")}</p>
                    </div>
                }
                .into_view()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn registry_tracks_registered_kinds() {
        let registry = ContentRegistry::new()
            .with(WindowKind::Home, |_| ().into_view())
            .with(WindowKind::Post, |_| ().into_view());

        assert!(registry.contains(WindowKind::Home));
        assert!(!registry.contains(WindowKind::Search));
        assert_eq!(registry.missing_kinds().len(), WindowKind::ALL.len() - 2);
        assert!(!registry.missing_kinds().contains(&WindowKind::Post));
    }
}
