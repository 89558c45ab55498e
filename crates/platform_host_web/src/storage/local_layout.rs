//! `localStorage`-backed layout store.

use platform_host::{LayoutEnvelope, LayoutStore, LayoutStoreFuture};

use super::local_storage;

/// Prefix prepended to a layout namespace to form its `localStorage` key.
pub const LAYOUT_KEY_PREFIX: &str = "postdesk.layout.";

/// Returns the `localStorage` key used for `namespace`.
pub fn layout_storage_key(namespace: &str) -> String {
    format!("{LAYOUT_KEY_PREFIX}{namespace}")
}

#[derive(Debug, Clone, Copy, Default)]
/// Browser layout store persisting one JSON envelope per namespace.
pub struct WebLayoutStore;

impl LayoutStore for WebLayoutStore {
    fn load_layout<'a>(
        &'a self,
        namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<Option<LayoutEnvelope>, String>> {
        Box::pin(async move {
            let Some(raw) = local_storage::get_item(&layout_storage_key(namespace))? else {
                return Ok(None);
            };
            serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| format!("corrupt layout envelope for `{namespace}`: {e}"))
        })
    }

    fn save_layout<'a>(
        &'a self,
        envelope: &'a LayoutEnvelope,
    ) -> LayoutStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let raw = serde_json::to_string(envelope).map_err(|e| e.to_string())?;
            local_storage::set_item(&layout_storage_key(&envelope.namespace), &raw)
        })
    }

    fn clear_layout<'a>(
        &'a self,
        namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { local_storage::remove_item(&layout_storage_key(namespace)) })
    }
}
