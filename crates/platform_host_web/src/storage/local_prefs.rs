//! `localStorage`-backed preference store.
//!
//! Keys are stored verbatim so values written by earlier versions of the site (for example the
//! bare `posthog-windows` layout array) stay readable through the same store.

use platform_host::{PrefsStore, PrefsStoreFuture};

use super::local_storage;

#[derive(Debug, Clone, Copy, Default)]
/// Browser preference store backed by `window.localStorage`.
pub struct WebPrefsStore;

impl PrefsStore for WebPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { local_storage::get_item(key) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { local_storage::set_item(key, raw_json) })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move { local_storage::remove_item(key) })
    }
}
