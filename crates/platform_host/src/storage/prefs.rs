//! Lightweight preference storage contracts and adapters.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for lightweight preference values (JSON text per key).
pub trait PrefsStore {
    /// Loads the raw JSON string stored under `key`.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Stores a raw JSON string under `key`.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Removes `key`.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Preference store that never holds anything.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store.
///
/// Clones share the same map. [`MemoryPrefsStore::set_unavailable`] makes every call fail, which
/// lets tests exercise the runtime's best-effort persistence paths.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<HashMap<String, String>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryPrefsStore {
    /// Seeds a raw value without going through serialization.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.inner.borrow_mut().insert(key.into(), raw_json.into());
    }

    /// Reads a raw value synchronously.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().get(key).cloned()
    }

    /// Toggles simulated storage unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check_available(&self) -> Result<(), String> {
        if self.unavailable.get() {
            Err("preference storage unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self.raw(key))
        })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check_available()?;
            self.insert_raw(key, raw_json);
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check_available()?;
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct SnapPrefs {
        snap_enabled: bool,
        snap_threshold: i32,
    }

    #[test]
    fn typed_helpers_round_trip_through_memory_store() {
        let store = MemoryPrefsStore::default();
        let prefs = SnapPrefs {
            snap_enabled: false,
            snap_threshold: 32,
        };
        block_on(save_pref_with(&store, "wm.snap", &prefs)).expect("save");

        let loaded: Option<SnapPrefs> = block_on(load_pref_with(&store, "wm.snap")).expect("load");
        assert_eq!(loaded, Some(prefs));
    }

    #[test]
    fn corrupt_raw_value_surfaces_as_decode_error() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("wm.snap", "{not json");

        let err = block_on(load_pref_with::<_, SnapPrefs>(&store, "wm.snap"))
            .expect_err("corrupt pref should not decode");
        assert!(!err.is_empty());
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = MemoryPrefsStore::default();
        store.set_unavailable(true);
        let store_obj: &dyn PrefsStore = &store;

        assert!(block_on(store_obj.load_pref("k")).is_err());
        assert!(block_on(store_obj.save_pref("k", "1")).is_err());
        assert!(block_on(store_obj.delete_pref("k")).is_err());

        store.set_unavailable(false);
        block_on(store_obj.save_pref("k", "1")).expect("save after recovery");
        assert_eq!(store.raw("k"), Some("1".to_string()));
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store_obj: &dyn PrefsStore = &NoopPrefsStore;
        assert_eq!(block_on(store_obj.load_pref("k")).expect("load"), None);
        block_on(store_obj.save_pref("k", "{}")).expect("save");
        block_on(store_obj.delete_pref("k")).expect("delete");
    }
}
