//! Window-layout persistence contracts and the versioned envelope they store.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    pin::Pin,
    rc::Rc,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Version of the [`LayoutEnvelope`] wrapper itself.
pub const LAYOUT_ENVELOPE_VERSION: u32 = 1;
/// Namespace under which the desktop window layout is stored.
pub const DESKTOP_LAYOUT_NAMESPACE: &str = "system.desktop.layout";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned wrapper around a persisted layout payload.
pub struct LayoutEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owner of the payload.
    pub namespace: String,
    /// Owner-defined schema version of `payload`.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl LayoutEnvelope {
    /// Creates an envelope stamped with a monotonic timestamp.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: LAYOUT_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// Object-safe boxed future used by [`LayoutStore`] async methods.
pub type LayoutStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Storage service for window layout envelopes keyed by namespace.
pub trait LayoutStore {
    /// Loads the envelope stored for `namespace`.
    fn load_layout<'a>(
        &'a self,
        namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<Option<LayoutEnvelope>, String>>;

    /// Replaces the envelope stored for its namespace.
    fn save_layout<'a>(
        &'a self,
        envelope: &'a LayoutEnvelope,
    ) -> LayoutStoreFuture<'a, Result<(), String>>;

    /// Removes any envelope stored for `namespace`.
    fn clear_layout<'a>(&'a self, namespace: &'a str)
        -> LayoutStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Layout store that never holds anything.
pub struct NoopLayoutStore;

impl LayoutStore for NoopLayoutStore {
    fn load_layout<'a>(
        &'a self,
        _namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<Option<LayoutEnvelope>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_layout<'a>(
        &'a self,
        _envelope: &'a LayoutEnvelope,
    ) -> LayoutStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn clear_layout<'a>(
        &'a self,
        _namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory layout store; clones share state.
pub struct MemoryLayoutStore {
    inner: Rc<RefCell<HashMap<String, LayoutEnvelope>>>,
    unavailable: Rc<Cell<bool>>,
    save_count: Rc<Cell<usize>>,
}

impl MemoryLayoutStore {
    /// Toggles simulated storage unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Stores an envelope directly, bypassing availability checks.
    pub fn insert(&self, envelope: LayoutEnvelope) {
        self.inner
            .borrow_mut()
            .insert(envelope.namespace.clone(), envelope);
    }

    /// Returns the stored envelope for `namespace`.
    pub fn get(&self, namespace: &str) -> Option<LayoutEnvelope> {
        self.inner.borrow().get(namespace).cloned()
    }

    /// Number of successful saves since creation.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }

    fn check_available(&self) -> Result<(), String> {
        if self.unavailable.get() {
            Err("layout storage unavailable".to_string())
        } else {
            Ok(())
        }
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load_layout<'a>(
        &'a self,
        namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<Option<LayoutEnvelope>, String>> {
        Box::pin(async move {
            self.check_available()?;
            Ok(self.get(namespace))
        })
    }

    fn save_layout<'a>(
        &'a self,
        envelope: &'a LayoutEnvelope,
    ) -> LayoutStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check_available()?;
            self.insert(envelope.clone());
            self.save_count.set(self.save_count.get() + 1);
            Ok(())
        })
    }

    fn clear_layout<'a>(
        &'a self,
        namespace: &'a str,
    ) -> LayoutStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.check_available()?;
            self.inner.borrow_mut().remove(namespace);
            Ok(())
        })
    }
}

/// Builds a [`LayoutEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_layout_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<LayoutEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(LayoutEnvelope::new(namespace, schema_version, payload))
}

/// Deserializes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when the payload does not match `T`.
pub fn decode_layout_payload<T: DeserializeOwned>(envelope: &LayoutEnvelope) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_serialization_shape_is_snake_case() {
        let envelope = LayoutEnvelope {
            envelope_version: LAYOUT_ENVELOPE_VERSION,
            namespace: DESKTOP_LAYOUT_NAMESPACE.to_string(),
            schema_version: 3,
            updated_at_unix_ms: 99,
            payload: json!([]),
        };

        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        let object = value.as_object().expect("object");
        assert_eq!(object.get("schema_version"), Some(&json!(3)));
        assert_eq!(object.get("updated_at_unix_ms"), Some(&json!(99)));
        assert!(!object.contains_key("schemaVersion"));
    }

    #[test]
    fn envelopes_get_increasing_timestamps() {
        let first = LayoutEnvelope::new("ns", 1, json!(1));
        let second = LayoutEnvelope::new("ns", 1, json!(2));
        assert!(second.updated_at_unix_ms > first.updated_at_unix_ms);
    }

    #[test]
    fn decode_rejects_mismatched_payload() {
        let envelope = build_layout_envelope("ns", 1, &json!({"windows": "nope"}))
            .expect("build envelope");
        let err = decode_layout_payload::<Vec<u32>>(&envelope).expect_err("mismatch");
        assert!(!err.is_empty());
    }

    #[test]
    fn memory_store_round_trip_counts_saves_and_clears() {
        let store = MemoryLayoutStore::default();
        let store_obj: &dyn LayoutStore = &store;
        let envelope =
            build_layout_envelope(DESKTOP_LAYOUT_NAMESPACE, 1, &vec![1, 2, 3]).expect("build");

        block_on(store_obj.save_layout(&envelope)).expect("save");
        let loaded = block_on(store_obj.load_layout(DESKTOP_LAYOUT_NAMESPACE))
            .expect("load")
            .expect("present");
        assert_eq!(loaded.payload, json!([1, 2, 3]));
        assert_eq!(store.save_count(), 1);

        block_on(store_obj.clear_layout(DESKTOP_LAYOUT_NAMESPACE)).expect("clear");
        assert_eq!(
            block_on(store_obj.load_layout(DESKTOP_LAYOUT_NAMESPACE)).expect("load"),
            None
        );
    }

    #[test]
    fn unavailable_memory_store_fails_without_mutating() {
        let store = MemoryLayoutStore::default();
        store.set_unavailable(true);
        let envelope = build_layout_envelope("ns", 1, &json!([])).expect("build");

        assert!(block_on(store.save_layout(&envelope)).is_err());
        assert!(block_on(store.load_layout("ns")).is_err());
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.get("ns"), None);
    }
}
