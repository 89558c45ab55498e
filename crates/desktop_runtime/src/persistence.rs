//! Desktop runtime persistence adapters for layout hydration and window-manager preferences.

use leptos::logging;
use platform_host::{
    build_layout_envelope, decode_layout_payload, load_pref_with, HostServices, PrefsStore,
    DESKTOP_LAYOUT_NAMESPACE,
};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::{WindowManagerConfig, CONFIG_PREF_KEY},
    model::WindowLayoutRecord,
};

/// Schema version of the persisted `Vec<WindowLayoutRecord>` payload.
pub const LAYOUT_SCHEMA_VERSION: u32 = 1;
/// Preference key of the bare-array layout written by older site builds.
pub const LEGACY_LAYOUT_PREF_KEY: &str = "posthog-windows";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Layout persistence failures. Callers of [`LayoutPersistence::load`] only see them as logs.
pub enum LayoutError {
    /// The host store rejected the operation.
    #[error("layout store failed: {0}")]
    Store(String),
    /// Stored data did not decode.
    #[error("layout payload is corrupt: {0}")]
    Decode(String),
    /// Stored data was written by a newer build.
    #[error("unsupported layout schema version {0}")]
    UnsupportedSchema(u32),
}

/// Window entry as stored by older site builds: array order is stacking order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyWindowRecord {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    is_maximized: bool,
    #[serde(default)]
    is_minimized: bool,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

impl LegacyWindowRecord {
    fn migrate(self, stack_index: usize) -> WindowLayoutRecord {
        WindowLayoutRecord {
            id: self.id,
            kind: self.kind,
            content_key: self.username.filter(|name| !name.is_empty()),
            title: self.title.unwrap_or_default(),
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            width: self.width.round() as i32,
            height: self.height.round() as i32,
            is_maximized: self.is_maximized,
            is_minimized: self.is_minimized,
            z_index: u32::try_from(stack_index).unwrap_or(u32::MAX),
            pre_restore: None,
            route: None,
        }
    }
}

fn migrate_layout(
    schema_version: u32,
    payload: &serde_json::Value,
) -> Result<Vec<WindowLayoutRecord>, LayoutError> {
    match schema_version {
        0 => {
            let legacy: Vec<LegacyWindowRecord> = serde_json::from_value(payload.clone())
                .map_err(|e| LayoutError::Decode(e.to_string()))?;
            Ok(legacy
                .into_iter()
                .enumerate()
                .map(|(index, record)| record.migrate(index))
                .collect())
        }
        other => Err(LayoutError::UnsupportedSchema(other)),
    }
}

/// Loads and saves the window layout through the injected host stores.
#[derive(Clone)]
pub struct LayoutPersistence {
    host: HostServices,
}

impl LayoutPersistence {
    pub fn new(host: HostServices) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    /// Loads the persisted layout, migrating legacy data when needed.
    ///
    /// Missing, corrupt, or future-versioned data yields `None`; failures are logged.
    pub async fn load(&self) -> Option<Vec<WindowLayoutRecord>> {
        match self.try_load().await {
            Ok(records) => records,
            Err(err) => {
                logging::warn!("desktop layout load failed: {err}");
                None
            }
        }
    }

    /// Persists `records`, logging instead of propagating failures.
    pub async fn save(&self, records: &[WindowLayoutRecord]) {
        if let Err(err) = self.try_save(records).await {
            logging::warn!("desktop layout save failed: {err}");
        }
    }

    /// Fallible form of [`Self::load`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the store fails or the stored data is unusable.
    pub async fn try_load(&self) -> Result<Option<Vec<WindowLayoutRecord>>, LayoutError> {
        let envelope = self
            .host
            .layout
            .load_layout(DESKTOP_LAYOUT_NAMESPACE)
            .await
            .map_err(LayoutError::Store)?;

        match envelope {
            Some(envelope) if envelope.schema_version == LAYOUT_SCHEMA_VERSION => {
                decode_layout_payload(&envelope)
                    .map(Some)
                    .map_err(LayoutError::Decode)
            }
            Some(envelope) => migrate_layout(envelope.schema_version, &envelope.payload).map(Some),
            None => self.load_legacy().await,
        }
    }

    /// Fallible form of [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Store`] when serialization or the store write fails.
    pub async fn try_save(&self, records: &[WindowLayoutRecord]) -> Result<(), LayoutError> {
        let envelope =
            build_layout_envelope(DESKTOP_LAYOUT_NAMESPACE, LAYOUT_SCHEMA_VERSION, &records)
                .map_err(LayoutError::Store)?;
        self.host
            .layout
            .save_layout(&envelope)
            .await
            .map_err(LayoutError::Store)
    }

    /// Drops the persisted layout.
    pub async fn clear(&self) {
        if let Err(err) = self.host.layout.clear_layout(DESKTOP_LAYOUT_NAMESPACE).await {
            logging::warn!("desktop layout clear failed: {err}");
        }
    }

    /// Reads the pre-envelope layout key, rewrites it as an envelope, and removes the old key.
    async fn load_legacy(&self) -> Result<Option<Vec<WindowLayoutRecord>>, LayoutError> {
        let raw = self
            .host
            .prefs
            .load_pref(LEGACY_LAYOUT_PREF_KEY)
            .await
            .map_err(LayoutError::Store)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let payload: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| LayoutError::Decode(e.to_string()))?;
        let records = migrate_layout(0, &payload)?;

        self.try_save(&records).await?;
        if let Err(err) = self.host.prefs.delete_pref(LEGACY_LAYOUT_PREF_KEY).await {
            logging::warn!("legacy layout cleanup failed: {err}");
        }
        logging::log!("migrated {} legacy desktop windows", records.len());
        Ok(Some(records))
    }
}

/// Loads the window-manager configuration override, falling back to defaults.
pub async fn load_config(prefs: &dyn PrefsStore) -> WindowManagerConfig {
    match load_pref_with::<_, WindowManagerConfig>(prefs, CONFIG_PREF_KEY).await {
        Ok(Some(config)) => config.sanitized(),
        Ok(None) => WindowManagerConfig::default(),
        Err(err) => {
            logging::warn!("window manager config load failed: {err}");
            WindowManagerConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;
    use platform_host::{
        HostStrategy, LayoutEnvelope, LayoutStore, MemoryLayoutStore, MemoryPrefsStore,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn persistence() -> (LayoutPersistence, MemoryPrefsStore, MemoryLayoutStore) {
        let prefs = MemoryPrefsStore::default();
        let layout = MemoryLayoutStore::default();
        let host = HostServices::new(
            Rc::new(prefs.clone()),
            Rc::new(layout.clone()),
            HostStrategy::Memory,
        );
        (LayoutPersistence::new(host), prefs, layout)
    }

    fn record(id: &str) -> WindowLayoutRecord {
        WindowLayoutRecord {
            id: id.to_string(),
            kind: "post".to_string(),
            content_key: Some("42".to_string()),
            title: "Hello".to_string(),
            x: 10,
            y: 20,
            width: 640,
            height: 480,
            is_maximized: false,
            is_minimized: true,
            z_index: 12,
            pre_restore: None,
            route: Some("/post?id=42".to_string()),
        }
    }

    #[test]
    fn save_then_load_round_trips_records() {
        let (persistence, _, layout) = persistence();
        block_on(persistence.save(&[record("post-1")]));
        assert_eq!(layout.save_count(), 1);

        let loaded = block_on(persistence.load());
        assert_eq!(loaded, Some(vec![record("post-1")]));
    }

    #[test]
    fn missing_layout_loads_as_none() {
        let (persistence, _, _) = persistence();
        assert_eq!(block_on(persistence.load()), None);
    }

    #[test]
    fn corrupt_or_future_payload_loads_as_none() {
        let (persistence, _, layout) = persistence();
        layout.insert(LayoutEnvelope::new(
            DESKTOP_LAYOUT_NAMESPACE,
            LAYOUT_SCHEMA_VERSION,
            json!({ "not": "a list" }),
        ));
        assert!(matches!(
            block_on(persistence.try_load()),
            Err(LayoutError::Decode(_))
        ));
        assert_eq!(block_on(persistence.load()), None);

        layout.insert(LayoutEnvelope::new(DESKTOP_LAYOUT_NAMESPACE, 7, json!([])));
        assert_eq!(
            block_on(persistence.try_load()),
            Err(LayoutError::UnsupportedSchema(7))
        );
    }

    #[test]
    fn unavailable_store_is_logged_not_propagated() {
        let (persistence, _, layout) = persistence();
        layout.set_unavailable(true);
        block_on(persistence.save(&[record("post-1")]));
        assert_eq!(layout.save_count(), 0);
        assert_eq!(block_on(persistence.load()), None);
    }

    #[test]
    fn legacy_bare_array_is_migrated_and_rewritten() {
        let (persistence, prefs, layout) = persistence();
        prefs.insert_raw(
            LEGACY_LAYOUT_PREF_KEY,
            json!([
                { "id": "home-1", "type": "home", "title": "Home", "isMaximized": false,
                  "isMinimized": false, "x": 100, "y": 80.6, "width": 800, "height": 600 },
                { "id": "profile-1", "type": "profile", "title": "Ada", "username": "ada",
                  "isMaximized": true, "isMinimized": false, "x": 0, "y": 0,
                  "width": 1200, "height": 700 }
            ])
            .to_string(),
        );

        let records = block_on(persistence.load()).expect("migrated");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].y, 81);
        assert_eq!(records[0].z_index, 0);
        assert_eq!(records[1].content_key.as_deref(), Some("ada"));
        assert_eq!(records[1].z_index, 1);
        assert!(records[1].is_maximized);

        assert_eq!(prefs.raw(LEGACY_LAYOUT_PREF_KEY), None);
        let envelope = layout.get(DESKTOP_LAYOUT_NAMESPACE).expect("envelope");
        assert_eq!(envelope.schema_version, LAYOUT_SCHEMA_VERSION);
        assert_eq!(block_on(persistence.load()), Some(records));
    }

    #[test]
    fn schema_zero_envelope_is_migrated_in_place() {
        let (persistence, _, layout) = persistence();
        block_on(layout.save_layout(&LayoutEnvelope::new(
            DESKTOP_LAYOUT_NAMESPACE,
            0,
            json!([{ "id": "about-1", "type": "about", "x": 5, "y": 5, "width": 500, "height": 400 }]),
        )))
        .expect("seed");

        let records = block_on(persistence.load()).expect("records");
        assert_eq!(records[0].kind, "about");
        assert_eq!(records[0].title, "");
    }

    #[test]
    fn config_override_is_sanitized_and_corrupt_override_defaults() {
        let prefs = MemoryPrefsStore::default();
        prefs.insert_raw(
            CONFIG_PREF_KEY,
            json!({ "snap_enabled": false, "history_capacity": 0 }).to_string(),
        );
        let config = block_on(load_config(&prefs));
        assert!(!config.snap_enabled);
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.min_window_width, 400);

        prefs.insert_raw(CONFIG_PREF_KEY, "{not json");
        assert_eq!(block_on(load_config(&prefs)), WindowManagerConfig::default());
    }
}
