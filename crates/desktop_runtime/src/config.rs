//! Window-manager tuning knobs, loaded best-effort from host preferences.

use serde::{Deserialize, Serialize};

use crate::model::WindowRect;

/// Preference key holding a JSON [`WindowManagerConfig`] override.
pub const CONFIG_PREF_KEY: &str = "postdesk.config.v1";

/// Runtime configuration for geometry, stacking, close timing, and navigation behavior.
///
/// Every field has a default, so partial JSON overrides are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowManagerConfig {
    pub min_window_width: i32,
    pub min_window_height: i32,
    pub default_window_width: i32,
    pub default_window_height: i32,
    /// Gap kept between windows and the viewport edges.
    pub edge_margin: i32,
    /// Viewports narrower than this open windows maximized.
    pub mobile_breakpoint: i32,
    pub snap_enabled: bool,
    /// Distance (px) a dragged window must pass beyond a viewport edge to snap.
    pub snap_threshold: i32,
    pub base_z_index: u32,
    pub max_z_index: u32,
    pub close_delay_ms: u32,
    pub history_capacity: usize,
    /// Location navigated to when the last tab closes.
    pub fallback_path: String,
    pub url_follows_focus: bool,
    pub max_restore_windows: usize,
    pub persist_debounce_ms: u32,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            min_window_width: 400,
            min_window_height: 300,
            default_window_width: 800,
            default_window_height: 600,
            edge_margin: 8,
            mobile_breakpoint: 768,
            snap_enabled: true,
            snap_threshold: 50,
            base_z_index: 10,
            max_z_index: 80,
            close_delay_ms: 200,
            history_capacity: 10,
            fallback_path: "/".to_string(),
            url_follows_focus: true,
            max_restore_windows: 12,
            persist_debounce_ms: 1000,
        }
    }
}

impl WindowManagerConfig {
    /// Repairs out-of-range values from hand-edited overrides.
    pub fn sanitized(mut self) -> Self {
        self.min_window_width = self.min_window_width.max(1);
        self.min_window_height = self.min_window_height.max(1);
        self.default_window_width = self.default_window_width.max(self.min_window_width);
        self.default_window_height = self.default_window_height.max(self.min_window_height);
        self.edge_margin = self.edge_margin.max(0);
        self.snap_threshold = self.snap_threshold.max(0);
        self.max_z_index = self.max_z_index.max(self.base_z_index);
        self.history_capacity = self.history_capacity.max(1);
        if !self.fallback_path.starts_with('/') {
            self.fallback_path = format!("/{}", self.fallback_path);
        }
        self
    }

    pub fn is_narrow(&self, viewport: WindowRect) -> bool {
        viewport.w < self.mobile_breakpoint
    }

    /// Minimum window size for `viewport`.
    ///
    /// The configured minimum applies unless it does not fit, in which case it shrinks to 85 % of
    /// the viewport width and 70 % of its height.
    pub fn min_size_for(&self, viewport: WindowRect) -> (i32, i32) {
        let fit_w = (viewport.w.max(0) as i64 * 85 / 100) as i32;
        let fit_h = (viewport.h.max(0) as i64 * 70 / 100) as i32;
        (
            self.min_window_width.min(fit_w).max(1),
            self.min_window_height.min(fit_h).max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: WindowManagerConfig =
            serde_json::from_str(r#"{"snap_enabled":false,"close_delay_ms":0}"#).expect("decode");
        assert!(!config.snap_enabled);
        assert_eq!(config.close_delay_ms, 0);
        assert_eq!(config.min_window_width, 400);
        assert_eq!(config.fallback_path, "/");
    }

    #[test]
    fn min_size_shrinks_only_when_configured_minimum_does_not_fit() {
        let config = WindowManagerConfig::default();
        assert_eq!(config.min_size_for(WindowRect::new(0, 0, 1280, 800)), (400, 300));
        assert_eq!(config.min_size_for(WindowRect::new(0, 0, 360, 400)), (306, 280));
    }

    #[test]
    fn sanitize_repairs_inverted_ranges() {
        let config = WindowManagerConfig {
            min_window_width: -5,
            base_z_index: 50,
            max_z_index: 10,
            history_capacity: 0,
            fallback_path: "home".to_string(),
            ..WindowManagerConfig::default()
        }
        .sanitized();

        assert_eq!(config.min_window_width, 1);
        assert_eq!(config.max_z_index, 50);
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.fallback_path, "/home");
    }
}
