use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable window identifier, unique within a registry for the window's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Closed set of content surfaces a window can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Home,
    Explore,
    Search,
    Post,
    Profile,
    Community,
    Questions,
    Login,
    Settings,
    Admin,
    About,
    Contact,
    Services,
    Write,
}

impl WindowKind {
    pub const ALL: [WindowKind; 14] = [
        Self::Home,
        Self::Explore,
        Self::Search,
        Self::Post,
        Self::Profile,
        Self::Community,
        Self::Questions,
        Self::Login,
        Self::Settings,
        Self::Admin,
        Self::About,
        Self::Contact,
        Self::Services,
        Self::Write,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Explore => "explore",
            Self::Search => "search",
            Self::Post => "post",
            Self::Profile => "profile",
            Self::Community => "community",
            Self::Questions => "questions",
            Self::Login => "login",
            Self::Settings => "settings",
            Self::Admin => "admin",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Services => "services",
            Self::Write => "write",
        }
    }

    /// Parses a persisted or host-supplied type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag.trim()))
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }

    /// Shrinks the rect by `margin` on every side, never below zero size.
    pub fn inset(self, margin: i32) -> Self {
        let margin = margin.max(0);
        Self {
            x: self.x.saturating_add(margin),
            y: self.y.saturating_add(margin),
            w: self.w.saturating_sub(margin.saturating_mul(2)).max(0),
            h: self.h.saturating_sub(margin.saturating_mul(2)).max(0),
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self::new(0, 0, 1280, 800)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    pub fn moves_west(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    pub fn moves_east(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    pub fn moves_north(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    pub fn moves_south(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    pub fn css_suffix(self) -> &'static str {
        match self {
            Self::North => "n",
            Self::South => "s",
            Self::East => "e",
            Self::West => "w",
            Self::NorthEast => "ne",
            Self::NorthWest => "nw",
            Self::SouthEast => "se",
            Self::SouthWest => "sw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapSide {
    Left,
    Right,
}

/// Navigation-level handle correlated with a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub path: String,
    pub title: String,
    pub is_active: bool,
}

/// Pending exit transition of a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingState {
    pub token: u64,
    /// Tab closed together with the window, recorded into history on finalize.
    pub tab: Option<Tab>,
}

/// Visible lifecycle phase derived from a window's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Normal,
    Maximized,
    Minimized,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub kind: WindowKind,
    pub content_key: Option<String>,
    pub title: String,
    pub rect: WindowRect,
    pub pre_restore: Option<WindowRect>,
    pub z_index: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    /// Normalized location the window corresponds to, when the route table knows one.
    pub route: Option<String>,
    pub closing: Option<ClosingState>,
}

impl WindowRecord {
    pub fn is_live(&self) -> bool {
        self.closing.is_none()
    }

    pub fn is_visible(&self) -> bool {
        self.is_live() && !self.minimized
    }

    pub fn phase(&self) -> WindowPhase {
        if self.closing.is_some() {
            WindowPhase::Closing
        } else if self.minimized {
            WindowPhase::Minimized
        } else if self.maximized {
            WindowPhase::Maximized
        } else {
            WindowPhase::Normal
        }
    }

    pub fn layout_record(&self) -> WindowLayoutRecord {
        WindowLayoutRecord {
            id: self.id.0.clone(),
            kind: self.kind.as_str().to_string(),
            content_key: self.content_key.clone(),
            title: self.title.clone(),
            x: self.rect.x,
            y: self.rect.y,
            width: self.rect.w,
            height: self.rect.h,
            is_maximized: self.maximized,
            is_minimized: self.minimized,
            z_index: self.z_index,
            pre_restore: self.pre_restore,
            route: self.route.clone(),
        }
    }
}

/// Caller-supplied overrides for [`crate::registry::WindowRegistry::open_window`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenWindowOptions {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content_key: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub maximized: bool,
}

impl OpenWindowOptions {
    pub fn keyed(content_key: impl Into<String>) -> Self {
        Self {
            content_key: Some(content_key.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenWindowRequest {
    pub kind: WindowKind,
    pub options: OpenWindowOptions,
}

impl OpenWindowRequest {
    pub fn new(kind: WindowKind) -> Self {
        Self {
            kind,
            options: OpenWindowOptions::default(),
        }
    }

    pub fn with_options(kind: WindowKind, options: OpenWindowOptions) -> Self {
        Self { kind, options }
    }
}

/// Result of an open request: the live window and whether it was newly created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    pub id: WindowId,
    pub created: bool,
}

/// Partial update merged by [`crate::registry::WindowRegistry::update_window`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub title: Option<String>,
    pub maximized: Option<bool>,
    pub minimized: Option<bool>,
}

impl WindowPatch {
    pub fn has_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.width.is_some() || self.height.is_some()
    }
}

/// Close transition started by the registry; the host fires the timer with `token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClose {
    pub window_id: WindowId,
    pub token: u64,
}

/// Persisted per-window layout record (camelCase JSON).
///
/// `kind` stays a string so layouts written by other builds with unknown types still decode and
/// can be skipped individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowLayoutRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_key: Option<String>,
    #[serde(default)]
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub is_maximized: bool,
    #[serde(default)]
    pub is_minimized: bool,
    #[serde(default)]
    pub z_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_restore: Option<WindowRect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// Recently closed window/tab pair kept for "reopen".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub window: WindowLayoutRecord,
    pub tab: Option<Tab>,
}

impl HistoryEntry {
    /// Path used to deduplicate history entries.
    pub fn path(&self) -> Option<&str> {
        self.tab
            .as_ref()
            .map(|tab| tab.path.as_str())
            .or(self.window.route.as_deref())
    }
}

/// Keyboard state captured from a DOM `keydown` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }
}
