//! Typed host contracts shared by the desktop runtime and its browser adapters.
//!
//! The window manager never talks to `localStorage` directly. It receives a [`HostServices`]
//! bundle whose stores implement [`PrefsStore`] and [`LayoutStore`]; concrete browser adapters
//! live in `platform_host_web`, and the in-memory adapters here back unit tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod storage;
pub mod time;

pub use host::{HostServices, HostStrategy};
pub use storage::layout::{
    build_layout_envelope, decode_layout_payload, LayoutEnvelope, LayoutStore, LayoutStoreFuture,
    MemoryLayoutStore, NoopLayoutStore, DESKTOP_LAYOUT_NAMESPACE, LAYOUT_ENVELOPE_VERSION,
};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
