//! Browser (`wasm32`) implementations of [`platform_host`] store contracts.
//!
//! Both stores sit on top of `window.localStorage`. Off `wasm32` they degrade to empty,
//! always-successful stores so native unit tests of dependent crates link without a browser, and
//! [`build_host_services`] swaps in the in-memory adapters from `platform_host` instead.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Host-strategy selection and adapter factories used by the entry crate.
pub mod adapters;
pub mod storage;

pub use adapters::{build_host_services, layout_store, prefs_store, selected_host_strategy};
pub use storage::local_layout::{layout_storage_key, WebLayoutStore, LAYOUT_KEY_PREFIX};
pub use storage::local_prefs::WebPrefsStore;
