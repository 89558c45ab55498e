//! `localStorage`-backed stores.

mod local_storage;
pub mod local_layout;
pub mod local_prefs;
