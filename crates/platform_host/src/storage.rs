//! Persistence contracts: lightweight preferences and versioned window layouts.

pub mod layout;
pub mod prefs;
