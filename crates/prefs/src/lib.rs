//! `modernapp-prefs` — durable, typed preference store.
//!
//! A flat key -> primitive namespace with per-key defaults, persisted as a
//! JSON file or a SQLite table. Build one [`PreferenceStore`] at startup and
//! pass it to whatever needs it; [`AppPreferences`] layers the app's
//! well-known keys on top.

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod items;
pub mod keys;
pub mod store;
pub mod value;

pub use app::{AppPreferences, Profile};
pub use backend::Backend;
pub use config::{BackendKind, StoreConfig};
pub use error::PrefsError;
pub use items::{sample_items, SampleItem};
pub use store::PreferenceStore;
pub use value::{PrefKind, PrefValue};
