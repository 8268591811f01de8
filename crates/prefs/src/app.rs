// Typed view of the app's own settings and profile fields

use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::keys::*;
use crate::store::PreferenceStore;

/// Accessors for the keys the app screens read and write.
///
/// Cheap to clone; every clone talks to the same store.
#[derive(Debug, Clone)]
pub struct AppPreferences {
    store: Arc<PreferenceStore>,
}

/// Everything the settings and profile screens show, read in one go
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub user_name: String,
    pub user_email: String,
    pub notifications_enabled: bool,
    pub dark_mode_enabled: bool,
    pub first_launch: bool,
}

impl AppPreferences {
    pub fn new(store: Arc<PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn notifications_enabled(&self) -> bool {
        self.store.get_bool(KEY_NOTIFICATIONS_ENABLED, DEFAULT_NOTIFICATIONS_ENABLED)
    }

    pub fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.store.set_bool(KEY_NOTIFICATIONS_ENABLED, enabled)
    }

    pub fn dark_mode_enabled(&self) -> bool {
        self.store.get_bool(KEY_DARK_MODE_ENABLED, DEFAULT_DARK_MODE_ENABLED)
    }

    pub fn set_dark_mode_enabled(&self, enabled: bool) -> Result<()> {
        self.store.set_bool(KEY_DARK_MODE_ENABLED, enabled)
    }

    pub fn user_name(&self) -> String {
        self.store
            .get_string(KEY_USER_NAME, Some(DEFAULT_USER_NAME))
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
    }

    pub fn set_user_name(&self, name: &str) -> Result<()> {
        self.store.set_string(KEY_USER_NAME, name)
    }

    pub fn user_email(&self) -> String {
        self.store
            .get_string(KEY_USER_EMAIL, Some(DEFAULT_USER_EMAIL))
            .unwrap_or_else(|| DEFAULT_USER_EMAIL.to_string())
    }

    pub fn set_user_email(&self, email: &str) -> Result<()> {
        self.store.set_string(KEY_USER_EMAIL, email)
    }

    pub fn is_first_launch(&self) -> bool {
        self.store.is_first_launch()
    }

    pub fn mark_launched(&self) -> Result<()> {
        self.store.mark_launched()
    }

    /// Wipe everything except the first-launch flag (which ends up false)
    pub fn reset(&self) -> Result<()> {
        self.store.clear_all(&[KEY_FIRST_LAUNCH])
    }

    pub fn profile(&self) -> Profile {
        Profile {
            user_name: self.user_name(),
            user_email: self.user_email(),
            notifications_enabled: self.notifications_enabled(),
            dark_mode_enabled: self.dark_mode_enabled(),
            first_launch: self.is_first_launch(),
        }
    }
}
