// Well-known keys and their defaults
// Names must match what existing installs already have on disk

pub const KEY_NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
pub const KEY_DARK_MODE_ENABLED: &str = "dark_mode_enabled";
pub const KEY_USER_NAME: &str = "user_name";
pub const KEY_USER_EMAIL: &str = "user_email";
pub const KEY_FIRST_LAUNCH: &str = "first_launch";

pub const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;
pub const DEFAULT_DARK_MODE_ENABLED: bool = false;
pub const DEFAULT_USER_NAME: &str = "John Doe";
pub const DEFAULT_USER_EMAIL: &str = "john.doe@example.com";
pub const DEFAULT_FIRST_LAUNCH: bool = true;
