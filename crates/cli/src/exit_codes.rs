//! CLI Exit Code Registry
//!
//! Single source of truth for the exit codes of `modernapp-prefs`.
//! Scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | Usage error (bad args, value doesn't fit the type) |
//! | 3    | Key not found (`get` without `--default`)          |
//! | 4    | Config file unreadable or invalid                  |
//! | 5    | Persistence failed (write refused, backend error)  |

use modernapp_prefs::PrefsError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, value that doesn't parse as the requested type.
pub const EXIT_USAGE: u8 = 2;

/// `get` on an absent key with no default to fall back to.
pub const EXIT_NOT_FOUND: u8 = 3;

/// Config file missing, unparseable, or failing validation.
pub const EXIT_CONFIG: u8 = 4;

/// The backend refused a write or could not be opened.
pub const EXIT_STORAGE: u8 = 5;

/// Map a store error to its exit code.
pub fn prefs_exit_code(err: &PrefsError) -> u8 {
    match err {
        PrefsError::ConfigRead(_) | PrefsError::ConfigParse(_) | PrefsError::ConfigValidation(_) => {
            EXIT_CONFIG
        }
        PrefsError::Io(_) | PrefsError::Serialize(_) | PrefsError::Sqlite(_) => EXIT_STORAGE,
        PrefsError::Unsupported(_) => EXIT_USAGE,
    }
}
