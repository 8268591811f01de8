// Store location and backend selection
// Optionally loaded from a TOML file (see StoreConfig::load)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PrefsError, Result};

/// Namespace the app has always written to.
pub const DEFAULT_NAMESPACE: &str = "modern_app_prefs";

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "modernapp";

/// Which persistence layer holds the namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `<dir>/<namespace>.json`, flat object (default)
    #[default]
    Json,
    /// `<dir>/<namespace>.db`, one row per key
    Sqlite,
    /// Process-local only, nothing survives a restart
    Memory,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Json => "json",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the namespace file
    pub dir: PathBuf,

    /// Namespace name (file stem / table partition)
    pub namespace: String,

    pub backend: BackendKind,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            backend: BackendKind::Json,
        }
    }
}

impl StoreConfig {
    /// Platform config dir, e.g. ~/.config/modernapp
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Config rooted at `dir` with the default namespace
    pub fn in_dir(dir: impl Into<PathBuf>, backend: BackendKind) -> Self {
        Self {
            dir: dir.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            backend,
        }
    }

    pub fn from_toml(input: &str) -> Result<Self> {
        let config: StoreConfig =
            toml::from_str(input).map_err(|e| PrefsError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| PrefsError::ConfigRead(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(PrefsError::ConfigValidation("namespace must not be empty".into()));
        }
        // The namespace becomes a file stem
        if self.namespace.contains(['/', '\\']) || self.namespace == "." || self.namespace == ".." {
            return Err(PrefsError::ConfigValidation(format!(
                "namespace '{}' must be a plain name, not a path",
                self.namespace
            )));
        }
        Ok(())
    }

    /// Path of the namespace file for on-disk backends
    pub fn namespace_path(&self) -> PathBuf {
        let ext = match self.backend {
            BackendKind::Sqlite => "db",
            BackendKind::Json | BackendKind::Memory => "json",
        };
        self.dir.join(format!("{}.{}", self.namespace, ext))
    }
}
