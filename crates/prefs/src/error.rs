use std::fmt;

/// Everything that can go wrong talking to the persistence layer.
///
/// Reads never surface these; writes return them and callers are free to
/// ignore the result.
#[derive(Debug)]
pub enum PrefsError {
    /// Filesystem error (create dir, write, rename).
    Io(String),
    /// Stored data could not be encoded or decoded.
    Serialize(String),
    /// SQLite backend error.
    Sqlite(String),
    /// Config file could not be read.
    ConfigRead(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty namespace, bad characters).
    ConfigValidation(String),
    /// Backend was not compiled into this build.
    Unsupported(&'static str),
}

impl fmt::Display for PrefsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Self::Sqlite(msg) => write!(f, "sqlite error: {msg}"),
            Self::ConfigRead(msg) => write!(f, "config read error: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Unsupported(backend) => write!(f, "backend '{backend}' is not available in this build"),
        }
    }
}

impl std::error::Error for PrefsError {}

impl From<std::io::Error> for PrefsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PrefsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PrefsError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrefsError>;
