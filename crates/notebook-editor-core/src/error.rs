//! Error types for platform operations and configuration.
//!
//! Event paths never surface these to the host page. Platform failures are
//! logged and the operation degrades to a no-op; configuration errors are only
//! reported when an editor is constructed.

/// Error raised by a platform implementation (browser DOM call, etc.).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Invalid editor options.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A hot key entry whose key is not a numeric key code.
    #[error("hot key `{0}` is not a numeric key code")]
    InvalidHotKey(String),

    /// A modifier that is neither a submenu nor mapped to a command.
    #[error("modifier `{0}` has no entry in the command map")]
    UnmappedModifier(String),

    /// The toolbar selector class is empty.
    #[error("toolbar selector must not be empty")]
    EmptyToolbarSelector,

    /// Options could not be deserialized.
    #[error("invalid options: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
