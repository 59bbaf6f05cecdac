//! Build configuration loaded from the generated `config.gypi`.
pub mod gypi;

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ConfigError;

/// File name of the generated configuration, relative to the build root.
pub const CONFIG_FILE: &str = "config.gypi";

/// Parsed contents of `config.gypi`.
///
/// Only `variables` is consulted by the tools; `target_defaults` is kept so
/// the whole document round-trips through one type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Build variables (`node_prefix`, `node_install_npm`, ...).
    pub variables: Map<String, Value>,
    /// Compiler defaults shared by all gyp targets.
    #[serde(default)]
    pub target_defaults: Map<String, Value>,
}

impl Config {
    /// Load `config.gypi` from `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read and
    /// [`ConfigError::Malformed`] if it does not parse.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        let text = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.clone() }
            } else {
                ConfigError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Malformed { path, source })
    }

    /// Parse gypi text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the normalised text is not a valid document.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&gypi::to_json(text))
    }

    /// Look up a string variable. Empty strings count as unset.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.variables
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether a boolean-ish variable is enabled (`true` or `'true'`).
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        match self.variables.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s == "true",
            _ => false,
        }
    }
}
