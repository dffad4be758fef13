//! Server configuration via TOML
//!
//! ```toml
//! listen = "127.0.0.1:1234"
//!
//! [engine]
//! max_value_size = 16
//! max_ops_per_txn = 64
//! ```

use gotthard_core::Error;
use gotthard_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Listen address used when none is configured
pub const DEFAULT_LISTEN: &str = "127.0.0.1:1234";

/// Top-level server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `HOST:PORT` to accept connections on
    pub listen: String,
    /// Engine limits
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> gotthard_core::Result<Self> {
        let config: ServerConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse server config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    pub fn load(path: &Path) -> gotthard_core::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Check the listen address is present and the engine limits are usable
    pub fn validate(&self) -> gotthard_core::Result<()> {
        if self.listen.trim().is_empty() {
            return Err(Error::Config("listen address must not be empty".into()));
        }
        self.engine.validate()
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Gotthard server configuration

# Address to accept client connections on
listen = "127.0.0.1:1234"

[engine]
# Largest value a write may store (and a read may expect), in bytes
max_value_size = 16

# Largest number of operations in one transaction (at most 255); a full
# response must still fit in a 64 KiB frame
max_ops_per_txn = 64
"#
    }
}
