//! Engine configuration via `gotthard.toml`
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock engine: 16-byte value slots and up to 64 operations per batch.

use gotthard_core::{Error, Limits, Result, DEFAULT_MAX_OPS_PER_TXN, DEFAULT_MAX_VALUE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally used next to the server binary
pub const CONFIG_FILE_NAME: &str = "gotthard.toml";

/// Engine configuration
///
/// # Example
///
/// ```toml
/// # Largest value a write may store (and a read may expect), in bytes
/// max_value_size = 16
///
/// # Largest number of operations in one transaction
/// max_ops_per_txn = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Value slot capacity in bytes
    pub max_value_size: usize,
    /// Cap on operations per transaction
    pub max_ops_per_txn: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
            max_ops_per_txn: DEFAULT_MAX_OPS_PER_TXN,
        }
    }
}

impl EngineConfig {
    /// Request limits derived from this config
    pub fn limits(&self) -> Limits {
        Limits {
            max_value_size: self.max_value_size,
            max_ops_per_txn: self.max_ops_per_txn,
        }
    }

    /// Check every field is usable
    ///
    /// # Errors
    ///
    /// `Error::Config` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        self.limits().validate()
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Gotthard engine configuration
#
# Largest value a write may store (and a read may expect), in bytes.
# Requests exceeding it are answered with BADREQ.
max_value_size = 16

# Largest number of operations in one transaction (at most 255).
# A full response, max_ops_per_txn * (16 + max_value_size) + 11 bytes,
# must fit in a 64 KiB frame.
max_ops_per_txn = 64
"#
    }
}
