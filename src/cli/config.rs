//! Hubcast configuration file handling.
//!
//! Provides default configuration generation and loading. Configuration
//! files are TOML format, stored under the platform config directory
//! (`~/.config/hubcast/config.toml` on Linux).
//!
//! The config holds OPERATOR settings only: which hub to talk to, where the
//! signer key lives, and logging. Protocol state (username proofs, casts,
//! channels) lives on the hub and is never configured locally.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default hub endpoint (a local hub node)
const DEFAULT_HUB_URL: &str = "http://127.0.0.1:2281";

/// Hubcast client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubcastConfig {
    /// Hub connection settings
    pub hub: HubConfig,

    /// Delegated signer settings
    pub signer: SignerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hub connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub's REST API
    #[serde(default = "default_hub_url")]
    pub url: String,

    /// Network tag: "mainnet", "testnet", or "devnet"
    #[serde(default = "default_network")]
    pub network: String,
}

/// Delegated signer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Path to the signer key file (64 hex characters, created by `hubcast keygen`)
    pub key_file: PathBuf,

    /// Account ID the signer is approved for
    ///
    /// Leave unset until the account has approved the signer's public key
    /// on the network; actions fail with a not-ready error until then.
    pub account_id: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_hub_url() -> String {
    DEFAULT_HUB_URL.to_string()
}

fn default_network() -> String {
    "mainnet".to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl HubcastConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: HubcastConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(key_file: &Path) -> String {
        format!(
            r#"# Hubcast Client Configuration
#
# This file contains OPERATOR configuration only: which hub to submit to,
# where the delegated signer key lives, and logging. Protocol state
# (username proofs, casts, channels) lives on the hub.

[hub]
# Base URL of the hub's REST API
url = "{hub_url}"

# Network tag baked into every signed message: mainnet, testnet, or devnet.
# A message signed for one network is invalid on the others.
network = "mainnet"

[signer]
# Path to the signer key file (created by `hubcast keygen`)
key_file = "{key_file}"

# Account ID this signer is approved for.
# Uncomment once the account has approved the signer's public key.
# account_id = 123

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#,
            hub_url = DEFAULT_HUB_URL,
            key_file = key_file.display()
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        key_file: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(key_file);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Default config file path: `<config dir>/hubcast/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hubcast")
        .join("config.toml")
}

/// Default signer key file path: `<config dir>/hubcast/signer.key`
pub fn default_key_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hubcast")
        .join("signer.key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toml_parses() {
        let toml_str = HubcastConfig::generate_default_toml(Path::new("/tmp/signer.key"));
        let config: HubcastConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.hub.url, DEFAULT_HUB_URL);
        assert_eq!(config.hub.network, "mainnet");
        assert_eq!(config.signer.key_file, PathBuf::from("/tmp/signer.key"));
        assert_eq!(config.signer.account_id, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        HubcastConfig::create_default(&config_path, Path::new("/tmp/signer.key")).unwrap();
        let config = HubcastConfig::load(&config_path).unwrap();
        assert_eq!(config.hub.network, "mainnet");
    }

    #[test]
    fn test_load_with_account_id() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
[hub]
url = "http://hub.example:2281"
network = "testnet"

[signer]
key_file = "/keys/signer.key"
account_id = 42
"#,
        )
        .unwrap();

        let config = HubcastConfig::load(&config_path).unwrap();
        assert_eq!(config.hub.network, "testnet");
        assert_eq!(config.signer.account_id, Some(42));
        // Missing [logging] section falls back to defaults.
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(HubcastConfig::load(Path::new("/nonexistent/config.toml")).is_err());
    }
}
