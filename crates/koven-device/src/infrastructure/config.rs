//! TOML-based configuration for the device process.
//!
//! The file is optional.  Every field has a serde default, so an empty file,
//! a partial file and no file at all all produce a usable [`DeviceConfig`].
//! Command-line flags are applied on top in `main.rs`.
//!
//! ```toml
//! listen_addr = "127.0.0.1:7878"
//! tick_interval_ms = 1000
//! log_level = "info"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for loading the device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A zero tick interval would make the oven spin without pause.
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
}

/// Runtime settings for `koven-device`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Address the frame link listens on for a controller.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Length of one simulated time unit, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 7878))
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            tick_interval_ms: default_tick_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl DeviceConfig {
    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::ZeroTickInterval`] when `tick_interval_ms` is 0.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let cfg: DeviceConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks values that serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTickInterval`] when `tick_interval_ms` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }

    /// Tick interval as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Loads a [`DeviceConfig`] from `path`.
///
/// Unlike a default config location, an explicitly named file must exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
/// errors of [`DeviceConfig::from_toml_str`].
pub fn load_config(path: &Path) -> Result<DeviceConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DeviceConfig::from_toml_str(&content)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = DeviceConfig::default();

        // Assert
        assert_eq!(cfg.listen_addr.to_string(), "127.0.0.1:7878");
        assert_eq!(cfg.tick_interval(), Duration::from_secs(1));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg = DeviceConfig::from_toml_str("").expect("empty file is valid");
        assert_eq!(cfg, DeviceConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        // Arrange
        let content = "tick_interval_ms = 250\n";

        // Act
        let cfg = DeviceConfig::from_toml_str(content).expect("valid config");

        // Assert
        assert_eq!(cfg.tick_interval_ms, 250);
        assert_eq!(cfg.listen_addr, default_listen_addr());
    }

    #[test]
    fn test_full_toml_is_parsed() {
        let content = r#"
            listen_addr = "0.0.0.0:9000"
            tick_interval_ms = 100
            log_level = "debug"
        "#;

        let cfg = DeviceConfig::from_toml_str(content).expect("valid config");

        assert_eq!(cfg.listen_addr.port(), 9000);
        assert_eq!(cfg.tick_interval(), Duration::from_millis(100));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_zero_tick_interval_is_rejected() {
        let result = DeviceConfig::from_toml_str("tick_interval_ms = 0");
        assert!(matches!(result, Err(ConfigError::ZeroTickInterval)));
    }

    #[test]
    fn test_malformed_address_is_parse_error() {
        let result = DeviceConfig::from_toml_str(r#"listen_addr = "not an address""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        // Arrange
        let cfg = DeviceConfig {
            tick_interval_ms: 42,
            ..DeviceConfig::default()
        };

        // Act
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored = DeviceConfig::from_toml_str(&text).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_load_config_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("koven-device-no-such-config.toml");
        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_reads_file() {
        // Arrange
        let path = std::env::temp_dir().join(format!(
            "koven-device-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "tick_interval_ms = 10\n").expect("write temp config");

        // Act
        let result = load_config(&path);
        let _ = std::fs::remove_file(&path);

        // Assert
        assert_eq!(result.expect("valid file").tick_interval_ms, 10);
    }
}
